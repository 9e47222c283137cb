//! SQL assembly for browse collections
//!
//! A [`RecordQuery`] is an immutable-ish description of a collection over
//! `content_records`: a conjunction of conditions plus at most one ordering.
//! Filters narrow it by appending conditions; nothing executes until
//! `fetch`, `ids` or `count`.

use itertools::Itertools;
use rusqlite::types::Value;

use crate::content::ContentRecord;
use crate::error::Result;
use crate::storage::Database;

/// One condition on the base table, AND-ed with the rest.
#[derive(Debug, Clone)]
pub enum Cond {
    /// `r.kind = ?`
    KindEq(String),
    /// `r.kind IN (...)`; an empty list matches nothing
    KindIn(Vec<String>),
    /// `r.status = 'published'`
    Published,
    /// `r.permission = 'open'`
    OpenAccess,
    /// `r.has_images = 1`
    HasImages,
    /// Year of the publication timestamp equals the given year
    PublishedInYear(i64),
    /// Year of the editorial creation date equals the given year
    CreatedInYear(i64),
    /// `r.id IN (...)`; an empty list matches nothing
    IdIn(Vec<i64>),
    /// Record has a row in `table` whose `column` is among `values`.
    /// Works for m2m link tables and sub-type tables alike, since both
    /// carry a `record_id` column.
    Linked {
        table: &'static str,
        column: &'static str,
        values: Vec<Value>,
    },
    /// Record is linked to a listed organization whose `column` is among
    /// `values`
    OrgAttr {
        column: &'static str,
        values: Vec<Value>,
    },
}

impl Cond {
    fn to_sql(&self, bind: &mut Vec<Value>) -> String {
        match self {
            Self::KindEq(kind) => {
                bind.push(Value::from(kind.clone()));
                "r.kind = ?".into()
            }
            Self::KindIn(kinds) => {
                if kinds.is_empty() {
                    return "0 = 1".into();
                }
                bind.extend(kinds.iter().map(|k| Value::from(k.clone())));
                format!("r.kind IN ({})", placeholders(kinds.len()))
            }
            Self::Published => "r.status = 'published'".into(),
            Self::OpenAccess => "r.permission = 'open'".into(),
            Self::HasImages => "r.has_images = 1".into(),
            Self::PublishedInYear(year) => {
                bind.push(Value::from(format!("{year:04}")));
                "strftime('%Y', r.published) = ?".into()
            }
            Self::CreatedInYear(year) => {
                bind.push(Value::from(format!("{year:04}")));
                "strftime('%Y', r.date_created) = ?".into()
            }
            Self::IdIn(ids) => {
                if ids.is_empty() {
                    return "0 = 1".into();
                }
                bind.extend(ids.iter().map(|id| Value::from(*id)));
                format!("r.id IN ({})", placeholders(ids.len()))
            }
            Self::Linked {
                table,
                column,
                values,
            } => {
                if values.is_empty() {
                    return "0 = 1".into();
                }
                bind.extend(values.iter().cloned());
                format!(
                    "EXISTS (SELECT 1 FROM {table} lt
                      WHERE lt.record_id = r.id AND lt.{column} IN ({}))",
                    placeholders(values.len())
                )
            }
            Self::OrgAttr { column, values } => {
                if values.is_empty() {
                    return "0 = 1".into();
                }
                bind.extend(values.iter().cloned());
                format!(
                    "EXISTS (SELECT 1 FROM record_organizations ro
                      JOIN organizations o ON o.id = ro.organization_id
                      WHERE ro.record_id = r.id
                        AND o.exclude_from_listings = 0
                        AND o.{column} IN ({}))",
                    placeholders(values.len())
                )
            }
        }
    }
}

/// An ORDER BY built from one or more clauses.
#[derive(Debug, Clone, Default)]
pub struct Ordering {
    clauses: Vec<(String, Vec<Value>)>,
}

impl Ordering {
    /// Newest first, the listing default. Unpublished rows sort last.
    pub fn published_desc() -> Self {
        Self {
            clauses: vec![("r.published DESC".into(), Vec::new())],
        }
    }

    /// Order by a base-table column. Callers pass only known column names.
    pub fn column(column: &'static str, descending: bool) -> Self {
        let dir = if descending { "DESC" } else { "ASC" };
        Self {
            clauses: vec![(format!("r.{column} {dir}"), Vec::new())],
        }
    }

    /// Pin rows to the exact position they hold in `ids`; rows not listed
    /// sort after all listed ones.
    pub fn rank(ids: &[i64]) -> Self {
        if ids.is_empty() {
            return Self::published_desc();
        }
        let mut sql = String::from("CASE r.id");
        let mut bind = Vec::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            sql.push_str(&format!(" WHEN ? THEN {position}"));
            bind.push(Value::from(*id));
        }
        sql.push_str(&format!(" ELSE {} END ASC", ids.len()));
        Self {
            clauses: vec![(sql, bind)],
        }
    }

    /// Order by an arbitrary expression (sub-type scalar subselects).
    pub fn expr(sql: impl Into<String>, bind: Vec<Value>) -> Self {
        Self {
            clauses: vec![(sql.into(), bind)],
        }
    }

    /// Append a secondary clause.
    pub fn then(mut self, other: Ordering) -> Self {
        self.clauses.extend(other.clauses);
        self
    }
}

/// A collection over the base table.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    conds: Vec<Cond>,
    order: Option<Ordering>,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, cond: Cond) -> Self {
        self.conds.push(cond);
        self
    }

    /// Replace the ordering. The last caller wins.
    pub fn order_by(mut self, order: Ordering) -> Self {
        self.order = Some(order);
        self
    }

    pub fn has_explicit_order(&self) -> bool {
        self.order.is_some()
    }

    fn build(&self, select: &str) -> (String, Vec<Value>) {
        let mut bind = Vec::new();
        let mut sql = format!("SELECT {select} FROM content_records r");
        if !self.conds.is_empty() {
            let clauses: Vec<String> = self.conds.iter().map(|c| c.to_sql(&mut bind)).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if let Some(order) = &self.order {
            let mut terms = Vec::with_capacity(order.clauses.len());
            for (clause, params) in &order.clauses {
                terms.push(clause.clone());
                bind.extend(params.iter().cloned());
            }
            if !terms.is_empty() {
                sql.push_str(" ORDER BY ");
                sql.push_str(&terms.join(", "));
            }
        }
        (sql, bind)
    }

    pub fn fetch(&self, db: &Database) -> Result<Vec<ContentRecord>> {
        let select = ContentRecord::COLUMNS
            .split(", ")
            .map(|col| format!("r.{col}"))
            .collect::<Vec<_>>()
            .join(", ");
        let (sql, bind) = self.build(&select);
        let mut stmt = db.conn().prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bind), ContentRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn ids(&self, db: &Database) -> Result<Vec<i64>> {
        let (sql, bind) = self.build("r.id");
        let mut stmt = db.conn().prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bind), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
    }

    pub fn count(&self, db: &Database) -> Result<i64> {
        let (sql, bind) = self.build("COUNT(*)");
        let count = db
            .conn()
            .query_row(&sql, rusqlite::params_from_iter(bind), |row| row.get(0))?;
        Ok(count)
    }
}

/// A query plus the relevance hint a search filter may have attached.
/// Carrying the hint explicitly lets the ordering step fall back to
/// relevance without the two filters ever talking to each other.
#[derive(Debug, Clone, Default)]
pub struct FilteredSet {
    pub query: RecordQuery,
    pub rank_hint: Option<Vec<i64>>,
}

impl FilteredSet {
    pub fn new(query: RecordQuery) -> Self {
        Self {
            query,
            rank_hint: None,
        }
    }

    pub fn map_query(mut self, f: impl FnOnce(RecordQuery) -> RecordQuery) -> Self {
        self.query = f(self.query);
        self
    }
}

fn placeholders(n: usize) -> String {
    std::iter::repeat_n("?", n).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentKind, NewRecord};
    use chrono::{Duration, Utc};

    #[test]
    fn test_empty_query_selects_everything() {
        let db = Database::open_in_memory().unwrap();
        NewRecord::new(ContentKind::Video, "One").insert(&db).unwrap();
        NewRecord::new(ContentKind::CaseStudy, "Two").insert(&db).unwrap();
        assert_eq!(RecordQuery::new().count(&db).unwrap(), 2);
    }

    #[test]
    fn test_conditions_are_conjunctive() {
        let db = Database::open_in_memory().unwrap();
        NewRecord::new(ContentKind::Video, "Draft video").insert(&db).unwrap();
        let published = NewRecord::new(ContentKind::Video, "Live video")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        NewRecord::new(ContentKind::CaseStudy, "Live study")
            .published(Utc::now())
            .insert(&db)
            .unwrap();

        let ids = RecordQuery::new()
            .filter(Cond::Published)
            .filter(Cond::KindEq("video".into()))
            .ids(&db)
            .unwrap();
        assert_eq!(ids, vec![published]);
    }

    #[test]
    fn test_empty_id_list_matches_nothing() {
        let db = Database::open_in_memory().unwrap();
        NewRecord::new(ContentKind::Video, "One").insert(&db).unwrap();
        let count = RecordQuery::new()
            .filter(Cond::IdIn(Vec::new()))
            .count(&db)
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_rank_ordering_pins_positions() {
        let db = Database::open_in_memory().unwrap();
        let a = NewRecord::new(ContentKind::Video, "A").insert(&db).unwrap();
        let b = NewRecord::new(ContentKind::Video, "B").insert(&db).unwrap();
        let c = NewRecord::new(ContentKind::Video, "C").insert(&db).unwrap();

        let ids = RecordQuery::new()
            .order_by(Ordering::rank(&[c, a, b]))
            .ids(&db)
            .unwrap();
        assert_eq!(ids, vec![c, a, b]);
    }

    #[test]
    fn test_rank_ordering_sends_unlisted_rows_last() {
        let db = Database::open_in_memory().unwrap();
        let a = NewRecord::new(ContentKind::Video, "A").insert(&db).unwrap();
        let b = NewRecord::new(ContentKind::Video, "B").insert(&db).unwrap();
        let c = NewRecord::new(ContentKind::Video, "C").insert(&db).unwrap();

        let ids = RecordQuery::new()
            .order_by(Ordering::rank(&[b]))
            .ids(&db)
            .unwrap();
        assert_eq!(ids[0], b);
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&a) && ids.contains(&c));
    }

    #[test]
    fn test_default_published_desc() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let older = NewRecord::new(ContentKind::Video, "Older")
            .published(now - Duration::days(7))
            .insert(&db)
            .unwrap();
        let newer = NewRecord::new(ContentKind::Video, "Newer")
            .published(now)
            .insert(&db)
            .unwrap();

        let ids = RecordQuery::new()
            .order_by(Ordering::published_desc())
            .ids(&db)
            .unwrap();
        assert_eq!(ids, vec![newer, older]);
    }
}
