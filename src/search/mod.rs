//! Full-text search over content records
//!
//! The index lives in the `content_fts` virtual table and is queried through
//! the [`SearchBackend`] trait so the browse layer never depends on a
//! concrete engine. Results come back as record ids in relevance order
//! (best match first).

use rusqlite::params;
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::Database;

/// A search engine that resolves free text to ranked record ids.
pub trait SearchBackend {
    /// Run `text` against the index, returning matching record ids ordered
    /// by descending relevance.
    fn auto_query(&self, db: &Database, text: &str) -> Result<Vec<i64>>;
}

/// The built-in FTS5 backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct FtsIndex;

impl SearchBackend for FtsIndex {
    fn auto_query(&self, db: &Database, text: &str) -> Result<Vec<i64>> {
        let query = sanitize_match_query(text);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // bm25() returns lower-is-better scores, so ascending order is
        // descending relevance.
        let mut stmt = db.conn().prepare(
            "SELECT rowid FROM content_fts
             WHERE content_fts MATCH ?
             ORDER BY bm25(content_fts)",
        )?;
        let ids = stmt
            .query_map([&query], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        debug!(query = %query, hits = ids.len(), "search executed");
        Ok(ids)
    }
}

/// Quote each whitespace token so user input never reaches the MATCH parser
/// as syntax. Tokens are AND-ed together, which matches how visitors expect
/// multi-word queries to behave.
fn sanitize_match_query(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            let cleaned: String = token.chars().filter(|c| *c != '"').collect();
            format!("\"{cleaned}\"")
        })
        .filter(|quoted| quoted.len() > 2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Add or replace a record's row in the index.
pub fn index_record(
    db: &Database,
    record_id: i64,
    title: &str,
    description: Option<&str>,
    keywords: &[String],
) -> Result<()> {
    db.conn()
        .execute("DELETE FROM content_fts WHERE rowid = ?", [record_id])?;
    db.conn().execute(
        "INSERT INTO content_fts (rowid, title, description, keywords) VALUES (?, ?, ?, ?)",
        params![
            record_id,
            title,
            description.unwrap_or(""),
            keywords.join(" "),
        ],
    )?;
    Ok(())
}

/// Drop and rebuild the whole index from the record tables. Returns the
/// number of records indexed.
pub fn rebuild_index(db: &Database) -> Result<usize> {
    db.conn().execute("DELETE FROM content_fts", [])?;
    let indexed = db.conn().execute(
        "INSERT INTO content_fts (rowid, title, description, keywords)
         SELECT r.id, r.title, COALESCE(r.description, ''),
                COALESCE((SELECT group_concat(k.name, ' ')
                          FROM record_keywords rk
                          JOIN keywords k ON k.id = rk.keyword_id
                          WHERE rk.record_id = r.id), '')
         FROM content_records r",
        [],
    )?;
    debug!(indexed, "search index rebuilt");
    Ok(indexed)
}

/// Run a query, degrading to no results if the backend fails. Browse pages
/// must render even when the index is broken.
pub fn query_or_empty(backend: &dyn SearchBackend, db: &Database, text: &str) -> Vec<i64> {
    match backend.auto_query(db, text) {
        Ok(ids) => ids,
        Err(err) => {
            warn!(error = %err, "search backend failed; returning no results");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentKind, NewRecord};
    use chrono::Utc;

    fn seed(db: &Database, title: &str, description: &str) -> i64 {
        let id = NewRecord::new(ContentKind::CaseStudy, title)
            .description(description)
            .published(Utc::now())
            .insert(db)
            .unwrap();
        index_record(db, id, title, Some(description), &[]).unwrap();
        id
    }

    #[test]
    fn test_query_returns_matches_ranked() {
        let db = Database::open_in_memory().unwrap();
        let solar = seed(&db, "Campus Solar Array", "solar panels on the library roof");
        let compost = seed(&db, "Composting Program", "food waste diversion");

        let ids = FtsIndex.auto_query(&db, "solar").unwrap();
        assert_eq!(ids, vec![solar]);

        let ids = FtsIndex.auto_query(&db, "food waste").unwrap();
        assert_eq!(ids, vec![compost]);
    }

    #[test]
    fn test_query_tolerates_match_syntax() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, "Energy Audit", "building energy audit results");

        // Unbalanced quotes and operators must not error out.
        assert!(FtsIndex.auto_query(&db, "\"energy AND (").is_ok());
        assert!(FtsIndex.auto_query(&db, "   ").unwrap().is_empty());
    }

    #[test]
    fn test_rebuild_reindexes_everything() {
        let db = Database::open_in_memory().unwrap();
        let id = NewRecord::new(ContentKind::Video, "Wind Turbine Tour")
            .published(Utc::now())
            .insert(&db)
            .unwrap();

        assert!(FtsIndex.auto_query(&db, "turbine").unwrap().is_empty());
        let count = rebuild_index(&db).unwrap();
        assert_eq!(count, 1);
        assert_eq!(FtsIndex.auto_query(&db, "turbine").unwrap(), vec![id]);
    }

    #[test]
    fn test_query_or_empty_swallows_backend_errors() {
        struct Broken;
        impl SearchBackend for Broken {
            fn auto_query(&self, _db: &Database, _text: &str) -> Result<Vec<i64>> {
                Err(crate::error::HubError::Config("index offline".into()))
            }
        }
        let db = Database::open_in_memory().unwrap();
        assert!(query_or_empty(&Broken, &db, "anything").is_empty());
    }
}
