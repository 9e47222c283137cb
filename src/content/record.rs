//! Base content record model

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

use crate::content::kinds::ContentKind;
use crate::error::Result;
use crate::storage::Database;

/// Publication status of a record.
///
/// Records start as `New` and only become visible through browse once
/// published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Published,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Published => "published",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "published" => Self::Published,
            _ => Self::New,
        }
    }
}

/// Who may view a published record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Members and staff only (the restrictive default)
    Member,
    /// Anyone, including anonymous visitors
    Open,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Open => "open",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "open" => Self::Open,
            _ => Self::Member,
        }
    }
}

/// A row from the `content_records` base table.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    pub id: i64,
    pub kind: ContentKind,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: Status,
    pub permission: Permission,
    pub published: Option<DateTime<Utc>>,
    pub date_created: Option<NaiveDate>,
    pub has_images: bool,
}

impl ContentRecord {
    /// Column list matching `from_row`. Keep the two in sync.
    pub const COLUMNS: &'static str =
        "id, kind, title, slug, description, status, permission, published, date_created, has_images";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let kind_str: String = row.get(1)?;
        let status_str: String = row.get(5)?;
        let permission_str: String = row.get(6)?;
        let published_str: Option<String> = row.get(7)?;
        let created_str: Option<String> = row.get(8)?;

        Ok(Self {
            id: row.get(0)?,
            // Unknown kinds should not exist; map them to CaseStudy rather
            // than failing the whole result set.
            kind: kind_str.parse().unwrap_or(ContentKind::CaseStudy),
            title: row.get(2)?,
            slug: row.get(3)?,
            description: row.get(4)?,
            status: Status::parse(&status_str),
            permission: Permission::parse(&permission_str),
            published: published_str
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            date_created: created_str.and_then(|s| s.parse().ok()),
            has_images: row.get::<_, i64>(9)? != 0,
        })
    }

    pub fn get(db: &Database, id: i64) -> Result<Option<Self>> {
        let sql = format!(
            "SELECT {} FROM content_records WHERE id = ?",
            Self::COLUMNS
        );
        let mut stmt = db.conn().prepare(&sql)?;
        let mut rows = stmt.query_map([id], Self::from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}

/// Builder for inserting a record. Defaults are restrictive: new status,
/// member-only permission.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub kind: ContentKind,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: Status,
    pub permission: Permission,
    pub published: Option<DateTime<Utc>>,
    pub date_created: Option<NaiveDate>,
    pub has_images: bool,
}

impl NewRecord {
    pub fn new(kind: ContentKind, title: impl Into<String>) -> Self {
        let title = title.into();
        let slug = slugify(&title);
        Self {
            kind,
            title,
            slug,
            description: None,
            status: Status::New,
            permission: Permission::Member,
            published: None,
            date_created: None,
            has_images: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark published at the given instant.
    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.status = Status::Published;
        self.published = Some(at);
        self
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    pub fn date_created(mut self, date: NaiveDate) -> Self {
        self.date_created = Some(date);
        self
    }

    pub fn with_images(mut self) -> Self {
        self.has_images = true;
        self
    }

    pub fn insert(&self, db: &Database) -> Result<i64> {
        db.conn().execute(
            "INSERT INTO content_records
                (kind, title, slug, description, status, permission,
                 published, date_created, has_images)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.kind.slug(),
                self.title,
                self.slug,
                self.description,
                self.status.as_str(),
                self.permission.as_str(),
                self.published.map(|dt| dt.to_rfc3339()),
                self.date_created.map(|d| d.to_string()),
                self.has_images as i64,
            ],
        )?;
        Ok(db.conn().last_insert_rowid())
    }
}

/// Link a record to an organization.
pub fn link_organization(db: &Database, record_id: i64, org_id: i64) -> Result<()> {
    db.conn().execute(
        "INSERT OR IGNORE INTO record_organizations (record_id, organization_id) VALUES (?, ?)",
        params![record_id, org_id],
    )?;
    Ok(())
}

/// Link a record to a sustainability topic.
pub fn link_topic(db: &Database, record_id: i64, topic_id: i64) -> Result<()> {
    db.conn().execute(
        "INSERT OR IGNORE INTO record_topics (record_id, topic_id) VALUES (?, ?)",
        params![record_id, topic_id],
    )?;
    Ok(())
}

/// Link a record to an academic discipline.
pub fn link_discipline(db: &Database, record_id: i64, discipline_id: i64) -> Result<()> {
    db.conn().execute(
        "INSERT OR IGNORE INTO record_disciplines (record_id, discipline_id) VALUES (?, ?)",
        params![record_id, discipline_id],
    )?;
    Ok(())
}

/// Link a record to an institutional office.
pub fn link_office(db: &Database, record_id: i64, office_id: i64) -> Result<()> {
    db.conn().execute(
        "INSERT OR IGNORE INTO record_institutions (record_id, office_id) VALUES (?, ?)",
        params![record_id, office_id],
    )?;
    Ok(())
}

/// Link a record to a keyword tag.
pub fn link_keyword(db: &Database, record_id: i64, keyword_id: i64) -> Result<()> {
    db.conn().execute(
        "INSERT OR IGNORE INTO record_keywords (record_id, keyword_id) VALUES (?, ?)",
        params![record_id, keyword_id],
    )?;
    Ok(())
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_restrictive() {
        let record = NewRecord::new(ContentKind::AcademicProgram, "My academic program");
        assert_eq!(record.status, Status::New);
        assert_eq!(record.permission, Permission::Member);
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let id = NewRecord::new(ContentKind::Publication, "Annual Report")
            .description("A yearly summary")
            .published(Utc::now())
            .insert(&db)
            .unwrap();

        let record = ContentRecord::get(&db, id).unwrap().unwrap();
        assert_eq!(record.title, "Annual Report");
        assert_eq!(record.slug, "annual-report");
        assert_eq!(record.kind, ContentKind::Publication);
        assert_eq!(record.status, Status::Published);
        assert!(record.published.is_some());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Solar 101  "), "solar-101");
    }
}
