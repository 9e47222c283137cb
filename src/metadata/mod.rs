//! Vocabulary tables backing the facet choice domains
//!
//! Organizations come from the institutional directory; the rest are small
//! name lists maintained by editors. Organizations flagged
//! `exclude_from_listings` never appear in choice lists or filter
//! resolution.

use rusqlite::params;
use serde::Serialize;

use crate::error::Result;
use crate::storage::Database;

/// Carnegie classification buckets used by the institution-type facet.
pub const CARNEGIE_CLASSES: &[(&str, &str)] = &[
    ("Associate", "Associate (2-year) Institution"),
    ("Baccalaureate", "Baccalaureate Institution"),
    ("Master", "Master's Institution"),
    ("Doctoral/Research", "Doctoral/Research Institution"),
];

/// An institution from the directory.
#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub country_iso: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub enrollment_fte: Option<i64>,
    pub institution_type: Option<String>,
    pub exclude_from_listings: bool,
}

/// Builder for inserting an organization.
#[derive(Debug, Clone, Default)]
pub struct NewOrganization {
    pub name: String,
    pub country_iso: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub enrollment_fte: Option<i64>,
    pub institution_type: Option<String>,
    pub exclude_from_listings: bool,
}

impl NewOrganization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn country(mut self, iso: impl Into<String>, name: impl Into<String>) -> Self {
        self.country_iso = Some(iso.into());
        self.country = Some(name.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn enrollment_fte(mut self, fte: i64) -> Self {
        self.enrollment_fte = Some(fte);
        self
    }

    pub fn institution_type(mut self, carnegie: impl Into<String>) -> Self {
        self.institution_type = Some(carnegie.into());
        self
    }

    pub fn excluded(mut self) -> Self {
        self.exclude_from_listings = true;
        self
    }

    pub fn insert(&self, db: &Database) -> Result<i64> {
        db.conn().execute(
            "INSERT INTO organizations
                (name, country_iso, country, state, enrollment_fte,
                 institution_type, exclude_from_listings)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                self.name,
                self.country_iso,
                self.country,
                self.state,
                self.enrollment_fte,
                self.institution_type,
                self.exclude_from_listings as i64,
            ],
        )?;
        Ok(db.conn().last_insert_rowid())
    }
}

/// All listed organizations as (id, name) pairs, ordered by name.
pub fn organization_choices(db: &Database) -> Result<Vec<(i64, String)>> {
    let mut stmt = db.conn().prepare(
        "SELECT id, name FROM organizations
         WHERE exclude_from_listings = 0
         ORDER BY name",
    )?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Ids of listed organizations with enrollment in the half-open range
/// `[min, max)`; unbounded ends use `None`.
pub fn organizations_in_fte_range(
    db: &Database,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<Vec<i64>> {
    let mut sql = String::from(
        "SELECT id FROM organizations
         WHERE exclude_from_listings = 0 AND enrollment_fte IS NOT NULL",
    );
    let mut bind: Vec<i64> = Vec::new();
    if let Some(min) = min {
        sql.push_str(" AND enrollment_fte >= ?");
        bind.push(min);
    }
    if let Some(max) = max {
        sql.push_str(" AND enrollment_fte < ?");
        bind.push(max);
    }

    let mut stmt = db.conn().prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(bind), |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(rows)
}

/// Distinct (iso, country) pairs of organizations attached to published
/// records, skipping rows without an ISO code.
pub fn country_choices(db: &Database) -> Result<Vec<(String, String)>> {
    let mut stmt = db.conn().prepare(
        "SELECT DISTINCT o.country_iso, o.country
         FROM organizations o
         JOIN record_organizations ro ON ro.organization_id = o.id
         JOIN content_records r ON r.id = ro.record_id
         WHERE r.status = 'published'
           AND o.country_iso IS NOT NULL AND o.country_iso != ''
         ORDER BY o.country",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get::<_, Option<String>>(1)?.unwrap_or_default()))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Insert a sustainability topic.
pub fn insert_topic(db: &Database, slug: &str, name: &str, sort_order: i64) -> Result<i64> {
    db.conn().execute(
        "INSERT INTO sustainability_topics (slug, name, sort_order) VALUES (?, ?, ?)",
        params![slug, name, sort_order],
    )?;
    Ok(db.conn().last_insert_rowid())
}

/// Topic choices as (slug, name), in editorial order.
pub fn topic_choices(db: &Database) -> Result<Vec<(String, String)>> {
    let mut stmt = db.conn().prepare(
        "SELECT slug, name FROM sustainability_topics ORDER BY sort_order, name",
    )?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Insert a keyword tag.
pub fn insert_keyword(db: &Database, slug: &str, name: &str) -> Result<i64> {
    db.conn().execute(
        "INSERT INTO keywords (slug, name) VALUES (?, ?)",
        params![slug, name],
    )?;
    Ok(db.conn().last_insert_rowid())
}

/// Keyword choices as (slug, name), ordered by name.
pub fn keyword_choices(db: &Database) -> Result<Vec<(String, String)>> {
    let mut stmt = db
        .conn()
        .prepare("SELECT slug, name FROM keywords ORDER BY name")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// The simple name-only vocabulary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocab {
    AcademicDiscipline,
    ProgramType,
    PublicationMaterialType,
    GreenPowerInstallation,
    ConferenceName,
    InstitutionalOffice,
    FundingSource,
}

impl Vocab {
    fn table(self) -> &'static str {
        match self {
            Self::AcademicDiscipline => "academic_disciplines",
            Self::ProgramType => "program_types",
            Self::PublicationMaterialType => "publication_material_types",
            Self::GreenPowerInstallation => "green_power_installations",
            Self::ConferenceName => "conference_names",
            Self::InstitutionalOffice => "institutional_offices",
            Self::FundingSource => "funding_sources",
        }
    }

    /// Insert a term, returning its id (existing id if already present).
    pub fn insert(self, db: &Database, name: &str) -> Result<i64> {
        db.conn().execute(
            &format!(
                "INSERT OR IGNORE INTO {} (name) VALUES (?)",
                self.table()
            ),
            [name],
        )?;
        let id = db.conn().query_row(
            &format!("SELECT id FROM {} WHERE name = ?", self.table()),
            [name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// All terms as (id, name), ordered by name.
    pub fn choices(self, db: &Database) -> Result<Vec<(i64, String)>> {
        let mut stmt = db
            .conn()
            .prepare(&format!("SELECT id, name FROM {} ORDER BY name", self.table()))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
