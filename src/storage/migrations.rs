//! Versioned schema migrations
//!
//! Each migration is a numbered SQL batch applied inside a transaction.
//! The current version is tracked via `PRAGMA user_version`.

use rusqlite::Connection;

use crate::error::Result;

/// Schema version after all migrations have run.
pub const SCHEMA_VERSION: u32 = 1;

const MIGRATION_V1: &str = "
    CREATE TABLE IF NOT EXISTS content_records (
        id INTEGER PRIMARY KEY,
        kind TEXT NOT NULL,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'new',
        permission TEXT NOT NULL DEFAULT 'member',
        published TEXT,
        date_created TEXT,
        has_images INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
    );
    CREATE INDEX IF NOT EXISTS idx_records_kind ON content_records(kind);
    CREATE INDEX IF NOT EXISTS idx_records_status ON content_records(status);
    CREATE INDEX IF NOT EXISTS idx_records_published ON content_records(published);

    CREATE TABLE IF NOT EXISTS organizations (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        country_iso TEXT,
        country TEXT,
        state TEXT,
        enrollment_fte INTEGER,
        institution_type TEXT,
        exclude_from_listings INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS sustainability_topics (
        id INTEGER PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS academic_disciplines (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS program_types (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS publication_material_types (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS green_power_installations (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS conference_names (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS institutional_offices (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS funding_sources (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS keywords (
        id INTEGER PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS record_organizations (
        record_id INTEGER NOT NULL REFERENCES content_records(id) ON DELETE CASCADE,
        organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
        PRIMARY KEY (record_id, organization_id)
    );
    CREATE TABLE IF NOT EXISTS record_topics (
        record_id INTEGER NOT NULL REFERENCES content_records(id) ON DELETE CASCADE,
        topic_id INTEGER NOT NULL REFERENCES sustainability_topics(id) ON DELETE CASCADE,
        PRIMARY KEY (record_id, topic_id)
    );
    CREATE TABLE IF NOT EXISTS record_disciplines (
        record_id INTEGER NOT NULL REFERENCES content_records(id) ON DELETE CASCADE,
        discipline_id INTEGER NOT NULL REFERENCES academic_disciplines(id) ON DELETE CASCADE,
        PRIMARY KEY (record_id, discipline_id)
    );
    CREATE TABLE IF NOT EXISTS record_institutions (
        record_id INTEGER NOT NULL REFERENCES content_records(id) ON DELETE CASCADE,
        office_id INTEGER NOT NULL REFERENCES institutional_offices(id) ON DELETE CASCADE,
        PRIMARY KEY (record_id, office_id)
    );
    CREATE TABLE IF NOT EXISTS record_keywords (
        record_id INTEGER NOT NULL REFERENCES content_records(id) ON DELETE CASCADE,
        keyword_id INTEGER NOT NULL REFERENCES keywords(id) ON DELETE CASCADE,
        PRIMARY KEY (record_id, keyword_id)
    );

    CREATE TABLE IF NOT EXISTS academic_programs (
        record_id INTEGER PRIMARY KEY REFERENCES content_records(id) ON DELETE CASCADE,
        program_type_id INTEGER REFERENCES program_types(id)
    );
    CREATE TABLE IF NOT EXISTS course_materials (
        record_id INTEGER PRIMARY KEY REFERENCES content_records(id) ON DELETE CASCADE,
        material_type TEXT,
        course_level TEXT
    );
    CREATE TABLE IF NOT EXISTS publications (
        record_id INTEGER PRIMARY KEY REFERENCES content_records(id) ON DELETE CASCADE,
        material_type_id INTEGER REFERENCES publication_material_types(id)
    );
    CREATE TABLE IF NOT EXISTS presentations (
        record_id INTEGER PRIMARY KEY REFERENCES content_records(id) ON DELETE CASCADE,
        conference_name_id INTEGER REFERENCES conference_names(id)
    );
    CREATE TABLE IF NOT EXISTS outreach_materials (
        record_id INTEGER PRIMARY KEY REFERENCES content_records(id) ON DELETE CASCADE,
        material_type TEXT
    );
    CREATE TABLE IF NOT EXISTS green_power_projects (
        record_id INTEGER PRIMARY KEY REFERENCES content_records(id) ON DELETE CASCADE,
        ownership_type TEXT NOT NULL DEFAULT 'unknown',
        project_size INTEGER,
        date_installed TEXT
    );
    CREATE TABLE IF NOT EXISTS green_power_project_installations (
        record_id INTEGER NOT NULL REFERENCES green_power_projects(record_id) ON DELETE CASCADE,
        installation_id INTEGER NOT NULL REFERENCES green_power_installations(id) ON DELETE CASCADE,
        PRIMARY KEY (record_id, installation_id)
    );
    CREATE TABLE IF NOT EXISTS green_funds (
        record_id INTEGER PRIMARY KEY REFERENCES content_records(id) ON DELETE CASCADE,
        student_fee INTEGER,
        annual_budget INTEGER,
        revolving_fund TEXT
    );
    CREATE TABLE IF NOT EXISTS green_fund_funding_sources (
        record_id INTEGER NOT NULL REFERENCES green_funds(record_id) ON DELETE CASCADE,
        source_id INTEGER NOT NULL REFERENCES funding_sources(id) ON DELETE CASCADE,
        PRIMARY KEY (record_id, source_id)
    );

    CREATE VIRTUAL TABLE IF NOT EXISTS content_fts USING fts5(
        title,
        description,
        keywords
    );
";

/// Run all outstanding migrations, returning the resulting schema version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current < 1 {
        apply(conn, 1, MIGRATION_V1)?;
    }

    Ok(SCHEMA_VERSION)
}

fn apply(conn: &Connection, version: u32, sql: &str) -> Result<()> {
    tracing::debug!("applying schema migration v{version}");
    conn.execute_batch("BEGIN")?;
    match conn.execute_batch(sql) {
        Ok(()) => {
            // PRAGMA does not accept bound parameters
            conn.execute_batch(&format!("PRAGMA user_version = {version}"))?;
            conn.execute_batch("COMMIT")?;
            Ok(())
        }
        Err(e) => {
            conn.execute_batch("ROLLBACK").ok();
            Err(e.into())
        }
    }
}
