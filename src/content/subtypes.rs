//! Sub-type rows and their static choice domains
//!
//! Sub-type tables hold the attributes that do not exist on the shared base
//! table. Filters over these attributes resolve record ids here first, then
//! narrow the base collection by id membership.

use chrono::NaiveDate;
use rusqlite::params;

use crate::error::Result;
use crate::storage::Database;

/// Green power ownership models.
pub const OWNERSHIP_TYPES: &[(&str, &str)] = &[
    ("unknown", "Unknown"),
    ("institution-owned", "Institution Owned"),
    ("third-party-lease", "Third-party Owned (Lease)"),
    (
        "third-party-purchase",
        "Third-party Owned (Power Purchase Agreement)",
    ),
];

/// Course material types.
pub const MATERIAL_TYPES: &[(&str, &str)] = &[
    ("assignment", "Assignment or Exercise"),
    ("syllabus", "Syllabus"),
    ("course", "Course Presentation"),
];

/// Course levels.
pub const COURSE_LEVELS: &[(&str, &str)] = &[
    ("introductory", "Introductory"),
    ("intermediate", "Intermediate"),
    ("advanced", "Advanced"),
];

/// Outreach material types.
pub const OUTREACH_TYPES: &[(&str, &str)] = &[
    ("flyer", "Flyer/Brochure"),
    ("guide", "Guide"),
    ("infographics", "Infographics"),
    ("logo", "Logo"),
    ("map", "Map"),
    ("other", "Other"),
    ("signs/poster", "Signs/Poster"),
    ("sticker", "Sticker"),
];

/// Primary funding source names for green funds.
pub const FUNDING_SOURCE_NAMES: &[&str] = &[
    "Donations (Alumni)",
    "Donations (General)",
    "Institutional Funds",
    "Student Fees",
    "Student Government Funds",
    "Other",
];

pub fn insert_academic_program(
    db: &Database,
    record_id: i64,
    program_type_id: Option<i64>,
) -> Result<()> {
    db.conn().execute(
        "INSERT INTO academic_programs (record_id, program_type_id) VALUES (?, ?)",
        params![record_id, program_type_id],
    )?;
    Ok(())
}

pub fn insert_course_material(
    db: &Database,
    record_id: i64,
    material_type: Option<&str>,
    course_level: Option<&str>,
) -> Result<()> {
    db.conn().execute(
        "INSERT INTO course_materials (record_id, material_type, course_level) VALUES (?, ?, ?)",
        params![record_id, material_type, course_level],
    )?;
    Ok(())
}

pub fn insert_publication(
    db: &Database,
    record_id: i64,
    material_type_id: Option<i64>,
) -> Result<()> {
    db.conn().execute(
        "INSERT INTO publications (record_id, material_type_id) VALUES (?, ?)",
        params![record_id, material_type_id],
    )?;
    Ok(())
}

pub fn insert_presentation(
    db: &Database,
    record_id: i64,
    conference_name_id: Option<i64>,
) -> Result<()> {
    db.conn().execute(
        "INSERT INTO presentations (record_id, conference_name_id) VALUES (?, ?)",
        params![record_id, conference_name_id],
    )?;
    Ok(())
}

pub fn insert_outreach_material(
    db: &Database,
    record_id: i64,
    material_type: Option<&str>,
) -> Result<()> {
    db.conn().execute(
        "INSERT INTO outreach_materials (record_id, material_type) VALUES (?, ?)",
        params![record_id, material_type],
    )?;
    Ok(())
}

pub fn insert_green_power_project(
    db: &Database,
    record_id: i64,
    ownership_type: &str,
    project_size: Option<i64>,
    date_installed: Option<NaiveDate>,
) -> Result<()> {
    db.conn().execute(
        "INSERT INTO green_power_projects
            (record_id, ownership_type, project_size, date_installed)
         VALUES (?, ?, ?, ?)",
        params![
            record_id,
            ownership_type,
            project_size,
            date_installed.map(|d| d.to_string()),
        ],
    )?;
    Ok(())
}

pub fn link_installation(db: &Database, record_id: i64, installation_id: i64) -> Result<()> {
    db.conn().execute(
        "INSERT OR IGNORE INTO green_power_project_installations
            (record_id, installation_id)
         VALUES (?, ?)",
        params![record_id, installation_id],
    )?;
    Ok(())
}

pub fn insert_green_fund(
    db: &Database,
    record_id: i64,
    student_fee: Option<i64>,
    annual_budget: Option<i64>,
    revolving_fund: Option<&str>,
) -> Result<()> {
    db.conn().execute(
        "INSERT INTO green_funds (record_id, student_fee, annual_budget, revolving_fund)
         VALUES (?, ?, ?, ?)",
        params![record_id, student_fee, annual_budget, revolving_fund],
    )?;
    Ok(())
}

pub fn link_funding_source(db: &Database, record_id: i64, source_id: i64) -> Result<()> {
    db.conn().execute(
        "INSERT OR IGNORE INTO green_fund_funding_sources (record_id, source_id) VALUES (?, ?)",
        params![record_id, source_id],
    )?;
    Ok(())
}
