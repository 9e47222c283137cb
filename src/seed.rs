//! Demo dataset
//!
//! Seeds a small but fully linked dataset covering every kind, so a fresh
//! install has something to browse and the CLI tests have fixtures.

use chrono::{NaiveDate, TimeZone, Utc};
use tracing::info;

use crate::app::AppContext;
use crate::content::{ContentKind, NewRecord, Permission, record, subtypes};
use crate::error::Result;
use crate::metadata::{self, NewOrganization, Vocab};
use crate::search;

/// What the seeder created.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub organizations: usize,
    pub records: usize,
}

pub fn seed_demo(ctx: &AppContext) -> Result<SeedSummary> {
    let db = &ctx.db;
    let mut summary = SeedSummary::default();

    let maple = NewOrganization::new("Maple State University")
        .country("US", "United States")
        .state("VT")
        .enrollment_fte(12_500)
        .institution_type("Doctoral/Research")
        .insert(db)?;
    let cedar = NewOrganization::new("Cedar Community College")
        .country("US", "United States")
        .state("OR")
        .enrollment_fte(3_200)
        .institution_type("Associate")
        .insert(db)?;
    let laurier = NewOrganization::new("Laurier Ridge University")
        .country("CA", "Canada")
        .state("ON")
        .enrollment_fte(22_000)
        .institution_type("Master")
        .insert(db)?;
    summary.organizations = 3;

    let energy = metadata::insert_topic(db, "energy", "Energy", 1)?;
    let waste = metadata::insert_topic(db, "waste", "Waste", 2)?;
    let curriculum = metadata::insert_topic(db, "curriculum", "Curriculum", 3)?;

    let solar_kw = metadata::insert_keyword(db, "solar", "Solar")?;
    let recycling_kw = metadata::insert_keyword(db, "recycling", "Recycling")?;

    let env_studies = Vocab::AcademicDiscipline.insert(db, "Environmental Studies")?;
    let engineering = Vocab::AcademicDiscipline.insert(db, "Engineering")?;
    let sustainability_office = Vocab::InstitutionalOffice.insert(db, "Sustainability Office")?;
    let minor = Vocab::ProgramType.insert(db, "Minor")?;
    let report = Vocab::PublicationMaterialType.insert(db, "Report")?;
    let conference = Vocab::ConferenceName.insert(db, "Annual Sustainability Summit")?;
    let solar_install = Vocab::GreenPowerInstallation.insert(db, "Solar Photovoltaics")?;
    for name in subtypes::FUNDING_SOURCE_NAMES {
        Vocab::FundingSource.insert(db, name)?;
    }
    let student_fees = Vocab::FundingSource.insert(db, "Student Fees")?;

    let published = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).single();

    let study = NewRecord::new(ContentKind::CaseStudy, "Campus Solar Transition")
        .description("How a midsize campus moved to 60% on-site solar generation.")
        .published(published(2023, 4, 12).unwrap_or_else(Utc::now))
        .permission(Permission::Open)
        .date_created(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap_or_default())
        .with_images()
        .insert(db)?;
    record::link_organization(db, study, maple)?;
    record::link_topic(db, study, energy)?;
    record::link_keyword(db, study, solar_kw)?;
    record::link_office(db, study, sustainability_office)?;

    let program = NewRecord::new(ContentKind::AcademicProgram, "Sustainability Minor")
        .description("An interdisciplinary minor open to all undergraduates.")
        .published(published(2022, 9, 1).unwrap_or_else(Utc::now))
        .insert(db)?;
    record::link_organization(db, program, laurier)?;
    record::link_topic(db, program, curriculum)?;
    record::link_discipline(db, program, env_studies)?;
    subtypes::insert_academic_program(db, program, Some(minor))?;

    let course = NewRecord::new(ContentKind::CourseMaterial, "Intro to Circular Economy Syllabus")
        .published(published(2023, 1, 20).unwrap_or_else(Utc::now))
        .insert(db)?;
    record::link_organization(db, course, cedar)?;
    record::link_topic(db, course, waste)?;
    record::link_discipline(db, course, engineering)?;
    subtypes::insert_course_material(db, course, Some("syllabus"), Some("introductory"))?;

    let publication = NewRecord::new(ContentKind::Publication, "Annual Waste Diversion Report")
        .description("Diversion rates and program costs across three years.")
        .published(published(2023, 7, 3).unwrap_or_else(Utc::now))
        .insert(db)?;
    record::link_organization(db, publication, maple)?;
    record::link_topic(db, publication, waste)?;
    record::link_keyword(db, publication, recycling_kw)?;
    subtypes::insert_publication(db, publication, Some(report))?;

    let talk = NewRecord::new(ContentKind::Presentation, "Financing Campus Renewables")
        .published(published(2023, 10, 9).unwrap_or_else(Utc::now))
        .insert(db)?;
    record::link_organization(db, talk, laurier)?;
    record::link_topic(db, talk, energy)?;
    subtypes::insert_presentation(db, talk, Some(conference))?;

    let outreach = NewRecord::new(ContentKind::OutreachMaterial, "Recycling Station Signage")
        .published(published(2022, 2, 14).unwrap_or_else(Utc::now))
        .with_images()
        .insert(db)?;
    record::link_organization(db, outreach, cedar)?;
    record::link_topic(db, outreach, waste)?;
    subtypes::insert_outreach_material(db, outreach, Some("signs/poster"))?;

    let array = NewRecord::new(ContentKind::GreenPowerProject, "West Field Solar Array")
        .description("A 2.4 MW ground-mounted array on former parking.")
        .published(published(2024, 5, 28).unwrap_or_else(Utc::now))
        .permission(Permission::Open)
        .with_images()
        .insert(db)?;
    record::link_organization(db, array, maple)?;
    record::link_topic(db, array, energy)?;
    record::link_keyword(db, array, solar_kw)?;
    subtypes::insert_green_power_project(
        db,
        array,
        "institution-owned",
        Some(2_400),
        NaiveDate::from_ymd_opt(2024, 4, 15),
    )?;
    subtypes::link_installation(db, array, solar_install)?;

    let fund = NewRecord::new(ContentKind::GreenFund, "Student Green Initiative Fund")
        .description("A fee-funded revolving fund for student-led projects.")
        .published(published(2021, 11, 2).unwrap_or_else(Utc::now))
        .insert(db)?;
    record::link_organization(db, fund, laurier)?;
    record::link_topic(db, fund, energy)?;
    subtypes::insert_green_fund(db, fund, Some(12), Some(180_000), Some("yes"))?;
    subtypes::link_funding_source(db, fund, student_fees)?;

    let photo = NewRecord::new(ContentKind::Photograph, "Rooftop Garden Harvest")
        .published(published(2023, 8, 19).unwrap_or_else(Utc::now))
        .permission(Permission::Open)
        .with_images()
        .insert(db)?;
    record::link_organization(db, photo, cedar)?;
    record::link_topic(db, photo, waste)?;

    let video = NewRecord::new(ContentKind::Video, "Wind Turbine Campus Tour")
        .published(published(2024, 1, 30).unwrap_or_else(Utc::now))
        .insert(db)?;
    record::link_organization(db, video, maple)?;
    record::link_topic(db, video, energy)?;

    // One draft so staff listings differ from member listings.
    NewRecord::new(ContentKind::CaseStudy, "Geothermal Feasibility Draft").insert(db)?;

    summary.records = 11;
    search::rebuild_index(db)?;
    info!(
        organizations = summary.organizations,
        records = summary.records,
        "demo data seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::{Audience, BrowseRequest, FilterSet};

    #[test]
    fn test_seed_is_browsable() {
        let ctx = AppContext::in_memory().unwrap();
        let summary = seed_demo(&ctx).unwrap();
        assert_eq!(summary.records, 11);

        let set = FilterSet::for_kind(None);
        let request = BrowseRequest::new(None, Audience::Member);
        let result = set
            .browse(&ctx.filter_ctx(), &ctx.gate, &request)
            .unwrap();
        assert_eq!(result.total, 10, "drafts stay hidden from members");
    }

    #[test]
    fn test_seeded_search_finds_solar_records() {
        let ctx = AppContext::in_memory().unwrap();
        seed_demo(&ctx).unwrap();

        let set = FilterSet::for_kind(None);
        let request =
            BrowseRequest::new(None, Audience::Member).with_param("search", "solar");
        let result = set
            .browse(&ctx.filter_ctx(), &ctx.gate, &request)
            .unwrap();
        assert!(result.total >= 2);
    }
}
