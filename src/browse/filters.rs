//! The facet filters
//!
//! Every facet implements [`FacetFilter`]: given the collection built so
//! far and the raw values from the request, it returns the narrowed
//! collection. Two rules hold for every filter:
//!
//! * no values (or only blank ones) leaves the collection untouched
//! * values outside the facet's choice domain are silently dropped, and if
//!   nothing recognizable remains the collection is untouched
//!
//! Sub-type facets (program type, ownership, fee buckets and so on) cannot
//! be expressed as base-table columns, so they resolve record ids in their
//! sub-type table first and then narrow the base collection by membership.

use chrono::{Datelike, Utc};
use rusqlite::types::Value;

use crate::browse::buckets::{self, NumericBucket};
use crate::browse::choices::{Choice, ChoiceCache, choices_from_pairs};
use crate::browse::localflavor::{CA_PROVINCES, US_STATES};
use crate::browse::query::{Cond, FilteredSet};
use crate::content::kinds::CONTENT_KINDS;
use crate::content::subtypes::{COURSE_LEVELS, MATERIAL_TYPES, OUTREACH_TYPES, OWNERSHIP_TYPES};
use crate::error::Result;
use crate::metadata::{self, CARNEGIE_CLASSES, Vocab};
use crate::search::{self, SearchBackend};
use crate::storage::Database;

/// Everything a filter may need while applying.
pub struct FilterContext<'a> {
    pub db: &'a Database,
    pub search: &'a dyn SearchBackend,
    pub cache: &'a ChoiceCache,
}

/// One facet of the browse surface.
pub trait FacetFilter {
    /// The request parameter this facet answers to.
    fn name(&self) -> &'static str;

    /// The values a visitor may select. Free-text facets return an empty
    /// list.
    fn choices(&self, ctx: &FilterContext<'_>) -> Result<Vec<Choice>>;

    /// Narrow `set` by `values`.
    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet>;
}

/// Keep only the values present in the choice domain, preserving request
/// order and dropping duplicates.
fn recognized(values: &[String], choices: &[Choice]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() || kept.iter().any(|k| k == value) {
            continue;
        }
        if choices.iter().any(|c| c.value == value) {
            kept.push(value.to_string());
        }
    }
    kept
}

/// Recognized values parsed as row ids.
fn recognized_ids(values: &[String], choices: &[Choice]) -> Vec<i64> {
    recognized(values, choices)
        .iter()
        .filter_map(|v| v.parse().ok())
        .collect()
}

fn string_values(values: Vec<String>) -> Vec<Value> {
    values.into_iter().map(Value::from).collect()
}

fn id_values(ids: Vec<i64>) -> Vec<Value> {
    ids.into_iter().map(Value::from).collect()
}

// ---------------------------------------------------------------------------
// Base-table facets

/// Restricts to records carrying images ("gallery view").
pub struct GalleryFilter;

impl FacetFilter for GalleryFilter {
    fn name(&self) -> &'static str {
        "gallery"
    }

    fn choices(&self, _ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        Ok(vec![Choice::new("true", "Only records with images")])
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        if recognized(values, &self.choices(ctx)?).is_empty() {
            return Ok(set);
        }
        Ok(set.map_query(|q| q.filter(Cond::HasImages)))
    }
}

/// Free-text search. Narrows to matching ids and records the relevance
/// order as the set's rank hint so the ordering step can fall back to it.
pub struct SearchFilter;

impl FacetFilter for SearchFilter {
    fn name(&self) -> &'static str {
        "search"
    }

    fn choices(&self, _ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        Ok(Vec::new())
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        mut set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let Some(text) = values.iter().map(|v| v.trim()).find(|v| !v.is_empty()) else {
            return Ok(set);
        };
        let ids = search::query_or_empty(ctx.search, ctx.db, text);
        set = set.map_query(|q| q.filter(Cond::IdIn(ids.clone())));
        set.rank_hint = Some(ids);
        Ok(set)
    }
}

/// Restricts by content kind.
pub struct KindFilter;

impl FacetFilter for KindFilter {
    fn name(&self) -> &'static str {
        "kind"
    }

    fn choices(&self, _ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        Ok(CONTENT_KINDS
            .iter()
            .map(|kind| Choice::new(kind.slug(), kind.label()))
            .collect())
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let kinds = recognized(values, &self.choices(ctx)?);
        if kinds.is_empty() {
            return Ok(set);
        }
        Ok(set.map_query(|q| q.filter(Cond::KindIn(kinds))))
    }
}

/// Restricts by sustainability topic, selected by topic slug.
pub struct TopicFilter;

impl FacetFilter for TopicFilter {
    fn name(&self) -> &'static str {
        "topic"
    }

    fn choices(&self, ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        ctx.cache.get_or_compute(self.name(), || {
            Ok(metadata::topic_choices(ctx.db)?
                .into_iter()
                .map(|(slug, name)| Choice::new(slug, name))
                .collect())
        })
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let slugs = recognized(values, &self.choices(ctx)?);
        if slugs.is_empty() {
            return Ok(set);
        }
        let placeholders = vec!["?"; slugs.len()].join(", ");
        let mut stmt = ctx.db.conn().prepare(&format!(
            "SELECT id FROM sustainability_topics WHERE slug IN ({placeholders})"
        ))?;
        let ids = stmt
            .query_map(rusqlite::params_from_iter(&slugs), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(set.map_query(|q| {
            q.filter(Cond::Linked {
                table: "record_topics",
                column: "topic_id",
                values: id_values(ids),
            })
        }))
    }
}

/// Restricts to records submitted by a given organization.
pub struct OrgFilter;

impl FacetFilter for OrgFilter {
    fn name(&self) -> &'static str {
        "org"
    }

    fn choices(&self, ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        ctx.cache.get_or_compute(self.name(), || {
            Ok(metadata::organization_choices(ctx.db)?
                .into_iter()
                .map(|(id, name)| Choice::new(id.to_string(), name))
                .collect())
        })
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let ids = recognized_ids(values, &self.choices(ctx)?);
        if ids.is_empty() {
            return Ok(set);
        }
        Ok(set.map_query(|q| {
            q.filter(Cond::Linked {
                table: "record_organizations",
                column: "organization_id",
                values: id_values(ids),
            })
        }))
    }
}

/// Restricts by keyword tag, selected by slug. Multiple tags chain
/// conjunctively: a record must carry every selected tag.
pub struct TagFilter;

impl FacetFilter for TagFilter {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn choices(&self, ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        ctx.cache.get_or_compute(self.name(), || {
            Ok(metadata::keyword_choices(ctx.db)?
                .into_iter()
                .map(|(slug, name)| Choice::new(slug, name))
                .collect())
        })
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let slugs = recognized(values, &self.choices(ctx)?);
        if slugs.is_empty() {
            return Ok(set);
        }
        let placeholders = vec!["?"; slugs.len()].join(", ");
        let mut stmt = ctx.db.conn().prepare(&format!(
            "SELECT id FROM keywords WHERE slug IN ({placeholders})"
        ))?;
        let ids = stmt
            .query_map(rusqlite::params_from_iter(&slugs), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        let mut set = set;
        for id in ids {
            set = set.map_query(|q| {
                q.filter(Cond::Linked {
                    table: "record_keywords",
                    column: "keyword_id",
                    values: vec![Value::from(id)],
                })
            });
        }
        Ok(set)
    }
}

/// Restricts by the submitting institution's enrollment bucket. Buckets are
/// resolved to organization ids first, then records by link membership.
pub struct EnrollmentFilter;

impl FacetFilter for EnrollmentFilter {
    fn name(&self) -> &'static str {
        "fte"
    }

    fn choices(&self, _ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        Ok(buckets::ENROLLMENT_BUCKETS
            .iter()
            .map(|b| Choice::new(b.slug, b.label))
            .collect())
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let slugs = recognized(values, &self.choices(ctx)?);
        if slugs.is_empty() {
            return Ok(set);
        }
        let mut org_ids: Vec<i64> = Vec::new();
        for slug in &slugs {
            if let Some(bucket) = buckets::bucket_by_slug(buckets::ENROLLMENT_BUCKETS, slug) {
                org_ids.extend(metadata::organizations_in_fte_range(
                    ctx.db, bucket.min, bucket.max,
                )?);
            }
        }
        org_ids.sort_unstable();
        org_ids.dedup();
        Ok(set.map_query(|q| {
            q.filter(Cond::Linked {
                table: "record_organizations",
                column: "organization_id",
                values: id_values(org_ids),
            })
        }))
    }
}

/// Restricts by submitting institution's country (ISO code). The choice
/// list only offers countries that actually have published records.
pub struct CountryFilter;

impl FacetFilter for CountryFilter {
    fn name(&self) -> &'static str {
        "country"
    }

    fn choices(&self, ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        ctx.cache.get_or_compute(self.name(), || {
            Ok(metadata::country_choices(ctx.db)?
                .into_iter()
                .map(|(iso, name)| Choice::new(iso, name))
                .collect())
        })
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let isos = recognized(values, &self.choices(ctx)?);
        if isos.is_empty() {
            return Ok(set);
        }
        Ok(set.map_query(|q| {
            q.filter(Cond::OrgAttr {
                column: "country_iso",
                values: string_values(isos),
            })
        }))
    }
}

/// An organization-attribute facet with a static choice table (US state,
/// Canadian province, Carnegie class).
pub struct OrgAttrFilter {
    name: &'static str,
    column: &'static str,
    pairs: &'static [(&'static str, &'static str)],
}

impl FacetFilter for OrgAttrFilter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn choices(&self, _ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        Ok(choices_from_pairs(self.pairs))
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let kept = recognized(values, &self.choices(ctx)?);
        if kept.is_empty() {
            return Ok(set);
        }
        let column = self.column;
        Ok(set.map_query(|q| {
            q.filter(Cond::OrgAttr {
                column,
                values: string_values(kept),
            })
        }))
    }
}

pub fn state_filter() -> OrgAttrFilter {
    OrgAttrFilter {
        name: "state",
        column: "state",
        pairs: US_STATES,
    }
}

pub fn province_filter() -> OrgAttrFilter {
    OrgAttrFilter {
        name: "province",
        column: "state",
        pairs: CA_PROVINCES,
    }
}

pub fn institution_type_filter() -> OrgAttrFilter {
    OrgAttrFilter {
        name: "institution-type",
        column: "institution_type",
        pairs: CARNEGIE_CLASSES,
    }
}

/// Which date column a year facet reads.
#[derive(Debug, Clone, Copy)]
pub enum YearField {
    Published,
    Created,
}

/// Restricts by year. Publication years are offered as the full span from
/// newest to oldest published record; creation years only as the years
/// actually present. Either way an empty dataset degrades to a single
/// current-year choice rather than an empty facet.
pub struct YearFilter {
    name: &'static str,
    field: YearField,
}

pub fn published_year_filter() -> YearFilter {
    YearFilter {
        name: "year",
        field: YearField::Published,
    }
}

pub fn created_year_filter() -> YearFilter {
    YearFilter {
        name: "created",
        field: YearField::Created,
    }
}

impl FacetFilter for YearFilter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn choices(&self, ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        ctx.cache.get_or_compute(self.name, || {
            let mut years: Vec<String> = match self.field {
                YearField::Published => {
                    let span: (Option<i64>, Option<i64>) = ctx.db.conn().query_row(
                        "SELECT CAST(strftime('%Y', MIN(published)) AS INTEGER),
                                CAST(strftime('%Y', MAX(published)) AS INTEGER)
                         FROM content_records
                         WHERE status = 'published' AND published IS NOT NULL",
                        [],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )?;
                    match span {
                        (Some(min), Some(max)) => {
                            (min..=max).rev().map(|y| y.to_string()).collect()
                        }
                        _ => Vec::new(),
                    }
                }
                YearField::Created => {
                    let mut stmt = ctx.db.conn().prepare(
                        "SELECT DISTINCT strftime('%Y', date_created) AS y
                         FROM content_records
                         WHERE status = 'published' AND date_created IS NOT NULL
                         ORDER BY y DESC",
                    )?;
                    stmt.query_map([], |row| row.get(0))?
                        .collect::<rusqlite::Result<Vec<_>>>()?
                }
            };
            if years.is_empty() {
                years.push(Utc::now().year().to_string());
            }
            Ok(years
                .into_iter()
                .map(|y| Choice::new(y.clone(), y))
                .collect())
        })
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let years: Vec<i64> = recognized(values, &self.choices(ctx)?)
            .iter()
            .filter_map(|y| y.parse().ok())
            .collect();
        let Some(year) = years.first().copied() else {
            return Ok(set);
        };
        let cond = match self.field {
            YearField::Published => Cond::PublishedInYear(year),
            YearField::Created => Cond::CreatedInYear(year),
        };
        Ok(set.map_query(|q| q.filter(cond)))
    }
}

// ---------------------------------------------------------------------------
// Linked-table facets

/// A facet over an id-valued column of a link or sub-type table, with its
/// choice list drawn from a vocabulary table.
pub struct LinkedVocabFilter {
    name: &'static str,
    table: &'static str,
    column: &'static str,
    vocab: Vocab,
}

impl FacetFilter for LinkedVocabFilter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn choices(&self, ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        ctx.cache.get_or_compute(self.name, || {
            Ok(self
                .vocab
                .choices(ctx.db)?
                .into_iter()
                .map(|(id, name)| Choice::new(id.to_string(), name))
                .collect())
        })
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let ids = recognized_ids(values, &self.choices(ctx)?);
        if ids.is_empty() {
            return Ok(set);
        }
        let (table, column) = (self.table, self.column);
        Ok(set.map_query(|q| {
            q.filter(Cond::Linked {
                table,
                column,
                values: id_values(ids),
            })
        }))
    }
}

pub fn discipline_filter() -> LinkedVocabFilter {
    LinkedVocabFilter {
        name: "discipline",
        table: "record_disciplines",
        column: "discipline_id",
        vocab: Vocab::AcademicDiscipline,
    }
}

pub fn office_filter() -> LinkedVocabFilter {
    LinkedVocabFilter {
        name: "office",
        table: "record_institutions",
        column: "office_id",
        vocab: Vocab::InstitutionalOffice,
    }
}

pub fn program_type_filter() -> LinkedVocabFilter {
    LinkedVocabFilter {
        name: "program-type",
        table: "academic_programs",
        column: "program_type_id",
        vocab: Vocab::ProgramType,
    }
}

pub fn publication_type_filter() -> LinkedVocabFilter {
    LinkedVocabFilter {
        name: "publication-type",
        table: "publications",
        column: "material_type_id",
        vocab: Vocab::PublicationMaterialType,
    }
}

pub fn conference_filter() -> LinkedVocabFilter {
    LinkedVocabFilter {
        name: "conference",
        table: "presentations",
        column: "conference_name_id",
        vocab: Vocab::ConferenceName,
    }
}

pub fn installation_filter() -> LinkedVocabFilter {
    LinkedVocabFilter {
        name: "installation",
        table: "green_power_project_installations",
        column: "installation_id",
        vocab: Vocab::GreenPowerInstallation,
    }
}

pub fn funding_source_filter() -> LinkedVocabFilter {
    LinkedVocabFilter {
        name: "funding-source",
        table: "green_fund_funding_sources",
        column: "source_id",
        vocab: Vocab::FundingSource,
    }
}

/// A facet over a slug-valued column of a sub-type table, with a static
/// choice table.
pub struct LinkedChoiceFilter {
    name: &'static str,
    table: &'static str,
    column: &'static str,
    pairs: &'static [(&'static str, &'static str)],
}

impl FacetFilter for LinkedChoiceFilter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn choices(&self, _ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        Ok(choices_from_pairs(self.pairs))
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let kept = recognized(values, &self.choices(ctx)?);
        if kept.is_empty() {
            return Ok(set);
        }
        let (table, column) = (self.table, self.column);
        Ok(set.map_query(|q| {
            q.filter(Cond::Linked {
                table,
                column,
                values: string_values(kept),
            })
        }))
    }
}

pub fn material_type_filter() -> LinkedChoiceFilter {
    LinkedChoiceFilter {
        name: "material-type",
        table: "course_materials",
        column: "material_type",
        pairs: MATERIAL_TYPES,
    }
}

pub fn course_level_filter() -> LinkedChoiceFilter {
    LinkedChoiceFilter {
        name: "course-level",
        table: "course_materials",
        column: "course_level",
        pairs: COURSE_LEVELS,
    }
}

pub fn outreach_type_filter() -> LinkedChoiceFilter {
    LinkedChoiceFilter {
        name: "outreach-type",
        table: "outreach_materials",
        column: "material_type",
        pairs: OUTREACH_TYPES,
    }
}

pub fn ownership_filter() -> LinkedChoiceFilter {
    LinkedChoiceFilter {
        name: "ownership",
        table: "green_power_projects",
        column: "ownership_type",
        pairs: OWNERSHIP_TYPES,
    }
}

pub fn revolving_filter() -> LinkedChoiceFilter {
    LinkedChoiceFilter {
        name: "revolving",
        table: "green_funds",
        column: "revolving_fund",
        pairs: &[("yes", "Yes"), ("no", "No")],
    }
}

// ---------------------------------------------------------------------------
// Bucket facets over sub-type values

/// A facet over a numeric sub-type column, bucketed by a static table.
/// Values are read into memory and tested against the selected buckets, so
/// bucket semantics live in one place regardless of the SQL dialect.
pub struct BucketFilter {
    name: &'static str,
    table: &'static str,
    column: &'static str,
    buckets: &'static [NumericBucket],
}

impl FacetFilter for BucketFilter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn choices(&self, _ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        Ok(self
            .buckets
            .iter()
            .map(|b| Choice::new(b.slug, b.label))
            .collect())
    }

    fn apply(
        &self,
        ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let slugs = recognized(values, &self.choices(ctx)?);
        if slugs.is_empty() {
            return Ok(set);
        }
        let selected: Vec<NumericBucket> = slugs
            .iter()
            .filter_map(|slug| buckets::bucket_by_slug(self.buckets, slug))
            .collect();

        let mut stmt = ctx.db.conn().prepare(&format!(
            "SELECT record_id, {} FROM {} WHERE {} IS NOT NULL",
            self.column, self.table, self.column
        ))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut ids: Vec<i64> = rows
            .into_iter()
            .filter(|(_, value)| selected.iter().any(|b| b.contains(*value)))
            .map(|(record_id, _)| record_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(set.map_query(|q| q.filter(Cond::IdIn(ids))))
    }
}

pub fn project_size_filter() -> BucketFilter {
    BucketFilter {
        name: "size",
        table: "green_power_projects",
        column: "project_size",
        buckets: buckets::PROJECT_SIZE_BUCKETS,
    }
}

pub fn student_fee_filter() -> BucketFilter {
    BucketFilter {
        name: "fee",
        table: "green_funds",
        column: "student_fee",
        buckets: buckets::STUDENT_FEE_BUCKETS,
    }
}

pub fn annual_budget_filter() -> BucketFilter {
    BucketFilter {
        name: "budget",
        table: "green_funds",
        column: "annual_budget",
        buckets: buckets::ANNUAL_BUDGET_BUCKETS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::choices::ChoiceCache;
    use crate::browse::query::RecordQuery;
    use crate::content::subtypes::{insert_green_fund, insert_green_power_project};
    use crate::content::{ContentKind, NewRecord, record};
    use crate::search::FtsIndex;
    use chrono::Utc;
    use std::time::Duration;

    fn ctx<'a>(db: &'a Database, cache: &'a ChoiceCache) -> FilterContext<'a> {
        static FTS: FtsIndex = FtsIndex;
        FilterContext {
            db,
            search: &FTS,
            cache,
        }
    }

    fn values(vs: &[&str]) -> Vec<String> {
        vs.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_values_leave_collection_untouched() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        NewRecord::new(ContentKind::Video, "A").insert(&db).unwrap();
        NewRecord::new(ContentKind::Video, "B").insert(&db).unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let set = KindFilter
            .apply(&ctx(&db, &cache), set, &values(&["", "  "]))
            .unwrap();
        assert_eq!(set.query.count(&db).unwrap(), 2);
    }

    #[test]
    fn test_unrecognized_values_are_dropped() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        NewRecord::new(ContentKind::Video, "A").insert(&db).unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let set = KindFilter
            .apply(&ctx(&db, &cache), set, &values(&["not-a-kind"]))
            .unwrap();
        assert_eq!(set.query.count(&db).unwrap(), 1, "identity on junk input");

        let set = FilteredSet::new(RecordQuery::new());
        let set = KindFilter
            .apply(&ctx(&db, &cache), set, &values(&["not-a-kind", "video"]))
            .unwrap();
        assert_eq!(set.query.count(&db).unwrap(), 1);
    }

    #[test]
    fn test_search_filter_sets_rank_hint() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        let id = NewRecord::new(ContentKind::CaseStudy, "Solar array")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        crate::search::index_record(&db, id, "Solar array", None, &[]).unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let set = SearchFilter
            .apply(&ctx(&db, &cache), set, &values(&["solar"]))
            .unwrap();
        assert_eq!(set.rank_hint, Some(vec![id]));
        assert_eq!(set.query.ids(&db).unwrap(), vec![id]);
    }

    #[test]
    fn test_search_with_no_matches_empties_the_collection() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        NewRecord::new(ContentKind::CaseStudy, "Solar array")
            .published(Utc::now())
            .insert(&db)
            .unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let set = SearchFilter
            .apply(&ctx(&db, &cache), set, &values(&["zebra"]))
            .unwrap();
        assert_eq!(set.query.count(&db).unwrap(), 0);
        assert_eq!(set.rank_hint, Some(Vec::new()));
    }

    #[test]
    fn test_enrollment_filter_uses_half_open_buckets() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        let org = metadata::NewOrganization::new("Boundary University")
            .enrollment_fte(10_000)
            .insert(&db)
            .unwrap();
        let rec = NewRecord::new(ContentKind::CaseStudy, "Boundary study")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        record::link_organization(&db, rec, org).unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let narrowed = EnrollmentFilter
            .apply(&ctx(&db, &cache), set, &values(&["5k_10k"]))
            .unwrap();
        assert_eq!(narrowed.query.count(&db).unwrap(), 0);

        let set = FilteredSet::new(RecordQuery::new());
        let narrowed = EnrollmentFilter
            .apply(&ctx(&db, &cache), set, &values(&["10k_20k"]))
            .unwrap();
        assert_eq!(narrowed.query.ids(&db).unwrap(), vec![rec]);
    }

    #[test]
    fn test_project_size_buckets_narrow_by_subtype_value() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        let small = NewRecord::new(ContentKind::GreenPowerProject, "Rooftop pilot")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        insert_green_power_project(&db, small, "institution-owned", Some(8), None).unwrap();
        let mid = NewRecord::new(ContentKind::GreenPowerProject, "Parking canopy")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        insert_green_power_project(&db, mid, "institution-owned", Some(100), None).unwrap();
        let large = NewRecord::new(ContentKind::GreenPowerProject, "Solar farm")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        insert_green_power_project(&db, large, "third-party-lease", Some(5_000), None).unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let narrowed = project_size_filter()
            .apply(&ctx(&db, &cache), set, &values(&["lt10"]))
            .unwrap();
        assert_eq!(narrowed.query.ids(&db).unwrap(), vec![small]);

        // 100 kW sits on a cutoff and belongs to the higher range; 5 MW
        // exactly is already "more than 5 MW".
        let set = FilteredSet::new(RecordQuery::new());
        let narrowed = project_size_filter()
            .apply(&ctx(&db, &cache), set, &values(&["101to1000"]))
            .unwrap();
        assert_eq!(narrowed.query.ids(&db).unwrap(), vec![mid]);

        let set = FilteredSet::new(RecordQuery::new());
        let narrowed = project_size_filter()
            .apply(&ctx(&db, &cache), set, &values(&["lt10", "gt5000"]))
            .unwrap();
        assert_eq!(narrowed.query.count(&db).unwrap(), 2);
    }

    #[test]
    fn test_inverted_budget_bucket_matches_nothing() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        let fund = NewRecord::new(ContentKind::GreenFund, "Midsize fund")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        insert_green_fund(&db, fund, None, Some(150_000), Some("no")).unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let narrowed = annual_budget_filter()
            .apply(&ctx(&db, &cache), set, &values(&["100000to499999"]))
            .unwrap();
        assert_eq!(narrowed.query.count(&db).unwrap(), 0);
    }

    #[test]
    fn test_tags_chain_conjunctively() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        let solar = metadata::insert_keyword(&db, "solar", "Solar").unwrap();
        let wind = metadata::insert_keyword(&db, "wind", "Wind").unwrap();

        let both = NewRecord::new(ContentKind::CaseStudy, "Hybrid microgrid")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        record::link_keyword(&db, both, solar).unwrap();
        record::link_keyword(&db, both, wind).unwrap();
        let solar_only = NewRecord::new(ContentKind::CaseStudy, "Solar carport")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        record::link_keyword(&db, solar_only, solar).unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let narrowed = TagFilter
            .apply(&ctx(&db, &cache), set, &values(&["solar", "wind"]))
            .unwrap();
        assert_eq!(narrowed.query.ids(&db).unwrap(), vec![both]);
    }

    #[test]
    fn test_year_choices_span_and_degrade() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));

        // Empty dataset degrades to the current year.
        let empty = published_year_filter().choices(&ctx(&db, &cache)).unwrap();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].value, Utc::now().year().to_string());

        cache.clear();
        let old = chrono::TimeZone::with_ymd_and_hms(&Utc, 2020, 3, 1, 0, 0, 0).unwrap();
        let new = chrono::TimeZone::with_ymd_and_hms(&Utc, 2023, 3, 1, 0, 0, 0).unwrap();
        NewRecord::new(ContentKind::Video, "Old").published(old).insert(&db).unwrap();
        NewRecord::new(ContentKind::Video, "New").published(new).insert(&db).unwrap();

        let years: Vec<_> = published_year_filter()
            .choices(&ctx(&db, &cache))
            .unwrap()
            .into_iter()
            .map(|c| c.value)
            .collect();
        // Full span, newest first, including the gap years.
        assert_eq!(years, vec!["2023", "2022", "2021", "2020"]);
    }

    #[test]
    fn test_revolving_filter() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        let yes = NewRecord::new(ContentKind::GreenFund, "Revolving fund")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        insert_green_fund(&db, yes, None, None, Some("yes")).unwrap();
        let no = NewRecord::new(ContentKind::GreenFund, "Grant fund")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        insert_green_fund(&db, no, None, None, Some("no")).unwrap();

        let set = FilteredSet::new(RecordQuery::new());
        let narrowed = revolving_filter()
            .apply(&ctx(&db, &cache), set, &values(&["yes"]))
            .unwrap();
        assert_eq!(narrowed.query.ids(&db).unwrap(), vec![yes]);
        let _ = no;
    }
}
