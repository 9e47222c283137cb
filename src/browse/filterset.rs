//! Facet set assembly and the browse entry point
//!
//! Each listing gets the shared facet set plus whatever its kind's browse
//! profile adds. Filters run in declaration order over a single
//! [`FilteredSet`]; the ordering facet always runs last so it can see the
//! rank hint a search may have left behind.

use std::collections::BTreeMap;

use tracing::debug;

use crate::browse::choices::Choice;
use crate::browse::filters::{
    self, CountryFilter, EnrollmentFilter, FacetFilter, FilterContext, GalleryFilter, KindFilter,
    OrgFilter, SearchFilter, TagFilter, TopicFilter,
};
use crate::browse::gate::{Audience, BrowseGate};
use crate::browse::ordering::{OrderingExtras, OrderingFilter};
use crate::browse::query::{Cond, FilteredSet, RecordQuery};
use crate::content::registry::{BrowseProfile, browse_profile};
use crate::content::{ContentKind, ContentRecord};
use crate::error::{HubError, Result};

/// A parsed browse request: which listing, who is asking, and the raw
/// facet values keyed by facet name.
#[derive(Debug, Clone, Default)]
pub struct BrowseRequest {
    pub kind: Option<ContentKind>,
    pub audience: Audience,
    params: BTreeMap<String, Vec<String>>,
}

impl BrowseRequest {
    pub fn new(kind: Option<ContentKind>, audience: Audience) -> Self {
        Self {
            kind,
            audience,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.entry(name.into()).or_default().push(value.into());
        self
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.params.get(name).map_or(&[], Vec::as_slice)
    }
}

/// A listing and the records it produced.
#[derive(Debug)]
pub struct BrowseResult {
    pub records: Vec<ContentRecord>,
    pub total: usize,
}

/// The facet filters for one listing.
pub struct FilterSet {
    kind: Option<ContentKind>,
    filters: Vec<Box<dyn FacetFilter>>,
    ordering: OrderingFilter,
}

impl FilterSet {
    /// Assemble the facet set for a listing, shared facets first and the
    /// kind's profile extras after.
    pub fn for_kind(kind: Option<ContentKind>) -> Self {
        let mut filters: Vec<Box<dyn FacetFilter>> = vec![
            Box::new(SearchFilter),
            Box::new(GalleryFilter),
            Box::new(TopicFilter),
            Box::new(OrgFilter),
            Box::new(TagFilter),
            Box::new(EnrollmentFilter),
            Box::new(CountryFilter),
            Box::new(filters::state_filter()),
            Box::new(filters::province_filter()),
            Box::new(filters::institution_type_filter()),
            Box::new(filters::published_year_filter()),
            Box::new(filters::created_year_filter()),
            Box::new(filters::discipline_filter()),
            Box::new(filters::office_filter()),
        ];

        let profile = browse_profile(kind);
        let mut extras = OrderingExtras::None;
        match profile {
            BrowseProfile::Default => {
                // The unscoped listing lets visitors narrow by kind.
                if kind.is_none() {
                    filters.push(Box::new(KindFilter));
                }
            }
            BrowseProfile::AcademicProgram => {
                filters.push(Box::new(filters::program_type_filter()));
            }
            BrowseProfile::CourseMaterial => {
                filters.push(Box::new(filters::material_type_filter()));
                filters.push(Box::new(filters::course_level_filter()));
            }
            BrowseProfile::OutreachMaterial => {
                filters.push(Box::new(filters::outreach_type_filter()));
            }
            BrowseProfile::Publication => {
                filters.push(Box::new(filters::publication_type_filter()));
            }
            BrowseProfile::Presentation => {
                filters.push(Box::new(filters::conference_filter()));
            }
            BrowseProfile::GreenPower => {
                filters.push(Box::new(filters::installation_filter()));
                filters.push(Box::new(filters::ownership_filter()));
                filters.push(Box::new(filters::project_size_filter()));
                extras = OrderingExtras::GreenPower;
            }
            BrowseProfile::GreenFund => {
                filters.push(Box::new(filters::student_fee_filter()));
                filters.push(Box::new(filters::annual_budget_filter()));
                filters.push(Box::new(filters::funding_source_filter()));
                filters.push(Box::new(filters::revolving_filter()));
                extras = OrderingExtras::GreenFund;
            }
        }

        Self {
            kind,
            filters,
            ordering: OrderingFilter::new(extras),
        }
    }

    /// Facet names in application order, ordering last.
    pub fn facet_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.filters.iter().map(|f| f.name()).collect();
        names.push(self.ordering.name());
        names
    }

    /// The choice lists for every facet of this listing.
    pub fn all_choices(&self, ctx: &FilterContext<'_>) -> Result<Vec<(&'static str, Vec<Choice>)>> {
        let mut out = Vec::with_capacity(self.filters.len() + 1);
        for filter in &self.filters {
            out.push((filter.name(), filter.choices(ctx)?));
        }
        out.push((self.ordering.name(), self.ordering.choices(ctx)?));
        Ok(out)
    }

    /// Run the listing for a request.
    pub fn browse(
        &self,
        ctx: &FilterContext<'_>,
        gate: &BrowseGate,
        request: &BrowseRequest,
    ) -> Result<BrowseResult> {
        if !gate.browse_allowed(request.audience, self.kind) {
            let listing = self
                .kind
                .map_or_else(|| "all".to_string(), |k| k.slug().to_string());
            return Err(HubError::AccessDenied(listing));
        }

        let mut query = RecordQuery::new();
        if let Some(kind) = self.kind {
            query = query.filter(Cond::KindEq(kind.slug().to_string()));
        }
        query = gate.narrow(request.audience, query);

        let mut set = FilteredSet::new(query);
        for filter in &self.filters {
            set = filter.apply(ctx, set, request.values(filter.name()))?;
        }
        set = self
            .ordering
            .apply(ctx, set, request.values(self.ordering.name()))?;

        let records = set.query.fetch(ctx.db)?;
        debug!(
            kind = ?self.kind,
            audience = ?request.audience,
            total = records.len(),
            "browse executed"
        );
        Ok(BrowseResult {
            total: records.len(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::choices::ChoiceCache;
    use crate::search::FtsIndex;
    use crate::storage::Database;
    use crate::content::{NewRecord, Permission};
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

    fn open_gate() -> BrowseGate {
        BrowseGate::new(vec![ContentKind::CaseStudy])
    }

    #[test]
    fn test_profiles_expose_their_extra_facets() {
        let fund = FilterSet::for_kind(Some(ContentKind::GreenFund));
        let names = fund.facet_names();
        assert!(names.contains(&"budget"));
        assert!(names.contains(&"revolving"));
        assert!(!names.contains(&"kind"));
        assert_eq!(*names.last().unwrap(), "sort");

        let unscoped = FilterSet::for_kind(None);
        assert!(unscoped.facet_names().contains(&"kind"));
        assert!(!unscoped.facet_names().contains(&"budget"));
    }

    #[test]
    fn test_anonymous_denied_on_private_listing() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        let set = FilterSet::for_kind(Some(ContentKind::GreenFund));
        let request = BrowseRequest::new(Some(ContentKind::GreenFund), Audience::Anonymous);
        let err = set.browse(&ctx(&db, &cache), &open_gate(), &request);
        assert!(matches!(err, Err(HubError::AccessDenied(_))));
    }

    #[test]
    fn test_member_listing_hides_drafts() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        NewRecord::new(ContentKind::CaseStudy, "Draft").insert(&db).unwrap();
        NewRecord::new(ContentKind::CaseStudy, "Live")
            .published(Utc::now())
            .insert(&db)
            .unwrap();

        let set = FilterSet::for_kind(Some(ContentKind::CaseStudy));
        let request = BrowseRequest::new(Some(ContentKind::CaseStudy), Audience::Member);
        let result = set.browse(&ctx(&db, &cache), &open_gate(), &request).unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0].title, "Live");
    }

    #[test]
    fn test_anonymous_sees_only_open_records() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        NewRecord::new(ContentKind::CaseStudy, "Members only")
            .published(Utc::now())
            .insert(&db)
            .unwrap();
        NewRecord::new(ContentKind::CaseStudy, "Public")
            .published(Utc::now())
            .permission(Permission::Open)
            .insert(&db)
            .unwrap();

        let set = FilterSet::for_kind(Some(ContentKind::CaseStudy));
        let request = BrowseRequest::new(Some(ContentKind::CaseStudy), Audience::Anonymous);
        let result = set.browse(&ctx(&db, &cache), &open_gate(), &request).unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0].title, "Public");
    }

    #[test]
    fn test_unknown_param_is_ignored() {
        let db = Database::open_in_memory().unwrap();
        let cache = ChoiceCache::new(8, Duration::from_secs(60));
        NewRecord::new(ContentKind::CaseStudy, "Live")
            .published(Utc::now())
            .insert(&db)
            .unwrap();

        let set = FilterSet::for_kind(Some(ContentKind::CaseStudy));
        let request = BrowseRequest::new(Some(ContentKind::CaseStudy), Audience::Member)
            .with_param("no-such-facet", "whatever");
        let result = set.browse(&ctx(&db, &cache), &open_gate(), &request).unwrap();
        assert_eq!(result.total, 1);
    }
}
