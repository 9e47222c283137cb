//! Sub-type registry
//!
//! Maps each content kind to the browse profile that decides which extra
//! facet filters and which ordering filter its listing gets. Resolving this
//! up front through a registry avoids the circular base/sub-type lookups a
//! late-bound scheme would need.

use crate::content::kinds::ContentKind;

/// Which flavor of filter set a kind's listing uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseProfile {
    /// The shared facet set, no sub-type extras
    Default,
    AcademicProgram,
    CourseMaterial,
    OutreachMaterial,
    Publication,
    Presentation,
    GreenPower,
    GreenFund,
}

/// Resolve the browse profile for a kind (or the default listing when no
/// kind is selected).
pub fn browse_profile(kind: Option<ContentKind>) -> BrowseProfile {
    match kind {
        Some(ContentKind::AcademicProgram) => BrowseProfile::AcademicProgram,
        Some(ContentKind::CourseMaterial) => BrowseProfile::CourseMaterial,
        Some(ContentKind::OutreachMaterial) => BrowseProfile::OutreachMaterial,
        Some(ContentKind::Publication) => BrowseProfile::Publication,
        Some(ContentKind::Presentation) => BrowseProfile::Presentation,
        Some(ContentKind::GreenPowerProject) => BrowseProfile::GreenPower,
        Some(ContentKind::GreenFund) => BrowseProfile::GreenFund,
        _ => BrowseProfile::Default,
    }
}
