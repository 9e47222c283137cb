//! The faceted browse engine

pub mod buckets;
pub mod choices;
pub mod filters;
pub mod filterset;
pub mod gate;
pub mod localflavor;
pub mod ordering;
pub mod query;

pub use choices::{Choice, ChoiceCache};
pub use filters::{FacetFilter, FilterContext};
pub use filterset::{BrowseRequest, BrowseResult, FilterSet};
pub use gate::{Audience, BrowseGate};
pub use query::{FilteredSet, RecordQuery};
