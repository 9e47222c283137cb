//! Content records and their sub-types

pub mod kinds;
pub mod record;
pub mod registry;
pub mod subtypes;

pub use kinds::{CONTENT_KINDS, ContentKind};
pub use record::{ContentRecord, NewRecord, Permission, Status};
