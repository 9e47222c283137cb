//! Visibility rules
//!
//! Three audiences exist. Staff see everything, members see anything
//! published, and anonymous visitors see only open-access published records
//! within the kinds configured as public.

use serde::{Deserialize, Serialize};

use crate::browse::query::{Cond, RecordQuery};
use crate::content::{ContentKind, ContentRecord, Permission, Status};

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Anonymous,
    Member,
    Staff,
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anonymous" => Ok(Self::Anonymous),
            "member" => Ok(Self::Member),
            "staff" => Ok(Self::Staff),
            other => Err(format!("unknown audience '{other}'")),
        }
    }
}

/// The gate in front of every listing.
#[derive(Debug, Clone)]
pub struct BrowseGate {
    public_kinds: Vec<ContentKind>,
}

impl BrowseGate {
    pub fn new(public_kinds: Vec<ContentKind>) -> Self {
        Self { public_kinds }
    }

    /// Whether this audience may open the listing at all. Anonymous
    /// visitors may only browse public kinds, and never the unscoped
    /// all-kinds listing.
    pub fn browse_allowed(&self, audience: Audience, kind: Option<ContentKind>) -> bool {
        match audience {
            Audience::Member | Audience::Staff => true,
            Audience::Anonymous => match kind {
                Some(kind) => self.public_kinds.contains(&kind),
                None => false,
            },
        }
    }

    /// Add the audience's visibility conditions to a collection.
    pub fn narrow(&self, audience: Audience, query: RecordQuery) -> RecordQuery {
        match audience {
            Audience::Staff => query,
            Audience::Member => query.filter(Cond::Published),
            Audience::Anonymous => query.filter(Cond::Published).filter(Cond::OpenAccess),
        }
    }

    /// Whether a single record may be shown to this audience.
    pub fn record_visible(&self, audience: Audience, record: &ContentRecord) -> bool {
        match audience {
            Audience::Staff => true,
            Audience::Member => record.status == Status::Published,
            Audience::Anonymous => {
                record.status == Status::Published
                    && record.permission == Permission::Open
                    && self.public_kinds.contains(&record.kind)
            }
        }
    }
}
