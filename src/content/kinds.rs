//! Content-type discriminator
//!
//! Every record in the base table carries one of these kinds. Sub-type
//! tables (academic programs, green funds, ...) hang off the base row by
//! record id; see the detour filters in `browse::filters`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discriminator for the sub-type of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    AcademicProgram,
    CaseStudy,
    CourseMaterial,
    GreenFund,
    GreenPowerProject,
    OutreachMaterial,
    Photograph,
    Presentation,
    Publication,
    Video,
}

/// All kinds, in display order.
pub const CONTENT_KINDS: &[ContentKind] = &[
    ContentKind::AcademicProgram,
    ContentKind::CaseStudy,
    ContentKind::CourseMaterial,
    ContentKind::GreenFund,
    ContentKind::GreenPowerProject,
    ContentKind::OutreachMaterial,
    ContentKind::Photograph,
    ContentKind::Presentation,
    ContentKind::Publication,
    ContentKind::Video,
];

impl ContentKind {
    /// Stable identifier stored in the `kind` column and used in URLs.
    pub fn slug(self) -> &'static str {
        match self {
            Self::AcademicProgram => "academic-program",
            Self::CaseStudy => "case-study",
            Self::CourseMaterial => "course-material",
            Self::GreenFund => "green-fund",
            Self::GreenPowerProject => "green-power-project",
            Self::OutreachMaterial => "outreach-material",
            Self::Photograph => "photograph",
            Self::Presentation => "presentation",
            Self::Publication => "publication",
            Self::Video => "video",
        }
    }

    /// Human-readable label shown in choice lists.
    pub fn label(self) -> &'static str {
        match self {
            Self::AcademicProgram => "Academic Program",
            Self::CaseStudy => "Case Study",
            Self::CourseMaterial => "Course Material",
            Self::GreenFund => "Green Fund",
            Self::GreenPowerProject => "Green Power Project",
            Self::OutreachMaterial => "Outreach Material",
            Self::Photograph => "Photograph",
            Self::Presentation => "Presentation",
            Self::Publication => "Publication",
            Self::Video => "Video",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CONTENT_KINDS
            .iter()
            .copied()
            .find(|k| k.slug() == s)
            .ok_or_else(|| format!("unknown content kind '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for kind in CONTENT_KINDS {
            assert_eq!(kind.slug().parse::<ContentKind>(), Ok(*kind));
        }
    }

    #[test]
    fn test_unknown_slug_is_rejected() {
        assert!("mystery-meat".parse::<ContentKind>().is_err());
    }
}
