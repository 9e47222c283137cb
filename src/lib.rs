//! Faceted browse engine for an institutional sustainability resource hub
//!
//! Records of ten kinds share one base table; each kind's listing is a
//! facet set assembled by [`browse::FilterSet`], narrowed through the
//! visibility [`browse::BrowseGate`] and full-text search, and ordered by
//! an explicit sort key, search relevance, or recency in that priority.

pub mod app;
pub mod browse;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod metadata;
pub mod search;
pub mod seed;
pub mod storage;

pub use error::{HubError, Result};
