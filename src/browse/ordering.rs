//! Result ordering
//!
//! The ordering facet always runs last. An explicit sort key wins; with no
//! key, a collection that went through search keeps its relevance order via
//! the rank hint; otherwise listings show newest first.

use rusqlite::types::Value;

use crate::browse::choices::Choice;
use crate::browse::filters::{FacetFilter, FilterContext};
use crate::browse::query::{FilteredSet, Ordering};
use crate::error::Result;

/// Sentinel standing in for NULL sub-type values so they sort after every
/// real value under a descending sort.
const NULL_SENTINEL: i64 = -100_000_000;

/// Extra sort keys a kind's listing offers beyond the shared ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingExtras {
    #[default]
    None,
    GreenPower,
    GreenFund,
}

/// Shared sort keys, value to label. A leading `-` flips direction.
const BASE_KEYS: &[(&str, &str)] = &[
    ("title", "Title A-Z"),
    ("-title", "Title Z-A"),
    ("published", "Oldest first"),
    ("-published", "Newest first"),
    ("created", "Date created (oldest)"),
    ("-created", "Date created (newest)"),
    ("kind", "Content kind A-Z"),
    ("-kind", "Content kind Z-A"),
];

const GREEN_POWER_KEYS: &[(&str, &str)] = &[
    ("size", "Project size (smallest)"),
    ("-size", "Project size (largest)"),
    ("installed", "Date installed (oldest)"),
    ("-installed", "Date installed (newest)"),
];

const GREEN_FUND_KEYS: &[(&str, &str)] = &[
    ("budget", "Annual budget (smallest)"),
    ("-budget", "Annual budget (largest)"),
    ("fee", "Student fee (smallest)"),
    ("-fee", "Student fee (largest)"),
];

pub struct OrderingFilter {
    extras: OrderingExtras,
}

impl OrderingFilter {
    pub fn new(extras: OrderingExtras) -> Self {
        Self { extras }
    }

    fn keys(&self) -> Vec<(&'static str, &'static str)> {
        let mut keys: Vec<_> = BASE_KEYS.to_vec();
        match self.extras {
            OrderingExtras::None => {}
            OrderingExtras::GreenPower => keys.extend(GREEN_POWER_KEYS),
            OrderingExtras::GreenFund => keys.extend(GREEN_FUND_KEYS),
        }
        keys
    }

    /// Sub-type columns order through a scalar subselect so the base query
    /// never needs a join it otherwise would not have.
    fn subtype_expr(table: &'static str, column: &'static str, descending: bool) -> Ordering {
        let dir = if descending { "DESC" } else { "ASC" };
        Ordering::expr(
            format!(
                "COALESCE((SELECT st.{column} FROM {table} st
                           WHERE st.record_id = r.id), {NULL_SENTINEL}) {dir}"
            ),
            Vec::<Value>::new(),
        )
    }

    fn ordering_for(&self, key: &str) -> Option<Ordering> {
        let (field, descending) = match key.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (key, false),
        };
        let ordering = match (field, self.extras) {
            ("title", _) => Ordering::column("title", descending),
            ("published", _) => Ordering::column("published", descending),
            ("created", _) => Ordering::column("date_created", descending),
            ("kind", _) => Ordering::column("kind", descending),
            ("size", OrderingExtras::GreenPower) => {
                Self::subtype_expr("green_power_projects", "project_size", descending)
            }
            ("installed", OrderingExtras::GreenPower) => {
                Self::subtype_expr("green_power_projects", "date_installed", descending)
            }
            ("budget", OrderingExtras::GreenFund) => {
                Self::subtype_expr("green_funds", "annual_budget", descending)
            }
            ("fee", OrderingExtras::GreenFund) => {
                Self::subtype_expr("green_funds", "student_fee", descending)
            }
            _ => return None,
        };
        Some(ordering)
    }
}

impl FacetFilter for OrderingFilter {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn choices(&self, _ctx: &FilterContext<'_>) -> Result<Vec<Choice>> {
        Ok(self
            .keys()
            .iter()
            .map(|(value, label)| Choice::new(*value, *label))
            .collect())
    }

    fn apply(
        &self,
        _ctx: &FilterContext<'_>,
        set: FilteredSet,
        values: &[String],
    ) -> Result<FilteredSet> {
        let explicit = values
            .iter()
            .map(|v| v.trim())
            .find_map(|v| self.ordering_for(v));

        if let Some(ordering) = explicit {
            return Ok(set.map_query(|q| q.order_by(ordering)));
        }
        if let Some(hint) = set.rank_hint.clone() {
            return Ok(set.map_query(|q| q.order_by(Ordering::rank(&hint))));
        }
        Ok(set.map_query(|q| q.order_by(Ordering::published_desc())))
    }
}
