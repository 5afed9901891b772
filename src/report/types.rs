//! Data types produced by the reporting passes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::report::verdict::Verdict;

/// Row count and number of distinct key values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_rows: usize,
    pub categories: usize,
    pub states: usize,
    pub regions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Resale price summary for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A group key with one aggregated value; `None` when the group had no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedValue {
    pub key: String,
    pub value: Option<f64>,
}

/// Mean resale price of two categories and their ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub baseline: String,
    pub baseline_mean: f64,
    pub alternative: String,
    pub alternative_mean: f64,
    pub ratio: f64,
    pub threshold: f64,
    pub verdict: Verdict,
}

/// All report sections, in print order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub missing_columns: Vec<String>,

    pub overview: Overview,
    pub category_counts: Vec<CategoryCount>,
    pub category_prices: Vec<GroupSummary>,
    pub region_prices: Vec<RankedValue>,
    pub region_margins: Vec<RankedValue>,
    /// Requested size of the state rankings; they may hold fewer entries.
    pub top_n: usize,
    pub top_priced_states: Vec<RankedValue>,
    pub top_variable_states: Vec<RankedValue>,
    pub comparison: Option<Comparison>,
}
