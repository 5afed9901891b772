//! Typed survey records produced by the cleaner.

use serde::Serialize;

/// Price statistics reported for one market stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Prices {
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub coef_variation: Option<f64>,
}

/// One survey row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub category: String,
    pub region: String,
    pub state: String,

    pub distribution: Prices,
    pub resale: Prices,
    pub resale_margin: Option<f64>,
}

impl Record {
    pub fn new(category: &str, region: &str, state: &str) -> Self {
        Self {
            category: category.to_string(),
            region: region.to_string(),
            state: state.to_string(),
            ..Default::default()
        }
    }
}

/// Cleaned survey table. Row count and key values are fixed once built.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
    missing_columns: Vec<&'static str>,
}

impl Table {
    pub fn new(records: Vec<Record>, missing_columns: Vec<&'static str>) -> Self {
        Self {
            records,
            missing_columns,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Optional columns absent from the source; their fields are always `None`.
    pub fn missing_columns(&self) -> &[&'static str] {
        &self.missing_columns
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.records.iter().any(|r| r.category == category)
    }
}
