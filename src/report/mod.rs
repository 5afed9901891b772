//! Descriptive reports over the cleaned survey table.
//!
//! Each pass reads the table, groups rows by category, region or state and
//! summarizes resale prices. Missing values are skipped, never zeroed.

pub mod aggregate;
pub mod types;
pub mod verdict;

pub use types::{
    CategoryCount, Comparison, GroupSummary, Overview, RankedValue, Report,
};
pub use verdict::{Verdict, classify};
