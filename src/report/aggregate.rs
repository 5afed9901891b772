use chrono::Utc;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::config::ReportConfig;
use crate::report::types::{
    CategoryCount, Comparison, GroupSummary, Overview, RankedValue, Report,
};
use crate::report::verdict::classify;
use crate::stats::{self, Summary};
use crate::table::{Record, Table};

impl Report {
    /// Runs every reporting pass over `table`.
    pub fn from_table(table: &Table, config: &ReportConfig, source: &str) -> Self {
        let report = Report {
            generated_at: Utc::now(),
            source: source.to_string(),
            missing_columns: table
                .missing_columns()
                .iter()
                .map(|c| c.to_string())
                .collect(),
            overview: overview(table),
            category_counts: category_counts(table),
            category_prices: category_prices(table),
            region_prices: region_prices(table),
            region_margins: region_margins(table),
            top_n: config.top_n,
            top_priced_states: top_priced_states(table, config.top_n),
            top_variable_states: top_variable_states(table, config.top_n),
            comparison: compare_categories(table, config),
        };

        debug!(
            categories = report.category_counts.len(),
            regions = report.region_prices.len(),
            has_comparison = report.comparison.is_some(),
            "Report assembled"
        );

        report
    }
}

pub fn overview(table: &Table) -> Overview {
    let distinct = |key: fn(&Record) -> &str| {
        table
            .records()
            .iter()
            .map(key)
            .collect::<BTreeSet<_>>()
            .len()
    };

    Overview {
        total_rows: table.len(),
        categories: distinct(|r| r.category.as_str()),
        states: distinct(|r| r.state.as_str()),
        regions: distinct(|r| r.region.as_str()),
    }
}

/// Rows per category, most frequent first.
pub fn category_counts(table: &Table) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in table.records() {
        *counts.entry(&record.category).or_default() += 1;
    }

    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();

    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Resale price summary per category, in category order.
pub fn category_prices(table: &Table) -> Vec<GroupSummary> {
    group_values(table.records(), |r| r.category.as_str(), |r| r.resale.mean)
        .into_iter()
        .map(|(key, values)| {
            let Summary {
                count,
                mean,
                std_dev,
                min,
                max,
            } = Summary::from_values(&values);

            GroupSummary {
                key: key.to_string(),
                count,
                mean,
                std_dev,
                min,
                max,
            }
        })
        .collect()
}

pub fn region_prices(table: &Table) -> Vec<RankedValue> {
    mean_by(table.records(), |r| r.region.as_str(), |r| r.resale.mean)
}

pub fn region_margins(table: &Table) -> Vec<RankedValue> {
    mean_by(table.records(), |r| r.region.as_str(), |r| r.resale_margin)
}

pub fn top_priced_states(table: &Table, n: usize) -> Vec<RankedValue> {
    let mut ranked = mean_by(table.records(), |r| r.state.as_str(), |r| r.resale.mean);
    ranked.truncate(n);
    ranked
}

/// States ranked by their mean resale coefficient of variation.
pub fn top_variable_states(table: &Table, n: usize) -> Vec<RankedValue> {
    let mut ranked = mean_by(table.records(), |r| r.state.as_str(), |r| r.resale.coef_variation);
    ranked.truncate(n);
    ranked
}

/// Compares the alternative category's mean resale price against the baseline's.
///
/// Returns `None` unless both categories occur in the table and both have a
/// usable mean.
pub fn compare_categories(table: &Table, config: &ReportConfig) -> Option<Comparison> {
    let baseline = config.baseline_category.as_str();
    let alternative = config.alternative_category.as_str();

    if !table.has_category(baseline) || !table.has_category(alternative) {
        debug!(baseline, alternative, "Comparison categories not both present");
        return None;
    }

    let category_mean = |category: &str| {
        let values = stats::present(
            table
                .records()
                .iter()
                .filter(|r| r.category == category)
                .map(|r| r.resale.mean),
        );
        stats::mean(&values)
    };

    let (Some(baseline_mean), Some(alternative_mean)) =
        (category_mean(baseline), category_mean(alternative))
    else {
        warn!(baseline, alternative, "Comparison skipped: category has no resale prices");
        return None;
    };

    if baseline_mean <= 0.0 {
        warn!(baseline, baseline_mean, "Comparison skipped: baseline mean not positive");
        return None;
    }

    let ratio = alternative_mean / baseline_mean;

    Some(Comparison {
        baseline: baseline.to_string(),
        baseline_mean,
        alternative: alternative.to_string(),
        alternative_mean,
        ratio,
        threshold: config.favorable_ratio,
        verdict: classify(ratio, config.favorable_ratio),
    })
}

/// Mean of `value` per `key`, highest first; groups without data sort last.
pub fn mean_by<'a, K, V>(records: &'a [Record], key: K, value: V) -> Vec<RankedValue>
where
    K: Fn(&'a Record) -> &'a str,
    V: Fn(&Record) -> Option<f64>,
{
    let mut ranked: Vec<RankedValue> = group_values(records, key, value)
        .into_iter()
        .map(|(key, values)| RankedValue {
            key: key.to_string(),
            value: stats::mean(&values),
        })
        .collect();

    ranked.sort_by(|a, b| descending(a.value, b.value));
    ranked
}

/// Present values per group. Groups whose values are all missing are kept empty.
fn group_values<'a, K, V>(records: &'a [Record], key: K, value: V) -> BTreeMap<&'a str, Vec<f64>>
where
    K: Fn(&'a Record) -> &'a str,
    V: Fn(&Record) -> Option<f64>,
{
    let mut groups: BTreeMap<&'a str, Vec<f64>> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key(record)).or_default();
        if let Some(v) = value(record) {
            entry.push(v);
        }
    }
    groups
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
