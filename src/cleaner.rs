//! Numeric normalization of raw survey cells.
//!
//! Cells use a comma as decimal mark and a lone dash for "no data". Anything
//! that does not parse after normalization becomes `None`.

use csv::StringRecord;
use tracing::{debug, warn};

use crate::loader::RawTable;
use crate::schema::{self, DISTRIBUTION_COLUMNS, RESALE_COLUMNS};
use crate::table::{Record, Table};

pub const MISSING_SENTINEL: &str = "-";

/// Replaces decimal commas with decimal points.
pub fn normalize_decimal(raw: &str) -> String {
    raw.replace(',', ".")
}

/// Parses one numeric cell. Never fails: bad input yields `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == MISSING_SENTINEL {
        return None;
    }

    normalize_decimal(trimmed)
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
}

/// Builds the typed table from a raw table whose date columns are gone.
///
/// Distribution columns are read unconditionally; resale columns only when
/// the header carries them.
#[tracing::instrument(skip(raw), fields(rows = raw.len()))]
pub fn clean(raw: RawTable) -> Table {
    let key = |name: &str| raw.column_index(name);
    let (category, region, state) = (
        key(schema::CATEGORY),
        key(schema::REGION),
        key(schema::STATE),
    );

    let mut records: Vec<Record> = raw
        .rows()
        .iter()
        .map(|row| {
            Record::new(
                text_at(row, category),
                text_at(row, region),
                text_at(row, state),
            )
        })
        .collect();

    for column in DISTRIBUTION_COLUMNS {
        if let Some(idx) = raw.column_index(column) {
            fill_column(&mut records, raw.rows(), column, idx);
        }
    }

    for column in RESALE_COLUMNS {
        match raw.column_index(column) {
            Some(idx) => fill_column(&mut records, raw.rows(), column, idx),
            None => debug!(column, "Optional column absent, skipping"),
        }
    }

    let missing = raw.missing_optional().to_vec();
    if !missing.is_empty() {
        warn!(columns = ?missing, "Source lacks optional resale columns");
    }

    Table::new(records, missing)
}

fn text_at(row: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).unwrap_or_default()
}

fn fill_column(records: &mut [Record], rows: &[StringRecord], column: &str, idx: usize) {
    let mut rejected = 0usize;

    for (record, row) in records.iter_mut().zip(rows) {
        let raw = row.get(idx).unwrap_or_default();
        let value = parse_numeric(raw);

        let trimmed = raw.trim();
        if value.is_none() && !trimmed.is_empty() && trimmed != MISSING_SENTINEL {
            rejected += 1;
        }

        if let Some(slot) = numeric_slot(record, column) {
            *slot = value;
        }
    }

    debug!(column, rejected, "Column normalized");
}

fn numeric_slot<'a>(record: &'a mut Record, column: &str) -> Option<&'a mut Option<f64>> {
    let slot = match column {
        schema::DIST_MEAN_PRICE => &mut record.distribution.mean,
        schema::DIST_STD_DEV => &mut record.distribution.std_dev,
        schema::DIST_MIN_PRICE => &mut record.distribution.min,
        schema::DIST_MAX_PRICE => &mut record.distribution.max,
        schema::DIST_COEF_VARIATION => &mut record.distribution.coef_variation,
        schema::RESALE_MEAN_PRICE => &mut record.resale.mean,
        schema::RESALE_STD_DEV => &mut record.resale.std_dev,
        schema::RESALE_MIN_PRICE => &mut record.resale.min,
        schema::RESALE_MAX_PRICE => &mut record.resale.max,
        schema::RESALE_COEF_VARIATION => &mut record.resale.coef_variation,
        schema::RESALE_MARGIN => &mut record.resale_margin,
        _ => return None,
    };
    Some(slot)
}
