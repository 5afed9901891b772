//! Declared column layout of the fuel price survey table.
//!
//! Key, date and distribution-side columns are required. Resale-side columns
//! are optional; a column listed on both sides counts as required.

use crate::loader::LoadError;

pub const CATEGORY: &str = "PRODUTO";
pub const REGION: &str = "REGIÃO";
pub const STATE: &str = "ESTADO";

pub const DATE_START: &str = "DATA INICIAL";
pub const DATE_END: &str = "DATA FINAL";

pub const DIST_MEAN_PRICE: &str = "PREÇO MÉDIO DISTRIBUIÇÃO";
pub const DIST_STD_DEV: &str = "DESVIO PADRÃO DISTRIBUIÇÃO";
pub const DIST_MIN_PRICE: &str = "PREÇO MÍNIMO DISTRIBUIÇÃO";
pub const DIST_MAX_PRICE: &str = "PREÇO MÁXIMO DISTRIBUIÇÃO";
pub const DIST_COEF_VARIATION: &str = "COEF DE VARIAÇÃO DISTRIBUIÇÃO";

pub const RESALE_MEAN_PRICE: &str = "PREÇO MÉDIO REVENDA";
pub const RESALE_STD_DEV: &str = "DESVIO PADRÃO REVENDA";
pub const RESALE_MIN_PRICE: &str = "PREÇO MÍNIMO REVENDA";
pub const RESALE_MAX_PRICE: &str = "PREÇO MÁXIMO REVENDA";
pub const RESALE_MARGIN: &str = "MARGEM MÉDIA REVENDA";
pub const RESALE_COEF_VARIATION: &str = "COEF DE VARIAÇÃO REVENDA";

pub const KEY_COLUMNS: [&str; 3] = [CATEGORY, REGION, STATE];

/// Reporting window columns, dropped before any analysis.
pub const DROPPED_COLUMNS: [&str; 2] = [DATE_START, DATE_END];

/// Distribution-side numeric columns, always normalized.
pub const DISTRIBUTION_COLUMNS: [&str; 6] = [
    DIST_MEAN_PRICE,
    DIST_STD_DEV,
    DIST_MIN_PRICE,
    DIST_MAX_PRICE,
    DIST_COEF_VARIATION,
    RESALE_MARGIN,
];

/// Resale-side numeric columns, normalized only when present.
pub const RESALE_COLUMNS: [&str; 6] = [
    RESALE_MEAN_PRICE,
    RESALE_STD_DEV,
    RESALE_MIN_PRICE,
    RESALE_MAX_PRICE,
    RESALE_MARGIN,
    RESALE_COEF_VARIATION,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub presence: Presence,
}

/// Every declared column, each listed once.
pub fn expected_columns() -> Vec<ColumnSpec> {
    let required = KEY_COLUMNS
        .iter()
        .chain(DROPPED_COLUMNS.iter())
        .chain(DISTRIBUTION_COLUMNS.iter())
        .copied()
        .map(|name| ColumnSpec {
            name,
            presence: Presence::Required,
        });

    let optional = RESALE_COLUMNS
        .iter()
        .copied()
        .filter(|name| !DISTRIBUTION_COLUMNS.contains(name))
        .map(|name| ColumnSpec {
            name,
            presence: Presence::Optional,
        });

    required.chain(optional).collect()
}

/// Checks a header row against the declared columns.
///
/// Returns the optional columns the header lacks. Fails on the first
/// required column that is absent; unknown extra columns are accepted.
pub fn validate_header(headers: &[String]) -> Result<Vec<&'static str>, LoadError> {
    let mut missing_optional = Vec::new();

    for column in expected_columns() {
        if headers.iter().any(|h| h == column.name) {
            continue;
        }
        match column.presence {
            Presence::Required => return Err(LoadError::MissingColumn(column.name.to_string())),
            Presence::Optional => missing_optional.push(column.name),
        }
    }

    Ok(missing_optional)
}
