//! Report formatting for standard output.
//!
//! Supports the sectioned text layout and pretty JSON.

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::report::{GroupSummary, RankedValue, Report, Verdict};

const RULE_WIDTH: usize = 80;
const MISSING: &str = "n/a";

/// Writes every report section, in order, as human-readable text.
pub fn print_report<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "{rule}")?;
    writeln!(out, "FUEL PRICE ANALYSIS")?;
    writeln!(out, "{rule}")?;

    let o = &report.overview;
    writeln!(out, "\n1. DATASET OVERVIEW")?;
    writeln!(out, "   Total records: {}", thousands(o.total_rows))?;
    writeln!(out, "   Products analyzed: {}", o.categories)?;
    writeln!(out, "   States covered: {}", o.states)?;
    writeln!(out, "   Regions: {}", o.regions)?;
    for column in &report.missing_columns {
        writeln!(out, "   Column not in source: {column}")?;
    }

    writeln!(out, "\n2. RECORDS PER FUEL TYPE")?;
    let width = key_width(report.category_counts.iter().map(|c| c.category.as_str()));
    for c in &report.category_counts {
        writeln!(out, "   {:<width$}  {:>8}", c.category, c.count)?;
    }

    writeln!(out, "\n3. RESALE PRICE BY PRODUCT")?;
    write_summaries(out, &report.category_prices)?;

    writeln!(out, "\n4. MEAN RESALE PRICE BY REGION")?;
    write_ranked(out, &report.region_prices)?;

    writeln!(out, "\n5. MEAN RESALE MARGIN BY REGION")?;
    write_ranked(out, &report.region_margins)?;

    writeln!(out, "\n6. TOP {} STATES BY RESALE PRICE", report.top_n)?;
    write_ranked(out, &report.top_priced_states)?;

    writeln!(out, "\n7. TOP {} STATES BY PRICE VARIATION", report.top_n)?;
    write_ranked(out, &report.top_variable_states)?;

    if let Some(cmp) = &report.comparison {
        writeln!(out, "\n8. {} x {}", cmp.baseline, cmp.alternative)?;
        writeln!(out, "   {}: R$ {:.3}/L", cmp.baseline, cmp.baseline_mean)?;
        writeln!(out, "   {}: R$ {:.3}/L", cmp.alternative, cmp.alternative_mean)?;
        writeln!(out, "   Ratio: {:.2}%", cmp.ratio * 100.0)?;
        match cmp.verdict {
            Verdict::Favorable => writeln!(out, "   {} pays off", cmp.alternative)?,
            Verdict::Unfavorable => writeln!(out, "   {} is the better buy", cmp.baseline)?,
        }
    }

    Ok(())
}

/// Closing banner naming the saved chart.
pub fn print_footer<W: Write>(chart: Option<&Path>, out: &mut W) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "\n{rule}")?;
    match chart {
        Some(path) => writeln!(out, "Analysis complete. Charts saved to '{}'", path.display())?,
        None => writeln!(out, "Analysis complete.")?,
    }
    writeln!(out, "{rule}")?;
    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn print_json<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn write_summaries<W: Write>(out: &mut W, rows: &[GroupSummary]) -> Result<()> {
    let width = key_width(rows.iter().map(|r| r.key.as_str()));
    writeln!(
        out,
        "   {:<width$}  {:>10}  {:>10}  {:>10}  {:>10}",
        "", "Mean", "Std Dev", "Min", "Max"
    )?;
    for r in rows {
        writeln!(
            out,
            "   {:<width$}  {:>10}  {:>10}  {:>10}  {:>10}",
            r.key,
            fmt_value(r.mean),
            fmt_value(r.std_dev),
            fmt_value(r.min),
            fmt_value(r.max)
        )?;
    }
    Ok(())
}

fn write_ranked<W: Write>(out: &mut W, rows: &[RankedValue]) -> Result<()> {
    let width = key_width(rows.iter().map(|r| r.key.as_str()));
    for r in rows {
        writeln!(out, "   {:<width$}  {:>10}", r.key, fmt_value(r.value))?;
    }
    Ok(())
}

fn key_width<'a>(keys: impl Iterator<Item = &'a str>) -> usize {
    keys.map(|k| k.chars().count()).max().unwrap_or(0)
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.3}"))
}

/// Formats a count with comma thousands separators.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
