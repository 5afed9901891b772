//! End-to-end run: load, clean, report, chart.

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::chart::render_dashboard;
use crate::cleaner::clean;
use crate::config::{ChartConfig, DEFAULT_INPUT_PATH, ReportConfig};
use crate::loader::load;
use crate::output::{print_footer, print_json, print_report};
use crate::report::Report;
use crate::schema::DROPPED_COLUMNS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub report: ReportConfig,
    /// `None` skips chart rendering.
    pub chart: Option<ChartConfig>,
    pub format: OutputFormat,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            report: ReportConfig::default(),
            chart: Some(ChartConfig::default()),
            format: OutputFormat::Text,
        }
    }
}

/// Runs the whole analysis, writing report text (or JSON) to `out`.
#[tracing::instrument(skip_all, fields(input = %options.input.display()))]
pub fn run<W: Write>(options: &RunOptions, out: &mut W) -> Result<Report> {
    let raw = load(&options.input)?.drop_columns(&DROPPED_COLUMNS)?;
    let table = clean(raw);
    info!(rows = table.len(), "Survey table cleaned");

    let source = options.input.display().to_string();
    let report = Report::from_table(&table, &options.report, &source);

    match options.format {
        OutputFormat::Text => print_report(&report, out)?,
        OutputFormat::Json => print_json(&report, out)?,
    }

    let chart_path = match &options.chart {
        Some(config) => Some(render_dashboard(&report, config)?),
        None => None,
    };

    if options.format == OutputFormat::Text {
        print_footer(chart_path.as_deref(), out)?;
    }

    Ok(report)
}
