//! CLI entry point for the fuel price report.
//!
//! Loads the survey table, prints the descriptive report and saves the chart
//! dashboard. Every argument has a default, so a bare invocation runs the
//! standard analysis.

use anyhow::Result;
use clap::Parser;
use fuel_price_report::config::{
    ALTERNATIVE_CATEGORY, BASELINE_CATEGORY, CHART_DPI, ChartConfig, DEFAULT_CHART_PATH,
    DEFAULT_INPUT_PATH, FAVORABLE_RATIO, ReportConfig, TOP_N,
};
use fuel_price_report::pipeline::{OutputFormat, RunOptions, run};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fuel_price_report")]
#[command(about = "Descriptive report and charts for fuel price surveys", long_about = None)]
struct Cli {
    /// Tab-separated survey file
    #[arg(value_name = "FILE", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// PNG file to save the chart dashboard to
    #[arg(short, long, default_value = DEFAULT_CHART_PATH)]
    chart: PathBuf,

    /// Chart resolution in dots per inch
    #[arg(long, default_value_t = CHART_DPI)]
    dpi: u32,

    /// TrueType font for chart text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Draw bars only, without titles or axis labels
    #[arg(long, default_value_t = false)]
    no_labels: bool,

    /// Number of states in the top rankings
    #[arg(short = 'n', long, default_value_t = TOP_N)]
    top: usize,

    /// Category the alternative is compared against
    #[arg(long, default_value = BASELINE_CATEGORY)]
    baseline: String,

    /// Category compared against the baseline
    #[arg(long, default_value = ALTERNATIVE_CATEGORY)]
    alternative: String,

    /// Price ratio below which the alternative is favorable
    #[arg(short, long, default_value_t = FAVORABLE_RATIO)]
    threshold: f64,

    /// Print the report as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Skip chart rendering
    #[arg(long, default_value_t = false)]
    no_chart: bool,
}

impl Cli {
    fn run_options(self) -> RunOptions {
        let chart = (!self.no_chart).then(|| ChartConfig {
            path: self.chart,
            dpi: self.dpi,
            font_path: self.font,
            labels: !self.no_labels,
            ..Default::default()
        });

        RunOptions {
            input: self.input,
            report: ReportConfig {
                top_n: self.top,
                baseline_category: self.baseline,
                alternative_category: self.alternative,
                favorable_ratio: self.threshold,
            },
            chart,
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/fuel_price_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fuel_price_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let options = Cli::parse().run_options();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = run(&options, &mut out)?;

    info!(
        rows = report.overview.total_rows,
        categories = report.overview.categories,
        "Analysis finished"
    );

    Ok(())
}
