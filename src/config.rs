//! Run parameters and their defaults.

use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "2004-2021.tsv";
pub const DEFAULT_CHART_PATH: &str = "analise_combustiveis.png";

pub const BASELINE_CATEGORY: &str = "GASOLINA COMUM";
pub const ALTERNATIVE_CATEGORY: &str = "ETANOL HIDRATADO";

/// Alternative/baseline price ratio below which the alternative pays off.
pub const FAVORABLE_RATIO: f64 = 0.70;

pub const TOP_N: usize = 10;

pub const CHART_WIDTH_IN: f64 = 16.0;
pub const CHART_HEIGHT_IN: f64 = 12.0;
pub const CHART_DPI: u32 = 300;

/// Parameters of the aggregation passes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub top_n: usize,
    pub baseline_category: String,
    pub alternative_category: String,
    pub favorable_ratio: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: TOP_N,
            baseline_category: BASELINE_CATEGORY.to_string(),
            alternative_category: ALTERNATIVE_CATEGORY.to_string(),
            favorable_ratio: FAVORABLE_RATIO,
        }
    }
}

/// Output image parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub path: PathBuf,
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    /// TrueType font for titles and labels; common system fonts are tried when unset.
    pub font_path: Option<PathBuf>,
    /// Draw titles and axis labels. Bars alone are drawn when false.
    pub labels: bool,
}

impl ChartConfig {
    /// Pixel dimensions of the rendered image.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * self.dpi as f64).round().max(1.0) as u32;
        (px(self.width_in), px(self.height_in))
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CHART_PATH),
            width_in: CHART_WIDTH_IN,
            height_in: CHART_HEIGHT_IN,
            dpi: CHART_DPI,
            font_path: None,
            labels: true,
        }
    }
}
