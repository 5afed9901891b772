//! 2×2 bar chart dashboard rendered to a PNG.
//!
//! Text needs a TrueType font registered with plotters' `ab_glyph` backend.
//! Each render picks its font from the `ChartConfig`. When none can be loaded,
//! or labels are turned off, the bars are drawn without titles or labels.

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ChartConfig;
use crate::report::{RankedValue, Report};

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const CORAL: RGBColor = RGBColor(255, 127, 80);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
const SALMON: RGBColor = RGBColor(250, 128, 114);

const PRICE_AXIS: &str = "Price (R$/L)";
const MARGIN_AXIS: &str = "Margin (R$/L)";

const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

// plotters keeps registered font data for the process lifetime, so each file
// is read and leaked once.
static LOADED_FONTS: Mutex<BTreeMap<PathBuf, &'static [u8]>> = Mutex::new(BTreeMap::new());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One bar chart of the dashboard.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub axis_label: &'static str,
    pub bars: Vec<(String, f64)>,
    pub orientation: Orientation,
    pub color: RGBColor,
}

impl Panel {
    fn from_ranked(
        title: &str,
        axis_label: &'static str,
        ranked: &[RankedValue],
        orientation: Orientation,
        color: RGBColor,
    ) -> Self {
        Panel {
            title: title.to_string(),
            axis_label,
            bars: ranked
                .iter()
                .filter_map(|r| r.value.map(|v| (r.key.clone(), v)))
                .collect(),
            orientation,
            color,
        }
    }

    /// Value axis span, always including zero.
    fn value_range(&self) -> Range<f64> {
        let lo = self.bars.iter().map(|(_, v)| *v).fold(0.0, f64::min);
        let hi = self.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        if hi - lo <= f64::EPSILON {
            return 0.0..1.0;
        }
        lo * 1.1..hi * 1.1
    }

    fn label_at(&self, v: &SegmentValue<i32>) -> String {
        match v {
            SegmentValue::CenterOf(i) => usize::try_from(*i)
                .ok()
                .and_then(|i| self.bars.get(i))
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

/// The four dashboard panels, in grid order.
pub fn dashboard_panels(report: &Report) -> [Panel; 4] {
    let mut by_category: Vec<RankedValue> = report
        .category_prices
        .iter()
        .map(|s| RankedValue {
            key: s.key.clone(),
            value: s.mean,
        })
        .collect();
    by_category.sort_by(|a, b| {
        a.value
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.value.unwrap_or(f64::INFINITY))
    });

    [
        Panel::from_ranked(
            "Mean Resale Price by Product",
            PRICE_AXIS,
            &by_category,
            Orientation::Horizontal,
            STEEL_BLUE,
        ),
        Panel::from_ranked(
            "Mean Price by Region",
            PRICE_AXIS,
            &report.region_prices,
            Orientation::Vertical,
            CORAL,
        ),
        Panel::from_ranked(
            "Mean Resale Margin by Region",
            MARGIN_AXIS,
            &report.region_margins,
            Orientation::Vertical,
            LIGHT_GREEN,
        ),
        Panel::from_ranked(
            &format!("Top {} Most Expensive States", report.top_n),
            PRICE_AXIS,
            &report.top_priced_states,
            Orientation::Horizontal,
            SALMON,
        ),
    ]
}

/// Renders the dashboard for `report` and writes it to `config.path`.
#[tracing::instrument(skip_all, fields(path = %config.path.display()))]
pub fn render_dashboard(report: &Report, config: &ChartConfig) -> Result<PathBuf> {
    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let font = ensure_font(config);
    let labelled = font.is_some();
    if config.labels && !labelled {
        warn!("No usable TrueType font found, rendering charts without text");
    }

    let (width, height) = config.pixel_size();
    let scale = config.dpi as f64 / 100.0;
    let panels = dashboard_panels(report);

    {
        let root = BitMapBackend::new(&config.path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let pad = px(10.0, scale);
        let areas = root.margin(pad, pad, pad, pad).split_evenly((2, 2));
        for (area, panel) in areas.iter().zip(panels.iter()) {
            draw_panel(area, panel, labelled, scale)?;
        }

        root.present()
            .with_context(|| format!("failed to write {}", config.path.display()))?;
    }

    info!(width, height, font = ?font, "Dashboard saved");
    Ok(config.path.clone())
}

fn px(base: f64, scale: f64) -> u32 {
    (base * scale).round().max(1.0) as u32
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    labelled: bool,
    scale: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let n = panel.bars.len().max(1) as i32;
    let range = panel.value_range();

    // Tick labels are one per bar; an empty panel keeps only its caption.
    let axes = labelled && !panel.bars.is_empty();
    let key_area = match panel.orientation {
        Orientation::Horizontal => 150.0,
        Orientation::Vertical => 60.0,
    };

    let mut builder = ChartBuilder::on(area);
    builder.margin(px(12.0, scale));
    if labelled {
        builder.caption(&panel.title, (FONT_FAMILY, 16.0 * scale));
    }
    if axes {
        builder
            .x_label_area_size(px(40.0, scale))
            .y_label_area_size(px(key_area, scale));
    }

    let label_style = (FONT_FAMILY, 10.0 * scale);
    let desc_style = (FONT_FAMILY, 12.0 * scale);

    match panel.orientation {
        Orientation::Vertical => {
            let mut chart = builder.build_cartesian_2d((0..n).into_segmented(), range)?;
            if axes {
                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .x_labels(panel.bars.len())
                    .x_label_formatter(&|v| panel.label_at(v))
                    .y_desc(panel.axis_label)
                    .label_style(label_style)
                    .axis_desc_style(desc_style)
                    .draw()?;
            }
            chart.draw_series(panel.bars.iter().enumerate().map(|(i, (_, value))| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *value)],
                    panel.color.filled(),
                );
                bar.set_margin(0, 0, px(6.0, scale), px(6.0, scale));
                bar
            }))?;
        }
        Orientation::Horizontal => {
            let mut chart = builder.build_cartesian_2d(range, (0..n).into_segmented())?;
            if axes {
                chart
                    .configure_mesh()
                    .disable_y_mesh()
                    .y_labels(panel.bars.len())
                    .y_label_formatter(&|v| panel.label_at(v))
                    .x_desc(panel.axis_label)
                    .label_style(label_style)
                    .axis_desc_style(desc_style)
                    .draw()?;
            }
            chart.draw_series(panel.bars.iter().enumerate().map(|(i, (_, value))| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(i)), (*value, SegmentValue::Exact(i + 1))],
                    panel.color.filled(),
                );
                bar.set_margin(px(3.0, scale), px(3.0, scale), 0, 0);
                bar
            }))?;
        }
    }

    Ok(())
}

/// Registers the font for this render and returns the file it came from.
///
/// `config.font_path` is tried first, then the common system locations.
/// Returns `None` when labels are off or no candidate loads.
fn ensure_font(config: &ChartConfig) -> Option<PathBuf> {
    if !config.labels {
        return None;
    }

    if let Some(path) = config.font_path.as_deref() {
        if register_font_file(path) {
            return Some(path.to_path_buf());
        }
        warn!(path = %path.display(), "Chart font could not be loaded, trying system fonts");
    }

    SYSTEM_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|path| register_font_file(path))
}

fn register_font_file(path: &Path) -> bool {
    let mut loaded = match LOADED_FONTS.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    let bytes = match loaded.get(path) {
        Some(bytes) => *bytes,
        None => {
            let Ok(data) = std::fs::read(path) else {
                return false;
            };
            let data: &'static [u8] = Box::leak(data.into_boxed_slice());
            loaded.insert(path.to_path_buf(), data);
            data
        }
    };

    match register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
        Ok(()) => {
            debug!(path = %path.display(), "Chart font registered");
            true
        }
        Err(_) => {
            debug!(path = %path.display(), "Font file rejected");
            false
        }
    }
}
