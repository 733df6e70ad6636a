/// Chart layer: pure layout, plotters panels, PNG encoding.
///
/// ```text
///   CleanSubset
///        │
///        ▼
///   ┌──────────┐
///   │  layout   │  tracks, offsets, time windows, axis bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  render   │  one plotters panel per chart variant
///   └──────────┘
///        │
///        ▼
///   RGB buffer → PNG bytes → file
/// ```

pub mod error;
pub mod layout;
pub mod render;

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use log::debug;
use plotters::prelude::*;

use crate::color::SeriesColors;
use crate::data::model::CleanSubset;

pub use error::ChartError;
pub use render::FigureSize;

use render::PanelStyle;

pub const PATTERN_ANALYSIS_FILE: &str = "pattern_analysis.png";
pub const CONNECTED_PATTERN_FILE: &str = "connected_pattern.png";

/// Knobs shared by both figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub dpi: u32,
    /// Number of equal-width time windows in the window panel.
    pub windows: usize,
    /// Vertical distance between rows of the stacked panel.
    pub stack_offset: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            dpi: 300,
            windows: 20,
            stack_offset: 12.0,
        }
    }
}

/// The 3×2 overview figure: scatter, connected lines, stacked, sequential
/// index, stem, time windows.
pub fn render_pattern_analysis(
    subset: &CleanSubset,
    opts: &ChartOptions,
) -> Result<Vec<u8>, ChartError> {
    let size = FigureSize::new(20.0, 15.0, opts.dpi);
    let style = PanelStyle::for_figure(&size);
    let colors = SeriesColors::new(&subset.sorted_series_ids());
    let scatter_colors = scatter_colors(subset);

    let scatter = layout::scatter_tracks(subset);
    let lines = layout::line_tracks(subset);
    let stacked = layout::stacked_tracks(subset, opts.stack_offset);
    let sequential = layout::sequential_points(subset);
    let stems = layout::stem_points(subset);
    let windows = layout::time_windows(subset, opts.windows);
    debug!(
        "pattern analysis: {} series, {} windows",
        lines.len(),
        windows.len()
    );

    draw_figure(size, |root| {
        let cells = root.split_evenly((3, 2));
        render::scatter_panel(&cells[0], &style, &scatter, &scatter_colors)?;
        render::connected_panel(
            &cells[1],
            &style,
            "Connected Lines: Each Series",
            &lines,
            &colors,
        )?;
        render::stacked_panel(&cells[2], &style, &stacked, &colors)?;
        render::sequential_panel(&cells[3], &style, &sequential)?;
        render::stem_panel(&cells[4], &style, &stems)?;
        render::window_panel(&cells[5], &style, &windows)?;
        Ok(())
    })
}

/// Scatter colors follow first appearance in time, not the sorted order
/// the line panels use.
fn scatter_colors(subset: &CleanSubset) -> SeriesColors {
    SeriesColors::new(&subset.series_ids())
}

/// A single wide panel of every series as a connected, time-ordered line.
pub fn render_connected_pattern(
    subset: &CleanSubset,
    opts: &ChartOptions,
) -> Result<Vec<u8>, ChartError> {
    let size = FigureSize::new(20.0, 8.0, opts.dpi);
    let style = PanelStyle::for_figure(&size);
    let colors = SeriesColors::new(&subset.sorted_series_ids());
    let lines = layout::line_tracks(subset);

    draw_figure(size, |root| {
        render::connected_panel(
            root,
            &style,
            "Connected Pattern: Clean Signal by Series",
            &lines,
            &colors,
        )
    })
}

/// Allocate an RGB buffer, let `draw` fill it, then encode as PNG.
fn draw_figure<F>(size: FigureSize, draw: F) -> Result<Vec<u8>, ChartError>
where
    F: FnOnce(&render::Panel<'_>) -> Result<(), ChartError>,
{
    let (width, height) = size.pixels();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    encode_png(buffer, width, height)
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or(ChartError::Buffer { width, height })?;
    let mut output = Vec::new();
    DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

/// Write encoded PNG bytes, replacing any existing file.
pub fn save_png(path: &Path, bytes: &[u8]) -> Result<(), ChartError> {
    std::fs::write(path, bytes).map_err(|source| ChartError::Write {
        path: path.to_path_buf(),
        source,
    })
}
