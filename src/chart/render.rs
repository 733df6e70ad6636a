//! Plotters drawing for each chart panel. Every function draws into a
//! caller-provided drawing area so the same panel can be placed in a grid
//! cell or fill a whole figure.

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::error::ChartError;
use super::layout::{Bounds, TimeWindow, Track};
use crate::color::{generate_palette, SeriesColors, PURPLE, TAB10};
use crate::data::timestamp::from_plot_seconds;

pub type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type PanelChart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const FONT: &str = "sans-serif";

// ---------------------------------------------------------------------------
// Sizing
// ---------------------------------------------------------------------------

/// Physical figure size. Pixel dimensions are inches × DPI and every
/// stroke or font size is given in points (1/72 in) and scaled alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl FigureSize {
    pub fn new(width_in: f64, height_in: f64, dpi: u32) -> Self {
        FigureSize {
            width_in,
            height_in,
            dpi,
        }
    }

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * f64::from(self.dpi)).round() as u32,
            (self.height_in * f64::from(self.dpi)).round() as u32,
        )
    }

    /// Points → pixels.
    pub fn pt(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    fn pt_px(&self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }
}

/// Pixel sizes shared by all panels of one figure.
#[derive(Debug, Clone, Copy)]
pub struct PanelStyle {
    title: f64,
    label: f64,
    tick: f64,
    legend: f64,
    line: u32,
    marker: u32,
    scatter: u32,
    window_dot: u32,
    margin: u32,
    label_area: u32,
}

impl PanelStyle {
    pub fn for_figure(size: &FigureSize) -> Self {
        PanelStyle {
            title: size.pt(14.0),
            label: size.pt(10.0),
            tick: size.pt(8.0),
            legend: size.pt(8.0),
            line: size.pt_px(2.0),
            marker: size.pt_px(3.0),
            scatter: size.pt_px(3.5),
            window_dot: size.pt_px(5.0),
            margin: size.pt_px(8.0),
            label_area: size.pt_px(40.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Axis labels
// ---------------------------------------------------------------------------

/// Tick label for a time axis, with precision chosen from the visible span.
pub fn time_label(x: f64, span_secs: f64) -> String {
    let Some(ts) = from_plot_seconds(x) else {
        return String::new();
    };
    let fmt = if span_secs < 60.0 {
        "%H:%M:%S%.3f"
    } else if span_secs < 86_400.0 {
        "%H:%M:%S"
    } else if span_secs < 30.0 * 86_400.0 {
        "%m-%d %H:%M"
    } else {
        "%Y-%m-%d"
    };
    ts.format(fmt).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum XAxis {
    Time,
    Index,
}

// ---------------------------------------------------------------------------
// Shared panel scaffolding
// ---------------------------------------------------------------------------

fn build_panel<'a, 'b>(
    area: &'a Panel<'b>,
    style: &PanelStyle,
    title: &str,
    (x_desc, y_desc): (&str, &str),
    x_axis: XAxis,
    bounds: &Bounds,
) -> Result<PanelChart<'a, 'b>, ChartError> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, style.title))
        .margin(style.margin)
        .x_label_area_size(style.label_area)
        .y_label_area_size(style.label_area)
        .build_cartesian_2d(bounds.x.clone(), bounds.y.clone())?;

    let span = bounds.x.end - bounds.x.start;
    let time_fmt = move |x: &f64| time_label(*x, span);
    let index_fmt = |x: &f64| format!("{x:.0}");
    let x_fmt: &dyn Fn(&f64) -> String = match x_axis {
        XAxis::Time => &time_fmt,
        XAxis::Index => &index_fmt,
    };

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(6)
        .x_label_formatter(x_fmt)
        .label_style((FONT, style.tick))
        .axis_desc_style((FONT, style.label))
        .light_line_style(&BLACK.mix(0.04))
        .bold_line_style(&BLACK.mix(0.12))
        .draw()?;

    Ok(chart)
}

fn draw_legend<'a, 'b: 'a>(
    chart: &mut PanelChart<'a, 'b>,
    style: &PanelStyle,
) -> Result<(), ChartError> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FONT, style.legend))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .draw()?;
    Ok(())
}

fn draw_connected<'a, 'b: 'a>(
    chart: &mut PanelChart<'a, 'b>,
    style: &PanelStyle,
    tracks: &[Track],
    colors: &SeriesColors,
) -> Result<(), ChartError> {
    let (line, marker) = (style.line, style.marker);
    for t in tracks {
        let color = colors.color_for(&t.series_id);
        chart
            .draw_series(LineSeries::new(
                t.points.iter().copied(),
                color.stroke_width(line),
            ))?
            .label(t.series_id.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x - 10, y), (x + 10, y)], color.stroke_width(line))
            });
        chart.draw_series(
            t.points
                .iter()
                .map(|&p| Circle::new(p, marker, color.filled())),
        )?;
    }
    if !tracks.is_empty() {
        draw_legend(chart, style)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

/// Clean points colored by series.
pub fn scatter_panel(
    area: &Panel<'_>,
    style: &PanelStyle,
    tracks: &[Track],
    colors: &SeriesColors,
) -> Result<(), ChartError> {
    let bounds = Bounds::of(tracks.iter().flat_map(|t| t.points.iter().copied()));
    let mut chart = build_panel(
        area,
        style,
        "Scatter: Clean Data by Series",
        ("Timestamp", "Value"),
        XAxis::Time,
        &bounds,
    )?;

    let r = style.scatter;
    for t in tracks {
        let color = colors.color_for(&t.series_id);
        chart
            .draw_series(
                t.points
                    .iter()
                    .map(|&p| Circle::new(p, r, color.mix(0.7).filled())),
            )?
            .label(t.series_id.clone())
            .legend(move |(x, y)| Circle::new((x, y), r, color.filled()));
    }
    if !tracks.is_empty() {
        draw_legend(&mut chart, style)?;
    }
    Ok(())
}

/// Each series as a time-ordered line with markers.
pub fn connected_panel(
    area: &Panel<'_>,
    style: &PanelStyle,
    title: &str,
    tracks: &[Track],
    colors: &SeriesColors,
) -> Result<(), ChartError> {
    let bounds = Bounds::of(tracks.iter().flat_map(|t| t.points.iter().copied()));
    let mut chart = build_panel(
        area,
        style,
        title,
        ("Timestamp", "Value"),
        XAxis::Time,
        &bounds,
    )?;
    draw_connected(&mut chart, style, tracks, colors)
}

/// Series lifted onto separate rows.
pub fn stacked_panel(
    area: &Panel<'_>,
    style: &PanelStyle,
    tracks: &[Track],
    colors: &SeriesColors,
) -> Result<(), ChartError> {
    let bounds = Bounds::of(tracks.iter().flat_map(|t| t.points.iter().copied()));
    let mut chart = build_panel(
        area,
        style,
        "Stacked Series View",
        ("Timestamp", "Value (offset)"),
        XAxis::Time,
        &bounds,
    )?;
    draw_connected(&mut chart, style, tracks, colors)
}

/// Values against their row position, one purple line.
pub fn sequential_panel(
    area: &Panel<'_>,
    style: &PanelStyle,
    points: &[(f64, f64)],
) -> Result<(), ChartError> {
    let bounds = Bounds::of(points.iter().copied());
    let mut chart = build_panel(
        area,
        style,
        "Sequential Index View (ignoring time gaps)",
        ("Sequential Index", "Value"),
        XAxis::Index,
        &bounds,
    )?;
    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        PURPLE.stroke_width(style.line),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, style.marker, PURPLE.filled())),
    )?;
    Ok(())
}

/// A stem from zero up (or down) to every value.
pub fn stem_panel(
    area: &Panel<'_>,
    style: &PanelStyle,
    points: &[(f64, f64)],
) -> Result<(), ChartError> {
    let bounds = Bounds::of(points.iter().flat_map(|&(x, y)| [(x, y), (x, 0.0)]));
    let mut chart = build_panel(
        area,
        style,
        "Stem Plot: Clean Signal Patterns",
        ("Timestamp", "Value"),
        XAxis::Time,
        &bounds,
    )?;
    let color = TAB10[0];
    let stem_width = (style.line / 2).max(1);
    chart.draw_series(points.iter().map(|&(x, y)| {
        PathElement::new(vec![(x, 0.0), (x, y)], color.stroke_width(stem_width))
    }))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, style.marker, color.filled())),
    )?;
    Ok(())
}

/// Each time window's values stacked vertically at the window's mean time.
pub fn window_panel(
    area: &Panel<'_>,
    style: &PanelStyle,
    windows: &[TimeWindow],
) -> Result<(), ChartError> {
    let bounds = Bounds::of(
        windows
            .iter()
            .flat_map(|w| w.values.iter().map(move |&v| (w.center, v))),
    );
    let mut chart = build_panel(
        area,
        style,
        "Vertical Letter Pattern Detection",
        ("Time Window", "Value"),
        XAxis::Time,
        &bounds,
    )?;

    let palette = generate_palette(windows.len());
    for (w, color) in windows.iter().zip(palette) {
        chart.draw_series(
            w.values
                .iter()
                .map(|&v| Circle::new((w.center, v), style.window_dot, color.mix(0.6).filled())),
        )?;
        if w.values.len() > 1 {
            chart.draw_series(LineSeries::new(
                w.values.iter().map(|&v| (w.center, v)),
                color.mix(0.5).stroke_width(style.line + style.line / 2),
            ))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_pixels_scale_with_dpi() {
        assert_eq!(FigureSize::new(20.0, 15.0, 300).pixels(), (6000, 4500));
        assert_eq!(FigureSize::new(20.0, 8.0, 100).pixels(), (2000, 800));
        assert_eq!(FigureSize::new(1.0, 1.0, 144).pt(72.0), 144.0);
    }

    #[test]
    fn test_time_label_precision_by_span() {
        // 2023-11-14 22:13:20 UTC
        let x = 1_700_000_000.0;
        assert_eq!(time_label(x, 10.0), "22:13:20.000");
        assert_eq!(time_label(x, 3600.0), "22:13:20");
        assert_eq!(time_label(x, 5.0 * 86_400.0), "11-14 22:13");
        assert_eq!(time_label(x, 365.0 * 86_400.0), "2023-11-14");
        assert_eq!(time_label(f64::NAN, 1.0), "");
    }
}
