//! Pure geometry for the pattern charts: which points go into which panel,
//! in which order, and over which axis ranges. Nothing here touches a
//! drawing backend.

use std::ops::Range;

use crate::data::model::CleanSubset;
use crate::data::timestamp::to_plot_seconds;

/// One series' points as `(x, y)` chart coordinates, NaN values dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub series_id: String,
    pub points: Vec<(f64, f64)>,
}

fn track(subset: &CleanSubset, series_id: &str, y_offset: f64) -> Track {
    let points = subset
        .series(series_id)
        .filter(|r| !r.value.is_nan())
        .map(|r| (to_plot_seconds(r.timestamp), r.value + y_offset))
        .collect();
    Track {
        series_id: series_id.to_string(),
        points,
    }
}

/// Scatter panel: one track per series, in order of first appearance.
pub fn scatter_tracks(subset: &CleanSubset) -> Vec<Track> {
    subset
        .series_ids()
        .iter()
        .map(|id| track(subset, id, 0.0))
        .collect()
}

/// Connected-line panel: one time-ordered track per series, ids sorted.
pub fn line_tracks(subset: &CleanSubset) -> Vec<Track> {
    stacked_tracks(subset, 0.0)
}

/// Stacked panel: series `i` (ids sorted) shifted up by `i * offset`.
pub fn stacked_tracks(subset: &CleanSubset, offset: f64) -> Vec<Track> {
    subset
        .sorted_series_ids()
        .iter()
        .enumerate()
        .map(|(i, id)| track(subset, id, i as f64 * offset))
        .collect()
}

/// Value against its position in the time-sorted subset, ignoring gaps.
pub fn sequential_points(subset: &CleanSubset) -> Vec<(f64, f64)> {
    subset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.value.is_nan())
        .map(|(i, r)| (i as f64, r.value))
        .collect()
}

/// Every clean point at its timestamp, regardless of series.
pub fn stem_points(subset: &CleanSubset) -> Vec<(f64, f64)> {
    subset
        .records()
        .iter()
        .filter(|r| !r.value.is_nan())
        .map(|r| (to_plot_seconds(r.timestamp), r.value))
        .collect()
}

// ---------------------------------------------------------------------------
// Time windows
// ---------------------------------------------------------------------------

/// A non-empty equal-width timestamp bin, right-closed: `(lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    pub lower: f64,
    pub upper: f64,
    /// Mean timestamp of the records that fell into the window.
    pub center: f64,
    /// Values in the window, ascending.
    pub values: Vec<f64>,
}

/// Cut the subset's timestamps into `bins` equal-width windows spanning
/// `[min, max]`, with the lowest edge pushed down by 0.1% of the range so
/// the minimum lands in the first window. Empty windows are omitted; the
/// rest come back in ascending time order.
pub fn time_windows(subset: &CleanSubset, bins: usize) -> Vec<TimeWindow> {
    let points: Vec<(f64, f64)> = subset
        .records()
        .iter()
        .map(|r| (to_plot_seconds(r.timestamp), r.value))
        .collect();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    let (lo, hi) = (first.0, last.0);

    if hi <= lo {
        return vec![make_window(lo, hi, &points)];
    }

    let span = hi - lo;
    let width = span / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    edges[0] -= span * 0.001;
    edges[bins] = hi;

    let mut grouped: Vec<Vec<(f64, f64)>> = vec![Vec::new(); bins];
    for &(x, v) in &points {
        let idx = edges
            .partition_point(|e| *e < x)
            .saturating_sub(1)
            .min(bins - 1);
        grouped[idx].push((x, v));
    }

    grouped
        .iter()
        .enumerate()
        .filter(|(_, members)| !members.is_empty())
        .map(|(i, members)| make_window(edges[i], edges[i + 1], members))
        .collect()
}

fn make_window(lower: f64, upper: f64, members: &[(f64, f64)]) -> TimeWindow {
    let center = members.iter().map(|(x, _)| x).sum::<f64>() / members.len() as f64;
    let mut values: Vec<f64> = members
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(f64::total_cmp);
    TimeWindow {
        lower,
        upper,
        center,
        values,
    }
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Axis ranges covering a point cloud with a 5% margin on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

impl Bounds {
    pub fn of(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for (px, py) in points {
            if px.is_finite() && py.is_finite() {
                x = (x.0.min(px), x.1.max(px));
                y = (y.0.min(py), y.1.max(py));
            }
        }
        Bounds {
            x: padded(x.0, x.1),
            y: padded(y.0, y.1),
        }
    }
}

fn padded(min: f64, max: f64) -> Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if max <= min {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}
