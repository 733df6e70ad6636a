use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

/// The ten-color categorical table used for series tracks.
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Sequential-index line color.
pub const PURPLE: RGBColor = RGBColor(128, 0, 128);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: series id → RGBColor
// ---------------------------------------------------------------------------

/// Assigns tab10 colors to series ids in the order given, cycling after ten.
#[derive(Debug, Clone, Default)]
pub struct SeriesColors {
    mapping: BTreeMap<String, RGBColor>,
}

impl SeriesColors {
    pub fn new(series_ids: &[String]) -> Self {
        let mapping = series_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), TAB10[i % TAB10.len()]))
            .collect();
        SeriesColors { mapping }
    }

    /// Look up the colour for a series; unknown ids fall back to gray.
    pub fn color_for(&self, series_id: &str) -> RGBColor {
        self.mapping
            .get(series_id)
            .copied()
            .unwrap_or(TAB10[7])
    }
}
