use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Single accent used by the one-series charts.
pub fn accent() -> Color32 {
    Color32::from_rgb(99, 110, 250)
}

// ---------------------------------------------------------------------------
// Status → colour mapping for the box plot
// ---------------------------------------------------------------------------

/// Maps each startup status to a distinct colour. Built once per dataset so
/// a status keeps its colour while filters change.
#[derive(Debug, Clone)]
pub struct StatusColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl StatusColors {
    pub fn new(statuses: &BTreeSet<String>) -> Self {
        let palette = generate_palette(statuses.len());
        let mapping = statuses.iter().cloned().zip(palette).collect();
        StatusColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a status.
    pub fn color_for(&self, status: &str) -> Color32 {
        self.mapping
            .get(status)
            .copied()
            .unwrap_or(self.default_color)
    }
}
