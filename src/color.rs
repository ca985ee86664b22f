use eframe::egui::Color32;
use palette::{IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Dashboard palette
// ---------------------------------------------------------------------------

pub const ACCENT: Color32 = Color32::from_rgb(0x00, 0xFF, 0xEE);
pub const PRIMARY: Color32 = Color32::from_rgb(0x21, 0xB4, 0xD9);
pub const SECONDARY: Color32 = Color32::from_rgb(0x11, 0x2E, 0xA6);
pub const STRONG: Color32 = Color32::from_rgb(0xB1, 0x14, 0xD9);

/// Discrete colours for categorical slices, cycled when there are more
/// categories than entries.
pub const CATEGORICAL: [Color32; 3] = [ACCENT, SECONDARY, STRONG];

pub fn categorical(i: usize) -> Color32 {
    CATEGORICAL[i % CATEGORICAL.len()]
}

// ---------------------------------------------------------------------------
// Continuous scale: value → Color32
// ---------------------------------------------------------------------------

/// A piecewise-linear gradient through evenly spaced colour stops, mixed in
/// linear RGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<LinSrgb>,
}

impl Default for ColorScale {
    /// accent → primary → secondary → strong
    fn default() -> Self {
        Self::new(&[ACCENT, PRIMARY, SECONDARY, STRONG])
    }
}

impl ColorScale {
    pub fn new(stops: &[Color32]) -> Self {
        let stops = stops
            .iter()
            .map(|c| -> LinSrgb {
                Srgb::new(c.r(), c.g(), c.b())
                    .into_format::<f32>()
                    .into_linear()
            })
            .collect();
        ColorScale { stops }
    }

    /// Colour at `t` in `[0, 1]`; values outside are clamped.
    pub fn at(&self, t: f64) -> Color32 {
        let Some(last) = self.stops.len().checked_sub(1) else {
            return Color32::GRAY;
        };
        if last == 0 {
            return to_color32(self.stops[0]);
        }
        let pos = (t.clamp(0.0, 1.0) as f32) * last as f32;
        let idx = (pos.floor() as usize).min(last - 1);
        let mixed = self.stops[idx].mix(self.stops[idx + 1], pos - idx as f32);
        to_color32(mixed)
    }

    /// Colour for `value` placed between `min` and `max`.
    pub fn for_value(&self, value: f64, min: f64, max: f64) -> Color32 {
        let range = max - min;
        if range.abs() < f64::EPSILON {
            return self.at(1.0);
        }
        self.at((value - min) / range)
    }
}

fn to_color32(lin: LinSrgb) -> Color32 {
    let rgb: Srgb = lin.into_color();
    let rgb = rgb.into_format::<u8>();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}
