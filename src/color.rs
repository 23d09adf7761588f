use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Continuous scales: value in [0, 1] → Color32
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuousScale {
    /// Perceptually uniform purple → yellow.
    Viridis,
    /// Diverging red → yellow → green.
    RdYlGn,
}

const VIRIDIS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

const RDYLGN: [(u8, u8, u8); 7] = [
    (0xa5, 0x00, 0x26),
    (0xf4, 0x6d, 0x43),
    (0xfd, 0xae, 0x61),
    (0xff, 0xff, 0xbf),
    (0xa6, 0xd9, 0x6a),
    (0x1a, 0x98, 0x50),
    (0x00, 0x68, 0x37),
];

impl ContinuousScale {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            ContinuousScale::Viridis => &VIRIDIS,
            ContinuousScale::RdYlGn => &RDYLGN,
        }
    }

    /// Colour at position `t`, clamped to `[0, 1]`. Interpolates in linear RGB.
    pub fn at(self, t: f64) -> Color32 {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
        let scaled = t * (stops.len() - 1) as f32;
        let i = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - i as f32;

        let lin = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
            Srgb::new(r, g, b).into_format::<f32>().into_linear()
        };
        let mixed = lin(stops[i]).mix(lin(stops[i + 1]), frac);
        to_color32(Srgb::from_linear(mixed))
    }

    /// Colour for `value` on a scale spanning `min..=max`.
    pub fn for_value(self, value: f64, min: f64, max: f64) -> Color32 {
        let span = max - min;
        if span.abs() < f64::EPSILON {
            return self.at(1.0);
        }
        self.at((value - min) / span)
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
