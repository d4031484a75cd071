/// Number of entries in the palette lookup table.
pub const PALETTE_SIZE: usize = 256;

/// Shortest wavelength in the table, in nanometres.
const VIOLET_NM: f64 = 380.0;
/// Wavelength span covered by the table.
const SPAN_NM: f64 = 400.0;
/// Exponent applied to each channel after attenuation.
const GAMMA: f64 = 0.8;

// ---------------------------------------------------------------------------
// Wavelength → color
// ---------------------------------------------------------------------------

/// Approximate the color of monochromatic light at `nm` nanometres.
///
/// Piecewise-linear hue bands across 380–780 nm, dimmed toward both ends of
/// the visible range, then gamma-compressed. Wavelengths outside the visible
/// range are black. Alpha is always 1.
pub fn rgb_from_wavelength(nm: f64) -> [f32; 4] {
    let (r, g, b) = if (380.0..=440.0).contains(&nm) {
        (-(nm - 440.0) / (440.0 - 380.0), 0.0, 1.0)
    } else if (440.0..=490.0).contains(&nm) {
        (0.0, (nm - 440.0) / (490.0 - 440.0), 1.0)
    } else if (490.0..=510.0).contains(&nm) {
        (0.0, 1.0, -(nm - 510.0) / (510.0 - 490.0))
    } else if (510.0..=580.0).contains(&nm) {
        ((nm - 510.0) / (580.0 - 510.0), 1.0, 0.0)
    } else if (580.0..=645.0).contains(&nm) {
        (1.0, -(nm - 645.0) / (645.0 - 580.0), 0.0)
    } else if (645.0..=780.0).contains(&nm) {
        (1.0, 0.0, 0.0)
    } else {
        (0.0, 0.0, 0.0)
    };

    let s = if nm > 700.0 {
        0.3 + 0.7 * (780.0 - nm) / (780.0 - 700.0)
    } else if nm < 420.0 {
        0.3 + 0.7 * (nm - 380.0) / (420.0 - 380.0)
    } else {
        1.0
    };

    [channel(r, s), channel(g, s), channel(b, s), 1.0]
}

fn channel(value: f64, intensity: f64) -> f32 {
    // Out-of-range intensities (beyond 780 nm) would go negative; powf of a
    // negative base is NaN.
    (value * intensity).max(0.0).powf(GAMMA) as f32
}

/// Wavelength sampled by palette entry `index`.
#[inline]
pub fn wavelength_for_index(index: usize) -> f64 {
    VIOLET_NM + index as f64 * SPAN_NM / PALETTE_SIZE as f64
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// The fixed 256-entry color table the shader indexes by normalized escape
/// count.
///
/// Built once at startup and never modified afterwards, so it can be shared
/// freely.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: [[f32; 4]; PALETTE_SIZE],
}

impl Palette {
    /// Violet through red, one visible-spectrum sample per entry.
    pub fn spectral() -> Self {
        let mut colors = [[0.0; 4]; PALETTE_SIZE];
        for (i, c) in colors.iter_mut().enumerate() {
            *c = rgb_from_wavelength(wavelength_for_index(i));
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[[f32; 4]; PALETTE_SIZE] {
        &self.colors
    }

    /// Quantize to tightly packed RGBA8 for texture upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.colors
            .iter()
            .flat_map(|c| c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::spectral()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
