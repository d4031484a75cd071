use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;

/// Per-unit wheel zoom factor: `scale *= ZOOM_BASE^delta`.
///
/// With wheel deltas of 120 per notch this is roughly 1.2 % per notch.
pub const ZOOM_BASE: f64 = 0.9999;

/// Allowed range for [`ViewState::scale`].
///
/// The shader evaluates in single precision, so below about `1e-5` the
/// plane mapping collapses into visible blocks; above a few units the whole
/// set is a dot in the middle of the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewLimits {
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            min_scale: 1e-5,
            max_scale: 16.0,
        }
    }
}

impl ViewLimits {
    pub fn new(min_scale: f64, max_scale: f64) -> crate::Result<Self> {
        let limits = Self {
            min_scale,
            max_scale,
        };
        limits.validate()?;
        Ok(limits)
    }

    /// Both bounds must be finite and `0 < min_scale <= max_scale`.
    pub fn validate(&self) -> crate::Result<()> {
        let ok = self.min_scale.is_finite()
            && self.max_scale.is_finite()
            && self.min_scale > 0.0
            && self.min_scale <= self.max_scale;
        if ok {
            Ok(())
        } else {
            Err(CoreError::InvalidLimits {
                min_scale: self.min_scale,
                max_scale: self.max_scale,
            })
        }
    }

    #[inline]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// The visible window onto the complex plane.
///
/// `center` is the plane point under the middle of the viewport and `scale`
/// is half the visible plane height. The horizontal half-extent is
/// `scale * ratio`, with the ratio owned by whoever tracks the viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: Complex,
    pub scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            center: Complex::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewState {
    pub fn new(center: Complex, scale: f64) -> crate::Result<Self> {
        if !center.is_finite() {
            return Err(CoreError::InvalidView {
                reason: format!("center must be finite, got {center}"),
            });
        }
        if scale <= 0.0 || !scale.is_finite() {
            return Err(CoreError::InvalidView {
                reason: format!("scale must be positive and finite, got {scale}"),
            });
        }
        Ok(Self { center, scale })
    }

    /// Pan by a pointer movement of `(dx, dy)` pixels in a viewport `height`
    /// pixels tall.
    ///
    /// Screen y grows downward while plane y grows upward, hence the sign
    /// flip. The content follows the pointer, so the center moves opposite
    /// to the drag.
    pub fn dragged(self, dx: f64, dy: f64, height: f64) -> Self {
        let per_pixel = self.scale * 2.0 / height.max(1.0);
        let d = Complex::new(dx, -dy) * per_pixel;
        Self {
            center: self.center - d,
            scale: self.scale,
        }
    }

    /// Exponential zoom: `scale * base^delta`, clamped to `limits`.
    ///
    /// Positive deltas (wheel away from the user) zoom in when `base < 1`.
    pub fn zoomed(self, delta: f64, base: f64, limits: &ViewLimits) -> Self {
        let wanted = self.scale * base.powf(delta);
        let scale = limits.clamp(wanted);
        if scale != wanted {
            debug!(wanted, scale, "zoom clamped to view limits");
        }
        Self {
            center: self.center,
            scale,
        }
    }

    /// Plane point under a normalized device coordinate.
    ///
    /// `ndc` spans `[-1, 1]` on both axes with y up, matching the vertex
    /// stage. This is the mapping the fragment shader applies.
    pub fn plane_point(&self, ndc: [f64; 2], ratio: f64) -> Complex {
        self.center + Complex::new(ndc[0] * ratio, ndc[1]) * self.scale
    }
}

/// Width over height, with the height floored at one pixel.
#[inline]
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    width as f64 / height.max(1) as f64
}
