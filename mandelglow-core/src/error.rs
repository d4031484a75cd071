use thiserror::Error;

/// Errors originating from view and scheduling configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid view: {reason}")]
    InvalidView { reason: String },

    #[error("invalid view limits: min_scale {min_scale}, max_scale {max_scale}")]
    InvalidLimits { min_scale: f64, max_scale: f64 },

    #[error("invalid accuracy levels: low {low}, high {high} (need low < high <= 16)")]
    InvalidAccuracy { low: u8, high: u8 },
}
