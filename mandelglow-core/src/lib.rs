pub mod complex;
pub mod error;
pub mod input;
pub mod navigator;
pub mod refine;
pub mod view;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use input::{InputKind, PointerSample, ViewEvent};
pub use navigator::{FrameState, Navigator};
pub use refine::{
    AccuracyLevel, RefinePolicy, RefineState, RefinementScheduler, Redraw, BASE_ITERATIONS,
};
pub use view::{aspect_ratio, ViewLimits, ViewState, ZOOM_BASE};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
