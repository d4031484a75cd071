use thiserror::Error;

/// Errors raised while setting up the GPU shading stage.
///
/// All of these are fatal at startup; nothing here is retried.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no OpenGL context available (the glow renderer is required)")]
    NoGlContext,

    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: &'static str, log: String },

    #[error("shader program failed to link: {0}")]
    Link(String),

    #[error("failed to create GL {what}: {reason}")]
    Resource { what: &'static str, reason: String },
}
