pub mod error;
pub mod palette;
pub mod renderer;
pub mod shader;
pub mod stage;

pub use error::RenderError;
pub use palette::{rgb_from_wavelength, Palette, PALETTE_SIZE};
pub use renderer::Renderer;
pub use shader::{shader_source, GlowProgram, GlslDialect, ShaderKind};
pub use stage::{ShadingStage, Uniform};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
