use crate::palette::Palette;

/// A scalar or vector input to the shading stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    /// Plane point under the viewport center.
    Center([f32; 2]),
    /// Half the visible plane height.
    Scale(f32),
    /// Viewport width over height.
    Ratio(f32),
    /// Iteration-bound exponent.
    Accuracy(i32),
}

impl Uniform {
    /// Name of the uniform in the shader source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Center(_) => "center",
            Self::Scale(_) => "scale",
            Self::Ratio(_) => "ratio",
            Self::Accuracy(_) => "accuracy",
        }
    }
}

/// The per-pixel evaluation stage as seen by the [`Renderer`](crate::Renderer).
///
/// Implementations own their device resources; the device itself is passed
/// in on every call as `Context` so no ambient graphics state is needed.
pub trait ShadingStage {
    type Context: ?Sized;

    /// Make this stage's program and resources current.
    fn bind(&mut self, ctx: &Self::Context);

    /// Hand the color table to the stage. Called once.
    fn upload_palette(&mut self, ctx: &Self::Context, palette: &Palette);

    fn set_uniform(&mut self, ctx: &Self::Context, value: Uniform);

    /// Clear the render target.
    fn clear(&mut self, ctx: &Self::Context);

    /// Draw the full-viewport quad.
    fn draw_quad(&mut self, ctx: &Self::Context);
}
