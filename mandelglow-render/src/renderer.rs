use tracing::trace;

use mandelglow_core::{AccuracyLevel, FrameState};

use crate::palette::Palette;
use crate::stage::{ShadingStage, Uniform};

/// Drives a [`ShadingStage`] one full-viewport quad per frame.
///
/// The palette goes up once at construction. `center` and `scale` are sent
/// every frame; `ratio` and `accuracy` only when they differ from what the
/// stage already holds.
pub struct Renderer<S: ShadingStage> {
    stage: S,
    sent_ratio: Option<f32>,
    sent_accuracy: Option<AccuracyLevel>,
    frames: u64,
}

impl<S: ShadingStage> Renderer<S> {
    pub fn new(ctx: &S::Context, mut stage: S, palette: &Palette) -> Self {
        stage.bind(ctx);
        stage.upload_palette(ctx, palette);
        Self {
            stage,
            sent_ratio: None,
            sent_accuracy: None,
            frames: 0,
        }
    }

    /// Draw one frame of `frame`.
    pub fn draw(&mut self, ctx: &S::Context, frame: &FrameState) {
        let stage = &mut self.stage;
        stage.bind(ctx);
        stage.clear(ctx);

        let ratio = frame.ratio as f32;
        if self.sent_ratio != Some(ratio) {
            stage.set_uniform(ctx, Uniform::Ratio(ratio));
            self.sent_ratio = Some(ratio);
        }
        if self.sent_accuracy != Some(frame.accuracy) {
            stage.set_uniform(ctx, Uniform::Accuracy(i32::from(frame.accuracy.value())));
            self.sent_accuracy = Some(frame.accuracy);
        }
        stage.set_uniform(ctx, Uniform::Center(frame.view.center.to_f32_pair()));
        stage.set_uniform(ctx, Uniform::Scale(frame.view.scale as f32));

        stage.draw_quad(ctx);
        self.frames += 1;
        trace!(
            frame = self.frames,
            accuracy = %frame.accuracy,
            scale = frame.view.scale,
            "frame drawn"
        );
    }

    /// Number of frames drawn so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }
}
