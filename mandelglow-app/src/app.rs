use std::sync::Arc;
use std::time::Instant;

use eframe::egui;
use eframe::egui_glow;
use tracing::{debug, info};

use mandelglow_core::{Navigator, Redraw, ViewEvent};
use mandelglow_render::{GlowProgram, Palette, RenderError, Renderer};

use crate::input::InputTranslator;
use crate::preferences::AppPreferences;

pub(crate) struct MandelGlowApp {
    navigator: Navigator,
    /// Shared with the paint callback, which runs on egui's painter.
    renderer: Arc<egui::mutex::Mutex<Renderer<GlowProgram>>>,
    input: InputTranslator,
}

impl MandelGlowApp {
    pub(crate) fn new(
        cc: &eframe::CreationContext<'_>,
        prefs: &AppPreferences,
    ) -> Result<Self, RenderError> {
        let gl = cc.gl.as_ref().ok_or(RenderError::NoGlContext)?;
        let program = GlowProgram::new(gl)?;
        let renderer = Renderer::new(&**gl, program, &Palette::spectral());
        info!("Shading program ready");

        Ok(Self {
            navigator: prefs.navigator(),
            renderer: Arc::new(egui::mutex::Mutex::new(renderer)),
            input: InputTranslator::default(),
        })
    }

    /// Feed this pass's canvas size and pointer events to the navigator.
    fn handle_canvas_input(&mut self, ctx: &egui::Context, rect: egui::Rect, now: Instant) -> Redraw {
        let mut redraw = self.navigator.handle(
            ViewEvent::Resize {
                width: rect.width().round().max(0.0) as u32,
                height: rect.height().round().max(0.0) as u32,
            },
            now,
        );

        let events = ctx.input(|i| i.events.clone());
        for event in &events {
            if let Some(ev) = self.input.translate(event, rect.min) {
                redraw = redraw.or(self.navigator.handle(ev, now));
            }
        }
        redraw
    }

    fn paint_canvas(&self, ui: &egui::Ui, rect: egui::Rect) {
        let frame = self.navigator.frame();
        let renderer = Arc::clone(&self.renderer);
        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                renderer.lock().draw(painter.gl(), &frame);
            })),
        };
        ui.painter().add(callback);
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for MandelGlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let mut redraw = self.navigator.tick(now);
        if redraw.is_requested() {
            debug!(accuracy = %self.navigator.accuracy(), "refined view due");
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.allocate_rect(rect, egui::Sense::click_and_drag());
                redraw = redraw.or(self.handle_canvas_input(ctx, rect, now));
                if rect.width() >= 1.0 && rect.height() >= 1.0 {
                    self.paint_canvas(ui, rect);
                }
            });

        // egui repaints the whole window every pass, so a requested redraw is
        // served by this one. Only the refinement deadline needs a wake-up.
        if let Some(wait) = self.navigator.time_until_refine(now) {
            ctx.request_repaint_after(wait);
        } else if redraw.is_requested() {
            debug!(scale = self.navigator.view().scale, "view settled");
        }
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        if let Some(gl) = gl {
            let renderer = self.renderer.lock();
            info!(frames = renderer.frames_drawn(), "Releasing GL resources");
            renderer.stage().destroy(gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use mandelglow_render::GlslDialect;

    #[test]
    fn render_crate_shares_eframe_gl_context() {
        // Fails to compile if the workspace glow drifts from eframe's.
        let detect: fn(&eframe::glow::Context) -> GlslDialect = GlslDialect::detect;
        let _ = detect;
    }
}
