mod app;
mod input;
mod preferences;

use eframe::egui;
use tracing::{error, info};

use app::MandelGlowApp;
use preferences::AppPreferences;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting MandelGlow");

    let prefs = AppPreferences::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MandelGlow")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "MandelGlow",
        options,
        Box::new(move |cc| match MandelGlowApp::new(cc, &prefs) {
            Ok(app) => Ok(Box::new(app)),
            Err(e) => {
                error!("Cannot start renderer: {e}");
                Err(e.into())
            }
        }),
    )
}
