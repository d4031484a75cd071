use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use mandelglow_core::{
    AccuracyLevel, Complex, Navigator, RefinePolicy, ViewLimits, ViewState, ZOOM_BASE,
};

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// View shown at startup. Not updated on exit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct InitialView {
    pub center_re: f64,
    pub center_im: f64,
    pub scale: f64,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            center_re: 0.0,
            center_im: 0.0,
            scale: 1.0,
        }
    }
}

/// Progressive refinement tuning. Quiet intervals are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefineSettings {
    pub low_accuracy: u8,
    pub high_accuracy: u8,
    pub resize_quiet_ms: u64,
    pub drag_quiet_ms: u64,
    pub zoom_quiet_ms: u64,
}

impl Default for RefineSettings {
    fn default() -> Self {
        let p = RefinePolicy::default();
        Self {
            low_accuracy: p.low.value(),
            high_accuracy: p.high.value(),
            resize_quiet_ms: p.resize_quiet.as_millis() as u64,
            drag_quiet_ms: p.drag_quiet.as_millis() as u64,
            zoom_quiet_ms: p.zoom_quiet.as_millis() as u64,
        }
    }
}

impl RefineSettings {
    pub fn policy(&self) -> RefinePolicy {
        RefinePolicy {
            low: AccuracyLevel(self.low_accuracy),
            high: AccuracyLevel(self.high_accuracy),
            resize_quiet: Duration::from_millis(self.resize_quiet_ms),
            drag_quiet: Duration::from_millis(self.drag_quiet_ms),
            zoom_quiet: Duration::from_millis(self.zoom_quiet_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default)]
    pub initial_view: InitialView,
    #[serde(default)]
    pub view_limits: ViewLimits,
    #[serde(default)]
    pub refine: RefineSettings,
    /// Per-unit wheel zoom factor (wheel deltas are 120 per notch).
    #[serde(default = "default_zoom_base")]
    pub zoom_base: f64,
}

fn default_window_width() -> f32 {
    960.0
}
fn default_window_height() -> f32 {
    720.0
}
fn default_zoom_base() -> f64 {
    ZOOM_BASE
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            initial_view: InitialView::default(),
            view_limits: ViewLimits::default(),
            refine: RefineSettings::default(),
            zoom_base: default_zoom_base(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to
    /// defaults. Nothing is ever written.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}, using defaults", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs;
                }
                Err(e) => error!("Failed to parse preferences: {e}"),
            },
            Err(e) => error!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    /// Build the navigator these preferences describe.
    ///
    /// Out-of-range values are reported and replaced by defaults rather than
    /// refusing to start.
    pub fn navigator(&self) -> Navigator {
        let iv = self.initial_view;
        let view = ViewState::new(Complex::new(iv.center_re, iv.center_im), iv.scale)
            .unwrap_or_else(|e| {
                warn!("Ignoring initial view: {e}");
                ViewState::default()
            });
        let limits = match self.view_limits.validate() {
            Ok(()) => self.view_limits,
            Err(e) => {
                warn!("Ignoring view limits: {e}");
                ViewLimits::default()
            }
        };
        let policy = self.refine.policy();
        let policy = match policy.validate() {
            Ok(()) => policy,
            Err(e) => {
                warn!("Ignoring refinement settings: {e}");
                RefinePolicy::default()
            }
        };
        Navigator::new(view, limits, policy)
            .unwrap_or_else(|e| {
                warn!("Falling back to default navigator: {e}");
                Navigator::default()
            })
            .with_zoom_base(self.zoom_base)
    }
}

const PREFERENCES_FILE: &str = "preferences.json";

/// `preferences.json` beside the running executable, or in the working
/// directory when the executable path is unknown.
fn config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PREFERENCES_FILE)
}
