use std::time::{Duration, Instant};

use tracing::trace;

use crate::input::{InputKind, PointerSample, ViewEvent};
use crate::refine::{AccuracyLevel, RefinePolicy, RefinementScheduler, Redraw};
use crate::view::{aspect_ratio, ViewLimits, ViewState, ZOOM_BASE};

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub view: ViewState,
    pub ratio: f64,
    pub accuracy: AccuracyLevel,
}

/// Owns the view and turns viewport input into view changes and redraw
/// requests.
///
/// Drag, wheel, and resize input mutate the view, drop accuracy to the low
/// level, and restart the refinement countdown with that input's quiet
/// interval. Pointer presses and moves without the primary button only
/// update the pointer sample.
#[derive(Debug, Clone)]
pub struct Navigator {
    view: ViewState,
    limits: ViewLimits,
    zoom_base: f64,
    width: u32,
    height: u32,
    ratio: f64,
    pointer: Option<PointerSample>,
    scheduler: RefinementScheduler,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            view: ViewState::default(),
            limits: ViewLimits::default(),
            zoom_base: ZOOM_BASE,
            width: 0,
            height: 0,
            ratio: 1.0,
            pointer: None,
            scheduler: RefinementScheduler::default(),
        }
    }
}

impl Navigator {
    /// Validates `limits` and `policy`; the initial scale is clamped into
    /// `limits`.
    pub fn new(
        view: ViewState,
        limits: ViewLimits,
        policy: RefinePolicy,
    ) -> crate::Result<Self> {
        limits.validate()?;
        policy.validate()?;
        let view = ViewState::new(view.center, limits.clamp(view.scale))?;
        Ok(Self {
            view,
            limits,
            scheduler: RefinementScheduler::new(policy),
            ..Self::default()
        })
    }

    /// Override the per-unit wheel zoom factor. Non-finite or non-positive
    /// values fall back to [`ZOOM_BASE`].
    pub fn with_zoom_base(mut self, base: f64) -> Self {
        self.zoom_base = if base.is_finite() && base > 0.0 {
            base
        } else {
            ZOOM_BASE
        };
        self
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: ViewEvent, now: Instant) -> Redraw {
        match event {
            ViewEvent::PointerPress { pos } => {
                self.pointer = Some(pos);
                Redraw::Skip
            }
            ViewEvent::PointerMove { pos, primary_down } => {
                let previous = self.pointer.replace(pos);
                match previous {
                    Some(prev) if primary_down => {
                        let (dx, dy) = pos.delta_from(prev);
                        self.view = self.view.dragged(dx, dy, self.height as f64);
                        self.view_changed(InputKind::Drag, now)
                    }
                    _ => Redraw::Skip,
                }
            }
            ViewEvent::Wheel { delta } => {
                if delta == 0.0 || !delta.is_finite() {
                    return Redraw::Skip;
                }
                self.view = self.view.zoomed(delta, self.zoom_base, &self.limits);
                self.view_changed(InputKind::Zoom, now)
            }
            ViewEvent::Resize { width, height } => {
                if (width, height) == (self.width, self.height) {
                    return Redraw::Skip;
                }
                self.width = width;
                self.height = height;
                self.ratio = aspect_ratio(width, height);
                self.view_changed(InputKind::Resize, now)
            }
        }
    }

    /// Let the refinement countdown fire if it is due.
    pub fn tick(&mut self, now: Instant) -> Redraw {
        self.scheduler.tick(now)
    }

    fn view_changed(&mut self, kind: InputKind, now: Instant) -> Redraw {
        trace!(
            kind = kind.label(),
            center = %self.view.center,
            scale = self.view.scale,
            ratio = self.ratio,
            "view changed"
        );
        self.scheduler.arm(kind, now);
        Redraw::Request
    }

    pub fn frame(&self) -> FrameState {
        FrameState {
            view: self.view,
            ratio: self.ratio,
            accuracy: self.scheduler.accuracy(),
        }
    }

    #[inline]
    pub fn view(&self) -> ViewState {
        self.view
    }

    #[inline]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    #[inline]
    pub fn accuracy(&self) -> AccuracyLevel {
        self.scheduler.accuracy()
    }

    pub fn pointer(&self) -> Option<PointerSample> {
        self.pointer
    }

    pub fn limits(&self) -> &ViewLimits {
        &self.limits
    }

    pub fn scheduler(&self) -> &RefinementScheduler {
        &self.scheduler
    }

    /// How long the host may sleep before calling [`tick`](Self::tick).
    pub fn time_until_refine(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_refine(now)
    }
}
