//! Raw viewport input, expressed independently of any windowing toolkit.

/// A pointer position in viewport pixel coordinates (origin top-left,
/// y down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Movement from `previous` to `self`, in pixels.
    #[inline]
    pub fn delta_from(self, previous: Self) -> (f64, f64) {
        (self.x - previous.x, self.y - previous.y)
    }
}

/// One input event delivered to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    /// Primary button went down at `pos`.
    PointerPress { pos: PointerSample },
    /// Pointer moved to `pos`; `primary_down` reports the button state at
    /// the time of the move.
    PointerMove {
        pos: PointerSample,
        primary_down: bool,
    },
    /// Wheel rotation in 1/120-notch units, positive away from the user.
    Wheel { delta: f64 },
    /// Viewport resized to `width`×`height` pixels.
    Resize { width: u32, height: u32 },
}

/// The kinds of input that change the view and therefore restart
/// refinement. Each has its own quiet interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Resize,
    Drag,
    Zoom,
}

impl InputKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Drag => "drag",
            Self::Zoom => "zoom",
        }
    }
}
