use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::input::InputKind;

/// Iteration bound at accuracy level 0. Each level doubles it.
pub const BASE_ITERATIONS: u32 = 64;

/// Highest accepted accuracy level (`64 << 16` ≈ 4.2M iterations).
pub const MAX_ACCURACY: u8 = 16;

/// Escape-time accuracy handed to the shader.
///
/// The shader iterates up to `BASE_ITERATIONS << level` times, so cost grows
/// exponentially with the level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccuracyLevel(pub u8);

impl AccuracyLevel {
    /// Used while the view is moving.
    pub const LOW: Self = Self(0);
    /// Used once input has settled.
    pub const HIGH: Self = Self(4);

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// The iteration bound the shader applies at this level.
    pub fn max_iterations(self) -> u32 {
        BASE_ITERATIONS << u32::from(self.0.min(MAX_ACCURACY))
    }
}

impl std::fmt::Display for AccuracyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether the caller should paint another frame.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Skip,
    Request,
}

impl Redraw {
    #[inline]
    pub fn is_requested(self) -> bool {
        self == Self::Request
    }

    /// Combine two outcomes; requests coalesce.
    #[inline]
    pub fn or(self, other: Self) -> Self {
        if self.is_requested() || other.is_requested() {
            Self::Request
        } else {
            Self::Skip
        }
    }
}

/// Accuracy levels and quiet intervals for progressive refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefinePolicy {
    pub low: AccuracyLevel,
    pub high: AccuracyLevel,
    pub resize_quiet: Duration,
    pub drag_quiet: Duration,
    pub zoom_quiet: Duration,
}

impl Default for RefinePolicy {
    fn default() -> Self {
        Self {
            low: AccuracyLevel::LOW,
            high: AccuracyLevel::HIGH,
            resize_quiet: Duration::from_millis(1000),
            drag_quiet: Duration::from_millis(500),
            zoom_quiet: Duration::from_millis(300),
        }
    }
}

impl RefinePolicy {
    pub fn validate(&self) -> crate::Result<()> {
        if self.low >= self.high || self.high.0 > MAX_ACCURACY {
            return Err(CoreError::InvalidAccuracy {
                low: self.low.0,
                high: self.high.0,
            });
        }
        Ok(())
    }

    /// How long input of `kind` must stay quiet before refining.
    pub fn quiet_interval(&self, kind: InputKind) -> Duration {
        match kind {
            InputKind::Resize => self.resize_quiet,
            InputKind::Drag => self.drag_quiet,
            InputKind::Zoom => self.zoom_quiet,
        }
    }
}

/// Debounce state. Only one deadline is ever outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineState {
    Idle,
    Armed { deadline: Instant },
}

/// Keeps frames cheap while the view moves and asks for one expensive frame
/// once it has been still for the input's quiet interval.
///
/// Time is supplied by the caller on every call, so the scheduler never
/// reads a clock itself.
#[derive(Debug, Clone)]
pub struct RefinementScheduler {
    policy: RefinePolicy,
    accuracy: AccuracyLevel,
    state: RefineState,
}

impl RefinementScheduler {
    pub fn new(policy: RefinePolicy) -> Self {
        Self {
            policy,
            accuracy: policy.low,
            state: RefineState::Idle,
        }
    }

    /// Drop to low accuracy and (re)start the countdown for `kind`.
    ///
    /// A pending deadline is replaced, not queued behind.
    pub fn arm(&mut self, kind: InputKind, now: Instant) {
        let quiet = self.policy.quiet_interval(kind);
        self.accuracy = self.policy.low;
        self.state = RefineState::Armed {
            deadline: now + quiet,
        };
        trace!(kind = kind.label(), ?quiet, "refinement armed");
    }

    /// Fire the countdown if its deadline has passed.
    ///
    /// Returns [`Redraw::Request`] exactly once per armed countdown.
    pub fn tick(&mut self, now: Instant) -> Redraw {
        match self.state {
            RefineState::Armed { deadline } if now >= deadline => {
                self.state = RefineState::Idle;
                self.accuracy = self.policy.high;
                debug!(accuracy = %self.accuracy, "view settled, refining");
                Redraw::Request
            }
            _ => Redraw::Skip,
        }
    }

    /// Time left before the pending countdown fires, if one is armed.
    pub fn time_until_refine(&self, now: Instant) -> Option<Duration> {
        match self.state {
            RefineState::Armed { deadline } => Some(deadline.saturating_duration_since(now)),
            RefineState::Idle => None,
        }
    }

    #[inline]
    pub fn accuracy(&self) -> AccuracyLevel {
        self.accuracy
    }

    #[inline]
    pub fn state(&self) -> RefineState {
        self.state
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, RefineState::Armed { .. })
    }

    pub fn policy(&self) -> &RefinePolicy {
        &self.policy
    }
}

impl Default for RefinementScheduler {
    fn default() -> Self {
        Self::new(RefinePolicy::default())
    }
}
