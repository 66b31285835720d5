//! Three-finger swipe recognition
//!
//! Filtered slot deltas are summed into a 2D motion vector at all times.
//! Whether that vector may trigger a swipe depends on the phase:
//!
//! ```text
//!            BTN_TOOL_TRIPLETAP=1
//!   Idle ───────────────────────────► Recognizing ──(threshold crossed)──► Cooldown
//!    ▲    grace period elapsed            ▲                                   │
//!    └────────────────────────────────────┴────────── cooldown elapsed ───────┘
//! ```
//!
//! Recognition stays open while the three-finger indicator is asserted, or
//! within the grace period after its most recent assertion. A primary touch
//! release resets everything except the cooldown clock.

use std::time::{Duration, Instant};

use crate::config::GestureConfig;

use super::tracker::{Axis, SlotDelta};

/// Discrete swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    /// Fingers moved towards the top of the pad
    Up,
    Down,
}

impl SwipeDirection {
    /// Unit vector `(dx, dy)` handed to the emitter
    ///
    /// `dy` follows the accumulator's convention (upward motion positive)
    /// and is applied to the raw output coordinates unchanged.
    pub fn unit(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, 1),
            Self::Down => (0, -1),
        }
    }

    fn horizontal(sum: i32) -> Self {
        if sum > 0 { Self::Right } else { Self::Left }
    }

    fn vertical(sum: i32) -> Self {
        if sum > 0 { Self::Up } else { Self::Down }
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// A recognised swipe and the motion that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swipe {
    pub direction: SwipeDirection,
    pub accumulated_x: i32,
    pub accumulated_y: i32,
}

/// Recognition phase at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No recent three-finger contact; the accumulator is not evaluated
    Idle,
    /// Three fingers down, or lifted within the grace period
    Recognizing {
        /// Whether the indicator is currently asserted
        fingers_down: bool,
    },
    /// A swipe fired recently; no other may fire yet
    Cooldown { remaining: Duration },
}

/// State of the three-finger indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThreeFingers {
    /// Never asserted since startup or the last reset
    Absent,
    Down { asserted_at: Instant },
    Lifted { asserted_at: Instant },
}

/// Sums slot deltas and decides when they form a swipe
#[derive(Debug, Clone)]
pub struct GestureAccumulator {
    config: GestureConfig,
    accumulated_x: i32,
    accumulated_y: i32,
    three_fingers: ThreeFingers,
    last_emission: Option<Instant>,
}

impl GestureAccumulator {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            accumulated_x: 0,
            accumulated_y: 0,
            three_fingers: ThreeFingers::Absent,
            last_emission: None,
        }
    }

    /// Applies a `BTN_TOOL_TRIPLETAP` report
    ///
    /// Value 1 asserts and restarts the grace clock; any other value lifts.
    pub fn set_three_fingers(&mut self, value: i32, now: Instant) {
        self.three_fingers = match (value, self.three_fingers) {
            (1, _) => ThreeFingers::Down { asserted_at: now },
            (_, ThreeFingers::Down { asserted_at } | ThreeFingers::Lifted { asserted_at }) => {
                ThreeFingers::Lifted { asserted_at }
            }
            (_, ThreeFingers::Absent) => ThreeFingers::Absent,
        };
        tracing::debug!(value, state = ?self.three_fingers, "three-finger indicator");
    }

    /// Adds a filtered delta to the running sum
    pub fn accumulate(&mut self, delta: SlotDelta) {
        match delta.axis {
            Axis::X => self.accumulated_x = self.accumulated_x.saturating_add(delta.delta),
            Axis::Y => self.accumulated_y = self.accumulated_y.saturating_add(delta.delta),
        }
    }

    /// Phase of the state machine at `now`
    pub fn phase(&self, now: Instant) -> GesturePhase {
        if let Some(remaining) = self.cooldown_remaining(now) {
            return GesturePhase::Cooldown { remaining };
        }

        match self.three_fingers {
            ThreeFingers::Down { .. } => GesturePhase::Recognizing { fingers_down: true },
            ThreeFingers::Lifted { asserted_at }
                if now.saturating_duration_since(asserted_at) < self.config.grace_period() =>
            {
                GesturePhase::Recognizing {
                    fingers_down: false,
                }
            }
            _ => GesturePhase::Idle,
        }
    }

    fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last_emission?);
        self.config.cooldown().checked_sub(elapsed).filter(|r| !r.is_zero())
    }

    /// Checks the running sum against the thresholds
    ///
    /// On a match the sum is cleared and the cooldown clock restarted.
    pub fn evaluate(&mut self, now: Instant) -> Option<Swipe> {
        if !matches!(self.phase(now), GesturePhase::Recognizing { .. }) {
            return None;
        }

        let direction = self.classify()?;
        let swipe = Swipe {
            direction,
            accumulated_x: self.accumulated_x,
            accumulated_y: self.accumulated_y,
        };

        self.accumulated_x = 0;
        self.accumulated_y = 0;
        self.last_emission = Some(now);
        Some(swipe)
    }

    fn classify(&self) -> Option<SwipeDirection> {
        let ax = self.accumulated_x.saturating_abs();
        let ay = self.accumulated_y.saturating_abs();
        let GestureConfig {
            swipe_threshold_x,
            swipe_threshold_y,
            dead_zone,
            ..
        } = self.config;

        if ax >= ay && ax > swipe_threshold_x && ay < dead_zone {
            Some(SwipeDirection::horizontal(self.accumulated_x))
        } else if ay > ax && ay > swipe_threshold_y && ax < dead_zone {
            Some(SwipeDirection::vertical(self.accumulated_y))
        } else {
            None
        }
    }

    /// Clears the sum and the three-finger state; the cooldown clock survives
    pub fn reset(&mut self) {
        self.accumulated_x = 0;
        self.accumulated_y = 0;
        self.three_fingers = ThreeFingers::Absent;
    }

    /// Current running sum `(x, y)`
    pub fn accumulated(&self) -> (i32, i32) {
        (self.accumulated_x, self.accumulated_y)
    }

    pub fn three_fingers_active(&self) -> bool {
        matches!(self.three_fingers, ThreeFingers::Down { .. })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }
}
