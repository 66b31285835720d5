//! Per-slot position tracking
//!
//! Decodes the slot cursor and absolute positions of the multitouch
//! protocol into filtered per-axis deltas. Only slots 0 and 1 carry
//! position state; reports for higher slots are dropped here, so motion of
//! the third finger never reaches the accumulator.

use super::events::{RawEvent, TouchCode};

/// Slots whose positions are tracked
pub const TRACKED_SLOTS: usize = 2;

/// Axis of a filtered delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Motion of one tracked slot along one axis since its previous report
///
/// Positive `Y` means upward motion (decreasing raw Y).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDelta {
    pub slot: usize,
    pub axis: Axis,
    pub delta: i32,
}

/// Last observed position of a tracked slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotState {
    pub last_x: Option<i32>,
    pub last_y: Option<i32>,
}

/// Tracks the slot cursor and the positions of slots 0 and 1
#[derive(Debug, Clone)]
pub struct SlotTracker {
    current_slot: i32,
    slots: [SlotState; TRACKED_SLOTS],
    noise_threshold: i32,
}

impl SlotTracker {
    /// Creates a tracker that discards deltas with `|delta| <= noise_threshold`
    pub fn new(noise_threshold: i32) -> Self {
        Self {
            current_slot: 0,
            slots: [SlotState::default(); TRACKED_SLOTS],
            noise_threshold,
        }
    }

    /// Feeds one raw event, returning the delta to accumulate (if any)
    pub fn handle(&mut self, event: &RawEvent) -> Option<SlotDelta> {
        match event.touch_code()? {
            TouchCode::Slot => {
                self.current_slot = event.value;
                None
            }
            TouchCode::PositionX => self.update(Axis::X, event.value),
            TouchCode::PositionY => self.update(Axis::Y, event.value),
            _ => None,
        }
    }

    fn update(&mut self, axis: Axis, value: i32) -> Option<SlotDelta> {
        let slot = self.tracked_slot()?;
        let state = &mut self.slots[slot];

        // The position is recorded even when the delta is filtered out
        let delta = match axis {
            Axis::X => state.last_x.replace(value).map(|prev| value - prev),
            Axis::Y => state.last_y.replace(value).map(|prev| prev - value),
        };

        let delta = delta.filter(|d| d.abs() > self.noise_threshold)?;
        tracing::trace!(slot, ?axis, delta, "slot delta");
        Some(SlotDelta { slot, axis, delta })
    }

    fn tracked_slot(&self) -> Option<usize> {
        usize::try_from(self.current_slot)
            .ok()
            .filter(|&slot| slot < TRACKED_SLOTS)
    }

    /// Forgets all positions; the slot cursor is kept
    pub fn reset(&mut self) {
        self.slots = [SlotState::default(); TRACKED_SLOTS];
    }

    pub fn current_slot(&self) -> i32 {
        self.current_slot
    }

    /// Position state of a tracked slot
    pub fn slot(&self, slot: usize) -> Option<&SlotState> {
        self.slots.get(slot)
    }
}
