//! Event routing from the raw stream to the emitter

use config::ConfigError;

use crate::config::AppConfig;

use super::accumulator::{GestureAccumulator, GesturePhase, Swipe};
use super::emitter::{EmitError, FrameSink, GestureEmitter};
use super::events::{RawEvent, TouchCode};
use super::tracker::SlotTracker;

/// Slot tracker, accumulator and emitter wired in a line
///
/// `process` is called once per raw event, in read order. When a swipe
/// fires, the whole burst is written before `process` returns, so events
/// that arrive meanwhile wait in the device queue.
pub struct SwipePipeline<S: FrameSink> {
    tracker: SlotTracker,
    accumulator: GestureAccumulator,
    emitter: GestureEmitter,
    sink: S,
    swipes: u64,
}

impl<S: FrameSink> SwipePipeline<S> {
    /// Fails if `config` does not pass [`AppConfig::validate`]; an
    /// unchecked emitter config could overflow the ramp coordinates
    pub fn new(config: &AppConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tracker: SlotTracker::new(config.gesture.noise_threshold),
            accumulator: GestureAccumulator::new(config.gesture),
            emitter: GestureEmitter::new(config.emitter),
            sink,
            swipes: 0,
        })
    }

    /// Feeds one event; returns the swipe it triggered, if any
    pub fn process(&mut self, event: &RawEvent) -> Result<Option<Swipe>, EmitError> {
        let code = event.touch_code();

        if code == Some(TouchCode::ThreeFingers) {
            self.accumulator.set_three_fingers(event.value, event.time);
        }

        if let Some(delta) = self.tracker.handle(event) {
            self.accumulator.accumulate(delta);
        }

        // Evaluated on every event, sync markers included
        let swipe = self.accumulator.evaluate(event.time);
        if let Some(swipe) = swipe {
            tracing::info!(
                direction = %swipe.direction,
                dx = swipe.accumulated_x,
                dy = swipe.accumulated_y,
                "swipe recognised"
            );
            self.emitter.emit(swipe.direction, &mut self.sink)?;
            self.swipes += 1;
        }

        // Primary touch release: evaluated above first, then everything starts over
        if code == Some(TouchCode::Touch) && event.value == 0 {
            tracing::debug!("touch released, resetting gesture state");
            self.tracker.reset();
            self.accumulator.reset();
        }

        Ok(swipe)
    }

    pub fn phase(&self, event_time: std::time::Instant) -> GesturePhase {
        self.accumulator.phase(event_time)
    }

    pub fn tracker(&self) -> &SlotTracker {
        &self.tracker
    }

    pub fn accumulator(&self) -> &GestureAccumulator {
        &self.accumulator
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Swipes emitted since creation
    pub fn swipe_count(&self) -> u64 {
        self.swipes
    }
}
