//! Synthetic three-finger swipe emission
//!
//! A swipe is written as one setup frame (touch down for slots 0..3), a
//! linear ramp of `steps` frames, and one teardown frame that lifts all
//! contacts. Downstream recognisers key off velocity, so the ramp is paced
//! rather than jumping from start to end.

use std::io;
use std::thread;

use thiserror::Error;

use crate::config::{EmitterConfig, SYNTHETIC_CONTACTS};

use super::accumulator::SwipeDirection;
use super::events::{Frame, TouchCode};

/// Tracking id that marks a contact as lifted
pub const TRACKING_ID_LIFTED: i32 = -1;

/// Errors raised while writing a swipe
#[derive(Error, Debug)]
pub enum EmitError {
    /// The sink rejected a frame; the swipe may be partially written
    #[error("failed to write frame {frame} of {total}")]
    Sink {
        frame: usize,
        total: usize,
        #[source]
        source: io::Error,
    },
}

/// Destination of synthetic frames
///
/// Each call writes the frame's events followed by one `SYN_REPORT`.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        (**self).write_frame(frame)
    }
}

/// Sink that keeps every frame in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<Frame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn take_frames(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

impl FrameSink for RecordingSink {
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Builds and writes the synthetic swipe
#[derive(Debug, Clone)]
pub struct GestureEmitter {
    config: EmitterConfig,
}

impl GestureEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Number of frames in one swipe
    pub fn frame_count(&self) -> usize {
        self.config.steps as usize + 2
    }

    fn slot_origin(&self, slot: i32) -> i32 {
        self.config.base + slot * self.config.slot_spacing
    }

    /// Touch down with three fresh contacts
    pub fn setup_frame(&self) -> Frame {
        let mut frame = Frame::new();
        frame.push(TouchCode::Touch, 1);
        frame.push(TouchCode::ThreeFingers, 1);
        for slot in 0..SYNTHETIC_CONTACTS {
            let origin = self.slot_origin(slot);
            frame.push(TouchCode::Slot, slot);
            frame.push(TouchCode::TrackingId, self.config.tracking_id_base + slot);
            frame.push(TouchCode::PositionX, origin);
            frame.push(TouchCode::PositionY, origin);
            frame.push(TouchCode::Pressure, self.config.pressure);
        }
        frame
    }

    /// Positions of all contacts after `step` (1-based) ramp steps
    pub fn ramp_frame(&self, direction: SwipeDirection, step: u32) -> Frame {
        let (dx, dy) = direction.unit();
        let travel = step as i32 * self.config.step_size;

        let mut frame = Frame::new();
        for slot in 0..SYNTHETIC_CONTACTS {
            let origin = self.slot_origin(slot);
            frame.push(TouchCode::Slot, slot);
            frame.push(TouchCode::PositionX, origin + dx * travel);
            frame.push(TouchCode::PositionY, origin + dy * travel);
        }
        frame
    }

    /// Lifts all contacts and releases the indicators
    pub fn teardown_frame(&self) -> Frame {
        let mut frame = Frame::new();
        for slot in 0..SYNTHETIC_CONTACTS {
            frame.push(TouchCode::Slot, slot);
            frame.push(TouchCode::TrackingId, TRACKING_ID_LIFTED);
        }
        frame.push(TouchCode::ThreeFingers, 0);
        frame.push(TouchCode::Touch, 0);
        frame
    }

    /// Every frame of a swipe, in write order
    pub fn frames(&self, direction: SwipeDirection) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.frame_count());
        frames.push(self.setup_frame());
        frames.extend((1..=self.config.steps).map(|step| self.ramp_frame(direction, step)));
        frames.push(self.teardown_frame());
        frames
    }

    /// Writes a full swipe, blocking through the ramp pacing
    ///
    /// Stops at the first failed write; the contacts are then left as
    /// written so far.
    pub fn emit<S: FrameSink + ?Sized>(
        &self,
        direction: SwipeDirection,
        sink: &mut S,
    ) -> Result<(), EmitError> {
        let total = self.frame_count();
        let interval = self.config.frame_interval();
        let write = |sink: &mut S, index: usize, frame: &Frame| {
            sink.write_frame(frame).map_err(|source| EmitError::Sink {
                frame: index + 1,
                total,
                source,
            })
        };

        write(sink, 0, &self.setup_frame())?;
        for step in 1..=self.config.steps {
            write(sink, step as usize, &self.ramp_frame(direction, step))?;
            if !interval.is_zero() {
                thread::sleep(interval);
            }
        }
        write(sink, total - 1, &self.teardown_frame())?;

        tracing::debug!(%direction, frames = total, "swipe emitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter() -> GestureEmitter {
        GestureEmitter::new(EmitterConfig {
            frame_interval_ms: 0,
            ..EmitterConfig::default()
        })
    }

    struct FailingSink {
        accept: usize,
        written: usize,
    }

    impl FrameSink for FailingSink {
        fn write_frame(&mut self, _frame: &Frame) -> io::Result<()> {
            if self.written == self.accept {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"));
            }
            self.written += 1;
            Ok(())
        }
    }

    #[test]
    fn test_setup_frame_layout() {
        let frame = emitter().setup_frame();
        assert_eq!(frame.events.len(), 2 + 3 * 5);
        assert_eq!(frame.events[0].code, TouchCode::Touch);
        assert_eq!(frame.events[1].code, TouchCode::ThreeFingers);
        for slot in 0..3 {
            let origin = 5000 + slot * 100;
            assert_eq!(frame.slot_value(slot, TouchCode::TrackingId), Some(1000 + slot));
            assert_eq!(frame.slot_value(slot, TouchCode::PositionX), Some(origin));
            assert_eq!(frame.slot_value(slot, TouchCode::PositionY), Some(origin));
            assert_eq!(frame.slot_value(slot, TouchCode::Pressure), Some(30));
        }
    }

    #[test]
    fn test_ramp_is_linear() {
        let emitter = emitter();
        let frames = emitter.frames(SwipeDirection::Up);
        assert_eq!(frames.len(), 12);

        for step in 1..=10 {
            let frame = &frames[step as usize];
            for slot in 0..3 {
                let origin = 5000 + slot * 100;
                assert_eq!(frame.slot_value(slot, TouchCode::PositionX), Some(origin));
                assert_eq!(
                    frame.slot_value(slot, TouchCode::PositionY),
                    Some(origin + step * 50)
                );
            }
        }
    }

    #[test]
    fn test_left_ramp_moves_negative() {
        let frame = emitter().ramp_frame(SwipeDirection::Left, 10);
        assert_eq!(frame.slot_value(0, TouchCode::PositionX), Some(4500));
        assert_eq!(frame.slot_value(2, TouchCode::PositionX), Some(4700));
        assert_eq!(frame.slot_value(2, TouchCode::PositionY), Some(5200));
    }

    #[test]
    fn test_teardown_lifts_everything() {
        let frame = emitter().teardown_frame();
        for slot in 0..3 {
            assert_eq!(
                frame.slot_value(slot, TouchCode::TrackingId),
                Some(TRACKING_ID_LIFTED)
            );
        }
        assert_eq!(frame.key_value(TouchCode::ThreeFingers), Some(0));
        assert_eq!(frame.key_value(TouchCode::Touch), Some(0));
    }

    #[test]
    fn test_emit_writes_all_frames() {
        let emitter = emitter();
        let mut sink = RecordingSink::new();
        emitter.emit(SwipeDirection::Right, &mut sink).unwrap();
        assert_eq!(sink.frames(), emitter.frames(SwipeDirection::Right).as_slice());
    }

    #[test]
    fn test_emit_stops_at_first_failure() {
        let mut sink = FailingSink {
            accept: 4,
            written: 0,
        };
        let err = emitter().emit(SwipeDirection::Down, &mut sink).unwrap_err();
        assert_eq!(sink.written, 4);
        match err {
            EmitError::Sink { frame, total, .. } => {
                assert_eq!(frame, 5);
                assert_eq!(total, 12);
            }
        }
    }

    #[test]
    fn test_boxed_sink() {
        let mut sink: Box<dyn FrameSink> = Box::new(RecordingSink::new());
        assert!(emitter().emit(SwipeDirection::Left, &mut sink).is_ok());
    }
}
