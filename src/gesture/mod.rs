//! Three-finger swipe detection and synthesis
//!
//! Device independent: consumes decoded [`RawEvent`]s and writes synthetic
//! [`Frame`]s to any [`FrameSink`].
//!
//! # Architecture
//!
//! ```text
//! RawEvent → SlotTracker ──(SlotDelta)──► GestureAccumulator
//!                                              │ Swipe
//!                                              ▼
//!                                       GestureEmitter → FrameSink
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Instant;
//! use triswipe::config::AppConfig;
//! use triswipe::gesture::{RawEvent, RecordingSink, SwipePipeline, TouchCode};
//!
//! let mut pipeline = SwipePipeline::new(&AppConfig::default(), RecordingSink::new())?;
//! let now = Instant::now();
//! pipeline.process(&RawEvent::touch(TouchCode::ThreeFingers, 1, now))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod accumulator;
mod emitter;
mod events;
mod pipeline;
mod tracker;

pub use accumulator::{GestureAccumulator, GesturePhase, Swipe, SwipeDirection};
pub use emitter::{EmitError, FrameSink, GestureEmitter, RecordingSink, TRACKING_ID_LIFTED};
pub use events::{EventKind, Frame, OutputEvent, RawEvent, TouchCode};
pub use pipeline::SwipePipeline;
pub use tracker::{Axis, SlotDelta, SlotState, SlotTracker, TRACKED_SLOTS};
