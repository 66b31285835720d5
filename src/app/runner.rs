//! Blocking read loop driving the swipe pipeline

use std::convert::Infallible;
use std::thread;
use std::time::{Instant, SystemTime};

use evdev::Device;
use tracing::{info, trace, warn};

use super::device::{self, LogSink, UinputSink};
use super::error::{DeviceError, DeviceResult};
use crate::config::AppConfig;
use crate::gesture::{FrameSink, RawEvent, SwipePipeline, TouchCode};

/// Wall-clock span of the most recent swipe emission
///
/// Finger motion the device reported while the burst was being written is
/// discarded. Slot selects and key reports still reach the pipeline so the
/// slot cursor and the release reset stay in step with the kernel.
#[derive(Debug, Clone, Copy, Default)]
struct EmissionWindow {
    span: Option<(SystemTime, SystemTime)>,
}

impl EmissionWindow {
    fn record(&mut self, start: SystemTime, end: SystemTime) {
        self.span = Some((start, end));
    }

    fn contains(&self, timestamp: SystemTime) -> bool {
        self.span
            .is_some_and(|(start, end)| timestamp >= start && timestamp <= end)
    }
}

/// Whether an event stamped `timestamp` may enter the pipeline
fn admits(emission: &EmissionWindow, event: &RawEvent, timestamp: SystemTime) -> bool {
    let motion = matches!(
        event.touch_code(),
        Some(TouchCode::PositionX | TouchCode::PositionY)
    );
    !(motion && emission.contains(timestamp))
}

/// The running daemon: one physical source, one pipeline
pub struct App {
    config: AppConfig,
    source: Device,
    pipeline: SwipePipeline<Box<dyn FrameSink>>,
    emission: EmissionWindow,
}

impl App {
    /// Opens the source and the sink
    ///
    /// With `dry_run` frames are logged instead of written to uinput.
    pub fn new(config: AppConfig, dry_run: bool) -> DeviceResult<Self> {
        info!(profile = %config.profile, "Starting triswipe");
        info!(?config.gesture, "Gesture configuration");

        let source = device::open_source(&config.device.source)?;
        let missing = device::missing_capabilities(&source);
        if !missing.is_empty() {
            warn!(?missing, "Touch device lacks multitouch capabilities, swipes may never fire");
        }

        let sink: Box<dyn FrameSink> = if dry_run {
            info!("Dry run: synthetic frames are logged, not written");
            Box::new(LogSink::default())
        } else {
            let touchpad = device::create_virtual_touchpad(&config.virtual_device)?;
            // Give the compositor time to pick the new device up
            thread::sleep(config.virtual_device.settle());
            Box::new(UinputSink::new(touchpad))
        };

        let pipeline = SwipePipeline::new(&config, sink)?;
        Ok(Self {
            config,
            source,
            pipeline,
            emission: EmissionWindow::default(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Processes input until a fatal error occurs
    pub fn run(&mut self) -> DeviceResult<Infallible> {
        info!(
            source = %self.config.device.source.display(),
            "Listening for three-finger swipes"
        );

        loop {
            // Blocks until the device has input, then yields everything queued
            let events = self.source.fetch_events().map_err(DeviceError::Read)?;
            for event in events {
                let raw = device::decode(&event, Instant::now());
                if !admits(&self.emission, &raw, event.timestamp()) {
                    trace!(code = event.code(), "dropping motion from emission window");
                    continue;
                }

                let started = SystemTime::now();
                if self.pipeline.process(&raw)?.is_some() {
                    self.emission.record(started, SystemTime::now());
                }
            }
        }
    }
}
