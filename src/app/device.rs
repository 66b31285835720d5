//! evdev source and uinput sink
//!
//! See <https://www.kernel.org/doc/html/latest/input/multi-touch-protocol.html>
//! for the slot protocol both sides speak.

use std::io;
use std::path::Path;
use std::time::Instant;

use evdev::uinput::VirtualDevice;
use evdev::{
    AbsInfo, AbsoluteAxisCode, AttributeSet, BusType, Device, InputEvent, InputId, KeyCode,
    UinputAbsSetup,
};
use tracing::info;

use super::error::{DeviceError, DeviceResult};
use crate::config::{POSITION_MAX, PRESSURE_MAX, SYNTHETIC_CONTACTS, TRACKING_ID_MAX, VirtualDeviceConfig};
use crate::gesture::{EventKind, Frame, FrameSink, RawEvent};

/// Resolution (units/mm) advertised for the position axes
const POSITION_RESOLUTION: i32 = 31;

/// Opens the physical touchpad
pub fn open_source(path: &Path) -> DeviceResult<Device> {
    let device = Device::open(path).map_err(|source| DeviceError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        name = device.name().unwrap_or("unknown"),
        "Opened touch device"
    );
    Ok(device)
}

/// Capabilities the recogniser relies on that `device` does not advertise
pub fn missing_capabilities(device: &Device) -> Vec<&'static str> {
    let mut missing = Vec::new();

    let axes = device.supported_absolute_axes();
    for (axis, name) in [
        (AbsoluteAxisCode::ABS_MT_SLOT, "ABS_MT_SLOT"),
        (AbsoluteAxisCode::ABS_MT_POSITION_X, "ABS_MT_POSITION_X"),
        (AbsoluteAxisCode::ABS_MT_POSITION_Y, "ABS_MT_POSITION_Y"),
    ] {
        if !axes.is_some_and(|a| a.contains(axis)) {
            missing.push(name);
        }
    }

    let keys = device.supported_keys();
    for (key, name) in [
        (KeyCode::BTN_TOUCH, "BTN_TOUCH"),
        (KeyCode::BTN_TOOL_TRIPLETAP, "BTN_TOOL_TRIPLETAP"),
    ] {
        if !keys.is_some_and(|k| k.contains(key)) {
            missing.push(name);
        }
    }

    missing
}

/// Converts an evdev event, stamping it with the time it was read
pub fn decode(event: &InputEvent, time: Instant) -> RawEvent {
    RawEvent::new(
        EventKind::from_raw(event.event_type().0),
        event.code(),
        event.value(),
        time,
    )
}

/// Converts a synthetic frame into evdev events (without the trailing sync)
pub fn encode(frame: &Frame) -> Vec<InputEvent> {
    frame
        .events
        .iter()
        .map(|event| InputEvent::new(event.code.kind().raw(), event.code.raw(), event.value))
        .collect()
}

/// Creates the virtual touchpad the synthetic swipes are written to
pub fn create_virtual_touchpad(config: &VirtualDeviceConfig) -> DeviceResult<VirtualDevice> {
    fn abs(min: i32, max: i32, resolution: i32) -> AbsInfo {
        AbsInfo::new(0, min, max, 0, 0, resolution)
    }

    let position = abs(0, POSITION_MAX, POSITION_RESOLUTION);
    let keys = AttributeSet::from_iter([
        KeyCode::BTN_LEFT,
        KeyCode::BTN_RIGHT,
        KeyCode::BTN_TOUCH,
        KeyCode::BTN_TOOL_FINGER,
        KeyCode::BTN_TOOL_DOUBLETAP,
        KeyCode::BTN_TOOL_TRIPLETAP,
        KeyCode::BTN_TOOL_QUADTAP,
    ]);

    let build = || -> io::Result<VirtualDevice> {
        VirtualDevice::builder()?
            .name(&config.name)
            .input_id(InputId::new(
                BusType::BUS_USB,
                config.vendor,
                config.product,
                config.version,
            ))
            .with_keys(&keys)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisCode::ABS_X, position))?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisCode::ABS_Y, position))?
            .with_absolute_axis(&UinputAbsSetup::new(
                AbsoluteAxisCode::ABS_MT_POSITION_X,
                position,
            ))?
            .with_absolute_axis(&UinputAbsSetup::new(
                AbsoluteAxisCode::ABS_MT_POSITION_Y,
                position,
            ))?
            .with_absolute_axis(&UinputAbsSetup::new(
                AbsoluteAxisCode::ABS_MT_SLOT,
                abs(0, SYNTHETIC_CONTACTS - 1, 0),
            ))?
            .with_absolute_axis(&UinputAbsSetup::new(
                AbsoluteAxisCode::ABS_MT_TRACKING_ID,
                abs(-1, TRACKING_ID_MAX, 0),
            ))?
            .with_absolute_axis(&UinputAbsSetup::new(
                AbsoluteAxisCode::ABS_MT_PRESSURE,
                abs(0, PRESSURE_MAX, 0),
            ))?
            .build()
    };

    let device = build().map_err(DeviceError::VirtualDevice)?;
    info!(name = %config.name, "Created virtual touchpad");
    Ok(device)
}

/// Writes frames to the uinput device
pub struct UinputSink {
    device: VirtualDevice,
}

impl UinputSink {
    pub fn new(device: VirtualDevice) -> Self {
        Self { device }
    }
}

impl FrameSink for UinputSink {
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        // emit() appends the SYN_REPORT
        self.device.emit(&encode(frame))
    }
}

/// Logs frames instead of writing them (`--dry-run`)
#[derive(Debug, Default)]
pub struct LogSink {
    written: usize,
}

impl FrameSink for LogSink {
    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.written += 1;
        info!(frame = self.written, events = ?frame.events, "dry-run frame");
        Ok(())
    }
}
