//! Raw multitouch events and the synthetic output frames
//!
//! Codes are the Linux input event codes; the `evdev` constants are used
//! directly so the decoder and the virtual device agree on numbering.

use std::time::Instant;

use evdev::{AbsoluteAxisCode, EventType, KeyCode};

/// Kind of a raw input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `EV_ABS` absolute-axis report
    Absolute,
    /// `EV_KEY` key/button report
    Key,
    /// `EV_SYN` frame marker
    Sync,
    /// Anything else (`EV_MSC` timestamps and the like)
    Other(u16),
}

impl EventKind {
    pub fn from_raw(event_type: u16) -> Self {
        match EventType(event_type) {
            EventType::ABSOLUTE => Self::Absolute,
            EventType::KEY => Self::Key,
            EventType::SYNCHRONIZATION => Self::Sync,
            _ => Self::Other(event_type),
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Self::Absolute => EventType::ABSOLUTE.0,
            Self::Key => EventType::KEY.0,
            Self::Sync => EventType::SYNCHRONIZATION.0,
            Self::Other(raw) => raw,
        }
    }
}

/// Semantic meaning of the event codes this crate reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchCode {
    /// `ABS_MT_SLOT`: selects the slot subsequent reports apply to
    Slot,
    /// `ABS_MT_TRACKING_ID`
    TrackingId,
    /// `ABS_MT_POSITION_X`
    PositionX,
    /// `ABS_MT_POSITION_Y`
    PositionY,
    /// `ABS_MT_PRESSURE`
    Pressure,
    /// `BTN_TOUCH`: general touch contact
    Touch,
    /// `BTN_TOOL_TRIPLETAP`: exactly three contacts
    ThreeFingers,
}

impl TouchCode {
    /// Decodes a kind/code pair; unknown codes yield `None`
    pub fn decode(kind: EventKind, code: u16) -> Option<Self> {
        match kind {
            EventKind::Absolute => match AbsoluteAxisCode(code) {
                AbsoluteAxisCode::ABS_MT_SLOT => Some(Self::Slot),
                AbsoluteAxisCode::ABS_MT_TRACKING_ID => Some(Self::TrackingId),
                AbsoluteAxisCode::ABS_MT_POSITION_X => Some(Self::PositionX),
                AbsoluteAxisCode::ABS_MT_POSITION_Y => Some(Self::PositionY),
                AbsoluteAxisCode::ABS_MT_PRESSURE => Some(Self::Pressure),
                _ => None,
            },
            EventKind::Key => match KeyCode(code) {
                KeyCode::BTN_TOUCH => Some(Self::Touch),
                KeyCode::BTN_TOOL_TRIPLETAP => Some(Self::ThreeFingers),
                _ => None,
            },
            EventKind::Sync | EventKind::Other(_) => None,
        }
    }

    pub fn kind(self) -> EventKind {
        match self {
            Self::Slot | Self::TrackingId | Self::PositionX | Self::PositionY | Self::Pressure => {
                EventKind::Absolute
            }
            Self::Touch | Self::ThreeFingers => EventKind::Key,
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Self::Slot => AbsoluteAxisCode::ABS_MT_SLOT.0,
            Self::TrackingId => AbsoluteAxisCode::ABS_MT_TRACKING_ID.0,
            Self::PositionX => AbsoluteAxisCode::ABS_MT_POSITION_X.0,
            Self::PositionY => AbsoluteAxisCode::ABS_MT_POSITION_Y.0,
            Self::Pressure => AbsoluteAxisCode::ABS_MT_PRESSURE.0,
            Self::Touch => KeyCode::BTN_TOUCH.0,
            Self::ThreeFingers => KeyCode::BTN_TOOL_TRIPLETAP.0,
        }
    }
}

/// One low-level event read from the physical device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
    /// Monotonic time the event was read
    pub time: Instant,
}

impl RawEvent {
    pub fn new(kind: EventKind, code: u16, value: i32, time: Instant) -> Self {
        Self {
            kind,
            code,
            value,
            time,
        }
    }

    /// Builds an event from a known code
    pub fn touch(code: TouchCode, value: i32, time: Instant) -> Self {
        Self::new(code.kind(), code.raw(), value, time)
    }

    /// `SYN_REPORT` marker
    pub fn sync(time: Instant) -> Self {
        Self::new(EventKind::Sync, 0, 0, time)
    }

    pub fn touch_code(&self) -> Option<TouchCode> {
        TouchCode::decode(self.kind, self.code)
    }
}

/// One event of a synthetic frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEvent {
    pub code: TouchCode,
    pub value: i32,
}

impl OutputEvent {
    pub fn new(code: TouchCode, value: i32) -> Self {
        Self { code, value }
    }
}

/// Events written together and terminated by one `SYN_REPORT`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub events: Vec<OutputEvent>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: TouchCode, value: i32) {
        self.events.push(OutputEvent::new(code, value));
    }

    /// Value of `code` for `slot`, following the slot cursor through the frame
    pub fn slot_value(&self, slot: i32, code: TouchCode) -> Option<i32> {
        let mut current = None;
        let mut found = None;
        for event in &self.events {
            if event.code == TouchCode::Slot {
                current = Some(event.value);
            } else if event.code == code && current == Some(slot) {
                found = Some(event.value);
            }
        }
        found
    }

    /// Last value written for a key code in this frame
    pub fn key_value(&self, code: TouchCode) -> Option<i32> {
        self.events
            .iter()
            .rev()
            .find(|event| event.code == code)
            .map(|event| event.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_codes() {
        assert_eq!(TouchCode::decode(EventKind::Absolute, 0x2f), Some(TouchCode::Slot));
        assert_eq!(TouchCode::decode(EventKind::Absolute, 0x35), Some(TouchCode::PositionX));
        assert_eq!(TouchCode::decode(EventKind::Absolute, 0x36), Some(TouchCode::PositionY));
        assert_eq!(TouchCode::decode(EventKind::Key, 0x14a), Some(TouchCode::Touch));
        assert_eq!(TouchCode::decode(EventKind::Key, 0x14e), Some(TouchCode::ThreeFingers));
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        // ABS_X, BTN_TOOL_QUADTAP, MSC_TIMESTAMP
        assert_eq!(TouchCode::decode(EventKind::Absolute, 0x00), None);
        assert_eq!(TouchCode::decode(EventKind::Key, 0x14f), None);
        assert_eq!(TouchCode::decode(EventKind::Other(4), 5), None);
        assert_eq!(TouchCode::decode(EventKind::Sync, 0), None);
    }

    #[test]
    fn test_kind_raw_round_trip() {
        for kind in [EventKind::Absolute, EventKind::Key, EventKind::Sync, EventKind::Other(4)] {
            assert_eq!(EventKind::from_raw(kind.raw()), kind);
        }
    }

    #[test]
    fn test_frame_slot_value_follows_cursor() {
        let mut frame = Frame::new();
        frame.push(TouchCode::Slot, 0);
        frame.push(TouchCode::PositionX, 10);
        frame.push(TouchCode::Slot, 1);
        frame.push(TouchCode::PositionX, 20);

        assert_eq!(frame.slot_value(0, TouchCode::PositionX), Some(10));
        assert_eq!(frame.slot_value(1, TouchCode::PositionX), Some(20));
        assert_eq!(frame.slot_value(2, TouchCode::PositionX), None);
    }
}
