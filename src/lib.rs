//! triswipe
//!
//! Recognises three-finger swipes on a multitouch touchpad and replays each
//! one as a clean synthetic three-contact swipe on a virtual touchpad, for
//! desktops whose gesture handling misses the hardware's own reports.

/// Device plumbing - evdev source, uinput sink and the read loop
pub mod app;

/// Build-time information (git SHA, branch, timestamp, etc.)
pub mod build_info;

/// Profile-based configuration
pub mod config;

/// Swipe recognition and synthesis, independent of any device
pub mod gesture;

/// Startup health checks
pub mod health;
