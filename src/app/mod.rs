//! Device plumbing around the gesture core
//!
//! Opens the physical touchpad, creates the virtual one and runs the
//! blocking read loop.

pub mod device;
mod error;
mod runner;

pub use error::{DeviceError, DeviceResult};
pub use runner::App;
