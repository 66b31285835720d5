//! Device I/O errors
//!
//! Every variant is fatal: the runner stops and the process exits rather
//! than continue with a half-written synthetic contact.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::gesture::EmitError;

/// Errors from the physical source, the virtual touchpad or the pipeline setup
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Cannot open touch device {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot create virtual touchpad: {0}")]
    VirtualDevice(#[source] io::Error),

    #[error("Read from touch device failed: {0}")]
    Read(#[source] io::Error),

    #[error("Swipe emission failed: {0}")]
    Emit(#[from] EmitError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;
