//! Physical touchpad health check

use std::path::PathBuf;

use crate::app::device;
use crate::health::check::{CheckResult, SystemCheck};

/// Opens the configured touchpad and inspects its capabilities
pub struct SourceDeviceCheck {
    path: PathBuf,
}

impl SourceDeviceCheck {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SystemCheck for SourceDeviceCheck {
    fn name(&self) -> &'static str {
        "Source Device"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Checks the touchpad node is readable and reports multitouch slots")
    }

    fn check(&self) -> CheckResult {
        let source = match evdev::Device::open(&self.path) {
            Ok(source) => source,
            Err(e) => {
                return CheckResult::fail(format!("Cannot open {}", self.path.display()))
                    .with_details(format!(
                        "  {e}\n  Is the user in the 'input' group, and is the path right?"
                    ));
            }
        };

        let name = source.name().unwrap_or("unknown").to_string();
        let missing = device::missing_capabilities(&source);
        if missing.is_empty() {
            CheckResult::pass(format!("{name} supports multitouch slots"))
                .with_details(format!("  Path: {}", self.path.display()))
        } else {
            CheckResult::warn(format!("{name} lacks {} capability(ies)", missing.len()))
                .with_details(format!("  Missing: {}", missing.join(", ")))
        }
    }
}
