//! uinput access health check

use std::fs::OpenOptions;
use std::path::PathBuf;

use crate::health::check::{CheckResult, SystemCheck};

const UINPUT_NODE: &str = "/dev/uinput";

/// The virtual touchpad needs write access to the uinput node
pub struct UinputCheck {
    path: PathBuf,
}

impl UinputCheck {
    pub fn new() -> Self {
        Self::at(UINPUT_NODE)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for UinputCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for UinputCheck {
    fn name(&self) -> &'static str {
        "uinput"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Checks the virtual touchpad can be created")
    }

    fn check(&self) -> CheckResult {
        if !self.path.exists() {
            return CheckResult::fail(format!("{} not found", self.path.display()))
                .with_details("  Load the module with `modprobe uinput`");
        }

        match OpenOptions::new().write(true).open(&self.path) {
            Ok(_) => CheckResult::pass(format!("{} writable", self.path.display())),
            Err(e) => CheckResult::fail(format!("{} not writable", self.path.display()))
                .with_details(format!("  {e}")),
        }
    }
}
