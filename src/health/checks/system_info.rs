//! Host system health check

use sysinfo::System;

use crate::health::check::{CheckResult, SystemCheck};

/// evdev and uinput are Linux interfaces; anything else only warns so
/// `health` still runs in CI on other hosts
#[derive(Default)]
pub struct SystemInfoCheck;

impl SystemInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl SystemCheck for SystemInfoCheck {
    fn name(&self) -> &'static str {
        "System Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Reports the host OS and kernel")
    }

    fn check(&self) -> CheckResult {
        let mut sys = System::new();
        sys.refresh_memory();

        let os_name = System::name().unwrap_or_else(|| "Unknown".to_string());
        let os_version = System::os_version().unwrap_or_else(|| "Unknown".to_string());
        let kernel = System::kernel_version().unwrap_or_else(|| "Unknown".to_string());

        let mut details = vec![
            format!("  OS: {os_name} {os_version}"),
            format!("  Kernel: {kernel}"),
            format!(
                "  Memory: {:.1} GB total",
                sys.total_memory() as f64 / 1_073_741_824.0
            ),
        ];
        if let Some(hostname) = System::host_name() {
            details.push(format!("  Hostname: {hostname}"));
        }
        let details = details.join("\n");

        if cfg!(target_os = "linux") {
            CheckResult::pass(format!("Linux {kernel}")).with_details(details)
        } else {
            CheckResult::warn("Not Linux: evdev and uinput are unavailable").with_details(details)
        }
    }
}
