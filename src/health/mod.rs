//! Startup health checks
//!
//! Verifies the preconditions of the daemon without running it: the
//! configuration parses and validates, the touchpad node is readable and
//! `/dev/uinput` is writable. Used by `triswipe health` and in CI.
//!
//! # Example
//!
//! ```no_run
//! use triswipe::health::{HealthCheckRunner, checks::*};
//!
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(SourceDeviceCheck::new("/dev/input/event8"))
//!     .add_check(UinputCheck::new())
//!     .run();
//!
//! std::process::exit(report.exit_code());
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckResult, CheckStatus, SystemCheck};
pub use reporter::{format_report, print_report};
pub use runner::{HealthCheckReport, HealthCheckRunner};

use crate::config::AppConfig;

/// Runs every check against `config`
pub fn run_all_checks(config: &AppConfig) -> HealthCheckReport {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::BuildInfoCheck::new())
        .add_check(checks::SystemInfoCheck::new())
        .add_check(checks::SourceDeviceCheck::new(&config.device.source))
        .add_check(checks::UinputCheck::new())
        .run()
}
