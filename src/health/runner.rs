//! Runs checks and tallies the outcome

use std::time::Instant;

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// Results of a health check run
#[derive(Debug)]
pub struct HealthCheckReport {
    /// Check name and result, in run order
    pub results: Vec<(String, CheckResult)>,
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl HealthCheckReport {
    /// No check failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Process exit code: 0 = all pass, 1 = any fail, 2 = warnings only
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }

    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|(check, _)| check == name)
            .map(|(_, result)| result)
    }
}

/// Builder collecting the checks to run
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs every check in insertion order, timing each
    pub fn run(self) -> HealthCheckReport {
        let mut report = HealthCheckReport {
            results: Vec::with_capacity(self.checks.len()),
            total: 0,
            passed: 0,
            warned: 0,
            failed: 0,
        };

        for check in self.checks {
            let start = Instant::now();
            let result = check.check();
            let result = result.with_duration(start.elapsed());
            tracing::debug!(check = check.name(), status = result.status.label(), "health check");

            match result.status {
                CheckStatus::Pass => report.passed += 1,
                CheckStatus::Warn => report.warned += 1,
                CheckStatus::Fail => report.failed += 1,
            }
            report.results.push((check.name().to_string(), result));
        }

        report.total = report.results.len();
        report
    }
}
