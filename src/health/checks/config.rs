//! Configuration health check

use crate::config::AppConfig;
use crate::health::check::{CheckResult, SystemCheck};

/// Loads and validates every known profile
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    pub fn new() -> Self {
        Self {
            profiles: vec!["debug", "release"],
        }
    }

    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Loads each profile and validates gesture and emitter settings")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();
        let mut failed = 0;

        for profile in &self.profiles {
            match AppConfig::load(profile) {
                Ok(config) => {
                    let gesture = &config.gesture;
                    details.push(format!(
                        "  ✓ Profile '{}': source {}, thresholds {}x{}, dead zone {}, {} ramp steps",
                        profile,
                        config.device.source.display(),
                        gesture.swipe_threshold_x,
                        gesture.swipe_threshold_y,
                        gesture.dead_zone,
                        config.emitter.steps,
                    ));
                }
                Err(e) => {
                    details.push(format!("  ✗ Profile '{profile}': {e}"));
                    failed += 1;
                }
            }
        }

        let mut from_env_ok = true;
        match AppConfig::load_from_env() {
            Ok(config) => details.push(format!(
                "  ✓ Environment: profile '{}' selected",
                config.profile
            )),
            Err(e) => {
                details.push(format!("  ⚠ Environment: {e}"));
                from_env_ok = false;
            }
        }

        let details = details.join("\n");
        if failed > 0 {
            CheckResult::fail(format!("{failed} profile(s) invalid")).with_details(details)
        } else if !from_env_ok {
            CheckResult::warn("Profiles valid, environment overrides rejected")
                .with_details(details)
        } else {
            CheckResult::pass(format!("{} profiles validated", self.profiles.len()))
                .with_details(details)
        }
    }
}
