//! Build metadata health check

use crate::build_info;
use crate::health::check::{CheckResult, SystemCheck};

/// Reports the build the daemon was compiled from
#[derive(Default)]
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn check(&self) -> CheckResult {
        let details = [
            format!("  Version: {}", build_info::version_string()),
            format!(
                "  Git: {}@{} (committed {})",
                build_info::GIT_BRANCH,
                build_info::git_sha_short(),
                build_info::GIT_COMMIT_TIMESTAMP
            ),
            format!("  Built: {}", build_info::BUILD_TIMESTAMP),
            format!(
                "  Rustc: {} ({}), opt-level {}, target {}",
                build_info::RUSTC_SEMVER,
                build_info::RUSTC_CHANNEL,
                build_info::CARGO_OPT_LEVEL,
                build_info::CARGO_TARGET_TRIPLE
            ),
        ]
        .join("\n");

        if build_info::is_git_dirty() {
            CheckResult::pass("Built from a modified checkout").with_details(details)
        } else {
            CheckResult::pass("Build metadata accessible").with_details(details)
        }
    }
}
