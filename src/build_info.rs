//! Build-time information
//!
//! Metadata captured by `build.rs` through vergen: build timestamp, cargo
//! configuration, compiler version and the git state of the checkout.

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.85.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Full git commit SHA
pub const GIT_SHA: &str = env!("VERGEN_GIT_SHA");

/// Git branch the binary was built from
pub const GIT_BRANCH: &str = env!("VERGEN_GIT_BRANCH");

/// Git commit timestamp
pub const GIT_COMMIT_TIMESTAMP: &str = env!("VERGEN_GIT_COMMIT_TIMESTAMP");

const GIT_DIRTY: &str = env!("VERGEN_GIT_DIRTY");

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// First 7 characters of the commit SHA
pub fn git_sha_short() -> &'static str {
    GIT_SHA.get(..7).unwrap_or(GIT_SHA)
}

/// Whether the working tree had uncommitted changes at build time
pub fn is_git_dirty() -> bool {
    GIT_DIRTY == "true"
}

/// Returns a formatted build version string
///
/// Format: `{pkg_version}+{sha}-{target_triple}-opt{opt_level}`
pub fn version_string() -> String {
    format!(
        "{}+{}-{}-opt{}",
        PKG_VERSION,
        git_sha_short(),
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL
    )
}

/// Returns a detailed, multi-line build info string
pub fn detailed_info() -> String {
    format!(
        "triswipe {}\nGit: {}@{}{}\nBuilt: {}\nTarget: {}\nOptimization: {}\nRustc: {} ({})",
        PKG_VERSION,
        GIT_BRANCH,
        git_sha_short(),
        if is_git_dirty() { " (dirty)" } else { "" },
        BUILD_TIMESTAMP,
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL,
        RUSTC_SEMVER,
        RUSTC_CHANNEL
    )
}
