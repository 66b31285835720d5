use std::env;
use std::fs;
use std::path::Path;
use vergen::{BuildBuilder, CargoBuilder, Emitter, RustcBuilder};
use vergen_gitcl::{Emitter as GitEmitter, GitclBuilder};

/// Profiles shipped next to the binary, per cargo profile
const RELEASE_PROFILES: &[&str] = &["release"];
const DEBUG_PROFILES: &[&str] = &["debug", "release"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Emit build metadata at build time
    let build = BuildBuilder::default()
        .build_timestamp(true) // Build timestamp
        .build()?;

    let cargo = CargoBuilder::default()
        .opt_level(true) // Optimization level
        .target_triple(true) // Target triple (e.g., x86_64-unknown-linux-gnu)
        .build()?;

    let rustc = RustcBuilder::default()
        .semver(true) // Rust compiler version
        .channel(true) // Rust channel (stable, beta, nightly)
        .build()?;

    // Git metadata for `triswipe version` and the health report
    let gitcl = GitclBuilder::default()
        .sha(true) // Commit SHA
        .branch(true) // Branch name
        .commit_timestamp(true) // Commit timestamp
        .dirty(true) // Uncommitted changes at build time
        .build()?;

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&rustc)?
        .emit()?;

    // Outside a git checkout vergen-gitcl emits defaults instead of failing
    GitEmitter::default().add_instructions(&gitcl)?.emit()?;

    copy_profiles()?;

    Ok(())
}

/// Copies `config/<profile>.toml` into `target/<cargo profile>/config`
/// so the binary finds its profiles without a working-directory dependency.
fn copy_profiles() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var("OUT_DIR")?;
    let cargo_profile = env::var("PROFILE")?;

    // OUT_DIR is like: target/debug/build/triswipe-xxx/out
    let target_dir = Path::new(&out_dir)
        .ancestors()
        .nth(3)
        .ok_or("Could not determine target directory")?;

    let config_out_dir = target_dir.join("config");
    fs::create_dir_all(&config_out_dir)?;

    let profiles = if cargo_profile == "release" {
        RELEASE_PROFILES
    } else {
        DEBUG_PROFILES
    };

    for profile in profiles {
        let file_name = format!("{profile}.toml");
        let source = Path::new("config").join(&file_name);
        if source.exists() {
            fs::copy(&source, config_out_dir.join(&file_name))?;
            println!("cargo:rerun-if-changed={}", source.display());
        }
    }

    Ok(())
}
