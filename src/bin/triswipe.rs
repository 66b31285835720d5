use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triswipe::app::App;
use triswipe::build_info;
use triswipe::config::AppConfig;
use triswipe::health;

/// Replays three-finger touchpad swipes on a virtual touchpad
#[derive(Debug, Parser)]
#[command(name = "triswipe", version = build_info::PKG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Watch the touchpad and emit swipes (the default)
    Run {
        /// Config profile (defaults to $TRISWIPE_PROFILE, then "release")
        #[arg(short, long)]
        profile: Option<String>,
        /// Touchpad event node, overriding the configured one
        #[arg(short, long)]
        device: Option<PathBuf>,
        /// Log synthetic frames instead of writing them to uinput
        #[arg(long)]
        dry_run: bool,
    },
    /// Check configuration, device access and uinput permissions
    Health {
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Print build information
    Version,
}

fn load_config(profile: Option<&str>) -> AppConfig {
    let loaded = match profile {
        Some(profile) => AppConfig::load(profile),
        None => AppConfig::load_from_env(),
    };
    loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    })
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triswipe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let command = Cli::parse().command.unwrap_or(Command::Run {
        profile: None,
        device: None,
        dry_run: false,
    });

    match command {
        Command::Run {
            profile,
            device,
            dry_run,
        } => {
            let mut config = load_config(profile.as_deref());
            if let Some(device) = device {
                config.device.source = device;
            }

            let source = config.device.source.clone();
            let mut app = App::new(config, dry_run)
                .with_context(|| format!("Failed to start on {}", source.display()))?;
            match app.run().context("Swipe loop stopped")? {}
        }
        Command::Health { profile } => {
            let config = load_config(profile.as_deref());
            let report = health::run_all_checks(&config);
            health::print_report(&report);
            std::process::exit(report.exit_code());
        }
        Command::Version => {
            println!("{}", build_info::detailed_info());
            Ok(())
        }
    }
}
