//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.
//! The gesture thresholds and emitter cadence default to the named constants
//! below; profile files and environment variables may override them at
//! startup, after which they stay fixed for the lifetime of the process.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Minimum accumulated horizontal motion for a horizontal swipe
pub const SWIPE_THRESHOLD_X: i32 = 80;
/// Minimum accumulated vertical motion for a vertical swipe
pub const SWIPE_THRESHOLD_Y: i32 = 40;
/// Maximum off-axis accumulated motion for a pure horizontal/vertical swipe
pub const DEAD_ZONE: i32 = 15;
/// Per-slot deltas with a magnitude at or below this are jitter
pub const NOISE_THRESHOLD: i32 = 5;
/// Minimum interval between two emitted swipes
pub const COOLDOWN: Duration = Duration::from_millis(300);
/// How long after a three-finger assertion recognition stays open
pub const GRACE_PERIOD: Duration = Duration::from_millis(400);

/// Largest coordinate the virtual touchpad accepts
pub const POSITION_MAX: i32 = 32767;
/// Largest pressure the virtual touchpad accepts
pub const PRESSURE_MAX: i32 = 255;
/// Largest tracking identifier the virtual touchpad accepts
pub const TRACKING_ID_MAX: i32 = 65535;
/// Number of synthetic contacts in an emitted swipe
pub const SYNTHETIC_CONTACTS: i32 = 3;

/// Environment variable prefix (e.g. `TRISWIPE_GESTURE__DEAD_ZONE=20`)
const ENV_PREFIX: &str = "TRISWIPE";

/// Physical touch device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// evdev node of the physical touchpad
    pub source: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("/dev/input/event8"),
        }
    }
}

/// Identity of the virtual touchpad created through uinput
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualDeviceConfig {
    pub name: String,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
    /// Delay after creation so the compositor can pick the device up
    pub settle_ms: u64,
}

impl Default for VirtualDeviceConfig {
    fn default() -> Self {
        Self {
            name: "Virtual Touchpad".to_string(),
            vendor: 0x1234,
            product: 0x5678,
            version: 3,
            settle_ms: 200,
        }
    }
}

impl VirtualDeviceConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Swipe recognition thresholds, in device coordinate units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub swipe_threshold_x: i32,
    pub swipe_threshold_y: i32,
    pub dead_zone: i32,
    pub noise_threshold: i32,
    pub cooldown_ms: u64,
    pub grace_period_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_x: SWIPE_THRESHOLD_X,
            swipe_threshold_y: SWIPE_THRESHOLD_Y,
            dead_zone: DEAD_ZONE,
            noise_threshold: NOISE_THRESHOLD,
            cooldown_ms: COOLDOWN.as_millis() as u64,
            grace_period_ms: GRACE_PERIOD.as_millis() as u64,
        }
    }
}

impl GestureConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.swipe_threshold_x <= 0 || self.swipe_threshold_y <= 0 {
            return Err(ConfigError::Message(format!(
                "gesture: swipe thresholds must be positive (x={}, y={})",
                self.swipe_threshold_x, self.swipe_threshold_y
            )));
        }
        if self.dead_zone < 0 || self.noise_threshold < 0 {
            return Err(ConfigError::Message(format!(
                "gesture: dead_zone and noise_threshold must not be negative ({}, {})",
                self.dead_zone, self.noise_threshold
            )));
        }
        Ok(())
    }
}

/// Shape and cadence of the synthetic three-finger swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Coordinate of slot 0 on both axes in the setup frame
    pub base: i32,
    /// Per-slot offset added on both axes
    pub slot_spacing: i32,
    /// Distance travelled per ramp frame
    pub step_size: i32,
    /// Number of ramp frames
    pub steps: u32,
    pub pressure: i32,
    /// Tracking id of slot 0; slots 1 and 2 use the next ids
    pub tracking_id_base: i32,
    /// Pause after each ramp frame
    pub frame_interval_ms: u64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            base: 5000,
            slot_spacing: 100,
            step_size: 50,
            steps: 10,
            pressure: 30,
            tracking_id_base: 1000,
            frame_interval_ms: 10,
        }
    }
}

impl EmitterConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Full travel of a contact over the ramp
    fn travel(&self) -> i64 {
        (i64::from(self.step_size) * i64::from(self.steps)).abs()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::Message(
                "emitter: steps must be at least 1".to_string(),
            ));
        }

        // Every coordinate of the burst, in either direction, must stay on the pad
        let lowest = i64::from(self.base) - self.travel();
        let highest = i64::from(self.base)
            + i64::from(self.slot_spacing) * i64::from(SYNTHETIC_CONTACTS - 1)
            + self.travel();
        if lowest < 0 || highest > i64::from(POSITION_MAX) {
            return Err(ConfigError::Message(format!(
                "emitter: swipe would leave the 0..={POSITION_MAX} position range ({lowest}..={highest})"
            )));
        }

        if !(0..=PRESSURE_MAX).contains(&self.pressure) {
            return Err(ConfigError::Message(format!(
                "emitter: pressure {} outside 0..={PRESSURE_MAX}",
                self.pressure
            )));
        }

        let last_id = i64::from(self.tracking_id_base) + i64::from(SYNTHETIC_CONTACTS - 1);
        if self.tracking_id_base < 0 || last_id > i64::from(TRACKING_ID_MAX) {
            return Err(ConfigError::Message(format!(
                "emitter: tracking ids {}..={last_id} outside 0..={TRACKING_ID_MAX}",
                self.tracking_id_base
            )));
        }

        Ok(())
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub virtual_device: VirtualDeviceConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub emitter: EmitterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: "release".to_string(),
            device: DeviceConfig::default(),
            virtual_device: VirtualDeviceConfig::default(),
            gesture: GestureConfig::default(),
            emitter: EmitterConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix TRISWIPE_ (e.g., TRISWIPE_DEVICE__SOURCE)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        match Self::find_config_dir() {
            Some(dir) => Self::load_from_dir(&dir, profile),
            None => Self::build(
                Config::builder()
                    .add_source(File::with_name(&format!("config/{profile}")).required(false)),
                profile,
            ),
        }
    }

    /// Loads a profile from an explicit config directory
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let profile_path = dir.join(profile);
        Self::build(
            Config::builder().add_source(File::from(profile_path.as_path()).required(false)),
            profile,
        )
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        profile: &str,
    ) -> Result<Self, ConfigError> {
        // Use __ as separator for nested fields (e.g., TRISWIPE_GESTURE__DEAD_ZONE)
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override("profile", profile)?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the TRISWIPE_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("TRISWIPE_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Rejects settings that would make the synthetic swipe violate the
    /// virtual touchpad's declared ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture.validate()?;
        self.emitter.validate()
    }
}
