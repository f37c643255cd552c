//! Node configuration.
//!
//! Configuration is read from a TOML file whose path comes from the
//! `DOORWARD_CONFIG` environment variable. Every field has a factory default,
//! so an absent variable or an empty file yields a working local-only node.
//!
//! ```
//! use doorward_core::{ForcedEntryPolicy, NodeConfig};
//! use std::time::Duration;
//!
//! let config = NodeConfig::from_toml_str(r#"
//!     [controller]
//!     tick_period_ms = 250
//!
//!     [controller.forced_entry]
//!     policy = "bounded"
//!     duration_ms = 10000
//! "#).unwrap();
//!
//! assert_eq!(config.controller.tick_period(), Duration::from_millis(250));
//! assert_eq!(
//!     config.controller.forced_entry,
//!     ForcedEntryPolicy::Bounded { duration_ms: 10_000 }
//! );
//! assert!(config.remote.is_none());
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AWAIT_CREDENTIAL_TIMEOUT_MS, CONTROL_POLL_INTERVAL_MS, DEFAULT_ALLOWED_CREDENTIAL,
    DEFAULT_CONTROL_KEY, DEFAULT_EVENTS_ROOT, DEFAULT_TICK_PERIOD_MS, DEFAULT_UTC_OFFSET_HOURS,
    DOOR_DWELL_MS, ENV_CONFIG_PATH, RAMP_STEP_DEGREES, RAMP_STEP_INTERVAL_MS, READER_COOLDOWN_MS,
    SERVO_OPEN_ANGLE,
};
use crate::{AllowList, Error, Result};

fn default_tick_period_ms() -> u64 {
    DEFAULT_TICK_PERIOD_MS
}

fn default_await_timeout_ms() -> u64 {
    AWAIT_CREDENTIAL_TIMEOUT_MS
}

fn default_dwell_ms() -> u64 {
    DOOR_DWELL_MS
}

fn default_control_poll_interval_ms() -> u64 {
    CONTROL_POLL_INTERVAL_MS
}

fn default_reader_cooldown_ms() -> u64 {
    READER_COOLDOWN_MS
}

fn default_allowed_credentials() -> Vec<String> {
    vec![DEFAULT_ALLOWED_CREDENTIAL.to_string()]
}

fn default_step_degrees() -> u8 {
    RAMP_STEP_DEGREES
}

fn default_step_interval_ms() -> u64 {
    RAMP_STEP_INTERVAL_MS
}

fn default_open_angle() -> u8 {
    SERVO_OPEN_ANGLE
}

fn default_control_key() -> String {
    DEFAULT_CONTROL_KEY.to_string()
}

fn default_events_root() -> String {
    DEFAULT_EVENTS_ROOT.to_string()
}

fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level configuration for a door node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Remote store integration. `None` runs the node local-only.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NodeConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns `Error::ConfigParse` for malformed TOML and `Error::Config`
    /// when a value fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: NodeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, plus the errors of
    /// [`NodeConfig::from_toml_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Load from the path in `DOORWARD_CONFIG`, or defaults when unset.
    pub fn load_from_env() -> Result<Self> {
        match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first offending value.
    pub fn validate(&self) -> Result<()> {
        self.controller.validate()?;
        if let Some(remote) = &self.remote {
            remote.validate()?;
        }
        Ok(())
    }
}

/// What happens after a forced entry has been detected.
///
/// The two firmware builds in the field disagree, so the policy is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ForcedEntryPolicy {
    /// Alarm holds until an operator acknowledges it.
    Latched,
    /// Alarm clears on its own after `duration_ms` and the node returns to idle.
    Bounded { duration_ms: u64 },
}

impl Default for ForcedEntryPolicy {
    fn default() -> Self {
        Self::Latched
    }
}

impl ForcedEntryPolicy {
    /// Alarm window for the bounded policy.
    pub fn alarm_window(&self) -> Option<Duration> {
        match self {
            Self::Latched => None,
            Self::Bounded { duration_ms } => Some(Duration::from_millis(*duration_ms)),
        }
    }
}

/// Servo ramp geometry and pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampConfig {
    #[serde(default = "default_step_degrees")]
    pub step_degrees: u8,

    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,

    #[serde(default = "default_open_angle")]
    pub open_angle: u8,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            step_degrees: default_step_degrees(),
            step_interval_ms: default_step_interval_ms(),
            open_angle: default_open_angle(),
        }
    }
}

impl RampConfig {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    /// Number of steps from home to the open angle.
    pub fn steps(&self) -> u32 {
        u32::from(self.open_angle).div_ceil(u32::from(self.step_degrees.max(1)))
    }

    /// Time a full ramp takes.
    pub fn duration(&self) -> Duration {
        self.step_interval() * self.steps()
    }
}

/// Access controller timing and policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,

    #[serde(default = "default_await_timeout_ms")]
    pub await_timeout_ms: u64,

    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u64,

    #[serde(default = "default_control_poll_interval_ms")]
    pub control_poll_interval_ms: u64,

    #[serde(default = "default_reader_cooldown_ms")]
    pub reader_cooldown_ms: u64,

    #[serde(default = "default_allowed_credentials")]
    pub allowed_credentials: Vec<String>,

    #[serde(default)]
    pub forced_entry: ForcedEntryPolicy,

    #[serde(default)]
    pub ramp: RampConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: default_tick_period_ms(),
            await_timeout_ms: default_await_timeout_ms(),
            dwell_ms: default_dwell_ms(),
            control_poll_interval_ms: default_control_poll_interval_ms(),
            reader_cooldown_ms: default_reader_cooldown_ms(),
            allowed_credentials: default_allowed_credentials(),
            forced_entry: ForcedEntryPolicy::default(),
            ramp: RampConfig::default(),
        }
    }
}

impl ControllerConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn await_timeout(&self) -> Duration {
        Duration::from_millis(self.await_timeout_ms)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    pub fn control_poll_interval(&self) -> Duration {
        Duration::from_millis(self.control_poll_interval_ms)
    }

    pub fn reader_cooldown(&self) -> Duration {
        Duration::from_millis(self.reader_cooldown_ms)
    }

    /// Normalized allow-list.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredential` for a malformed entry.
    pub fn allow_list(&self) -> Result<AllowList> {
        AllowList::parse(&self.allowed_credentials)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first offending value.
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("tick_period_ms", self.tick_period_ms),
            ("await_timeout_ms", self.await_timeout_ms),
            ("dwell_ms", self.dwell_ms),
            ("control_poll_interval_ms", self.control_poll_interval_ms),
            ("reader_cooldown_ms", self.reader_cooldown_ms),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(Error::Config(format!("{name} must be greater than zero")));
            }
        }

        if let ForcedEntryPolicy::Bounded { duration_ms: 0 } = self.forced_entry {
            return Err(Error::Config(
                "forced_entry.duration_ms must be greater than zero".to_string(),
            ));
        }

        if self.allowed_credentials.is_empty() {
            return Err(Error::Config(
                "allowed_credentials must contain at least one entry".to_string(),
            ));
        }
        self.allow_list()
            .map_err(|e| Error::Config(format!("allowed_credentials: {e}")))?;

        let ramp = &self.ramp;
        if ramp.step_degrees == 0 || ramp.step_degrees > ramp.open_angle {
            return Err(Error::Config(format!(
                "ramp.step_degrees must be 1-{}, got {}",
                ramp.open_angle, ramp.step_degrees
            )));
        }
        if ramp.open_angle == 0 || ramp.open_angle > 180 {
            return Err(Error::Config(format!(
                "ramp.open_angle must be 1-180, got {}",
                ramp.open_angle
            )));
        }

        Ok(())
    }
}

/// Remote realtime store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub database_url: String,

    #[serde(default = "default_control_key")]
    pub control_key: String,

    #[serde(default = "default_events_root")]
    pub events_root: String,

    /// Offset of the synchronized clock used for event timestamps.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl RemoteConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            control_key: default_control_key(),
            events_root: default_events_root(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first offending value.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("remote.database_url is empty".to_string()));
        }
        if self.control_key.trim().is_empty() {
            return Err(Error::Config("remote.control_key is empty".to_string()));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(Error::Config(format!(
                "remote.utc_offset_hours must be -12..=14, got {}",
                self.utc_offset_hours
            )));
        }
        Ok(())
    }
}

/// Console log output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `DOORWARD_LOG` or `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
