//! Fixed timing, geometry, and wire constants for the door node.
//!
//! The values here are the factory defaults. Timing constants are exposed as
//! milliseconds so they can seed [`ControllerConfig`](crate::ControllerConfig)
//! defaults directly; use the `Duration` helpers in the config module at
//! runtime.
//!
//! # Timers
//!
//! | Timer | Constant | Default |
//! |-------|----------|---------|
//! | `awaitingStart` | [`AWAIT_CREDENTIAL_TIMEOUT_MS`] | 10 s |
//! | `doorOpenStart` | [`DOOR_DWELL_MS`] | 5 s |
//! | `lastControlPoll` | [`CONTROL_POLL_INTERVAL_MS`] | 2 s |
//!
//! ```
//! use doorward_core::constants::*;
//! use std::time::Duration;
//!
//! let timeout = Duration::from_millis(AWAIT_CREDENTIAL_TIMEOUT_MS);
//! assert_eq!(timeout.as_secs(), 10);
//! ```

// ============================================================================
// Access Controller Timers
// ============================================================================

/// How long the controller waits for a credential after motion is detected.
pub const AWAIT_CREDENTIAL_TIMEOUT_MS: u64 = 10_000;

/// How long the door stays unlocked after the open ramp completes.
pub const DOOR_DWELL_MS: u64 = 5_000;

/// Interval between reads of the remote control key.
pub const CONTROL_POLL_INTERVAL_MS: u64 = 2_000;

/// Default poll loop period.
///
/// Observed firmware configurations range from 100 ms to 1000 ms; the
/// shorter period keeps the servo ramp and alarm patterns smooth.
pub const DEFAULT_TICK_PERIOD_MS: u64 = 100;

/// Reader disable window applied from the third consecutive failed attempt.
pub const READER_COOLDOWN_MS: u64 = 30_000;

/// Alarm window used by the bounded forced-entry policy.
pub const FORCED_ENTRY_ALARM_MS: u64 = 10_000;

// ============================================================================
// Door Actuator Geometry
// ============================================================================

/// Servo angle when the latch is fully retracted.
pub const SERVO_OPEN_ANGLE: u8 = 90;

/// Servo angle when the latch is home (closed).
pub const SERVO_HOME_ANGLE: u8 = 0;

/// Degrees moved per ramp step.
pub const RAMP_STEP_DEGREES: u8 = 5;

/// Pacing between ramp steps.
pub const RAMP_STEP_INTERVAL_MS: u64 = 20;

// ============================================================================
// Credentials
// ============================================================================

/// Minimum UID length in bytes (4-byte single-size UID).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum UID length in bytes (10-byte triple-size UID).
pub const MAX_UID_LENGTH: usize = 10;

/// The factory allow-listed credential.
pub const DEFAULT_ALLOWED_CREDENTIAL: &str = "E3 87 26 29";

// ============================================================================
// Local Display
// ============================================================================

/// Number of text lines on the local display.
pub const DISPLAY_LINES: usize = 2;

/// Characters per display line.
pub const DISPLAY_COLUMNS: usize = 16;

// ============================================================================
// Remote Store
// ============================================================================

/// Key holding the remote door command.
pub const DEFAULT_CONTROL_KEY: &str = "control/doorCommand";

/// Root path under which event records are pushed.
pub const DEFAULT_EVENTS_ROOT: &str = "events";

/// Wall-clock format attached to every event record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default UTC offset of the synchronized clock (GMT+7).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;

// ============================================================================
// Tone Frequencies (Hz)
// ============================================================================

pub const NOTE_C4: u16 = 262;
pub const NOTE_D4: u16 = 294;
pub const NOTE_E4: u16 = 330;
pub const NOTE_A4: u16 = 440;
pub const NOTE_C5: u16 = 523;
pub const NOTE_C6: u16 = 1047;

// ============================================================================
// Environment
// ============================================================================

/// Environment variable naming the configuration file.
pub const ENV_CONFIG_PATH: &str = "DOORWARD_CONFIG";

/// Environment variable overriding the log filter.
pub const ENV_LOG_FILTER: &str = "DOORWARD_LOG";
