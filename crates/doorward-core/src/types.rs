use crate::{
    Result,
    constants::{
        MAX_UID_LENGTH, MIN_UID_LENGTH, NOTE_A4, NOTE_C4, NOTE_C5, NOTE_C6, NOTE_D4, NOTE_E4,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use subtle::ConstantTimeEq;

/// Normalized proximity credential identifier.
///
/// The canonical form is uppercase hex-byte pairs separated by single
/// spaces, e.g. `E3 87 26 29`. Normalization is idempotent, so a value that
/// is already canonical passes through unchanged.
///
/// # Security
/// Comparison runs in constant time over the canonical bytes.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialId(String);

impl CredentialId {
    /// Build an identifier from raw UID bytes as read from the card.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredential` if the UID is not 4-10 bytes long.
    pub fn from_uid_bytes(uid: &[u8]) -> Result<Self> {
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&uid.len()) {
            return Err(Error::InvalidCredential(format!(
                "UID must be {MIN_UID_LENGTH}-{MAX_UID_LENGTH} bytes, got {}",
                uid.len()
            )));
        }

        let rendered = uid
            .iter()
            .map(|byte| format!("{byte:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(CredentialId(rendered))
    }

    /// Normalize a textual identifier.
    ///
    /// Accepts upper or lower case hex with space, `:` or `-` separators, or
    /// no separators at all.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredential` if the text contains non-hex
    /// characters, an odd number of digits, or a UID outside 4-10 bytes.
    pub fn normalize(text: &str) -> Result<Self> {
        let digits: String = text
            .chars()
            .filter(|c| !matches!(c, ' ' | ':' | '-'))
            .collect();

        if digits.is_empty() {
            return Err(Error::InvalidCredential("empty identifier".to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidCredential(format!(
                "identifier contains non-hex characters: {text}"
            )));
        }
        if digits.len() % 2 != 0 {
            return Err(Error::InvalidCredential(format!(
                "identifier has an odd number of hex digits: {text}"
            )));
        }

        let bytes = digits
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                // Pairs are ASCII hex digits, checked above
                let pair = std::str::from_utf8(pair).unwrap_or("00");
                u8::from_str_radix(pair, 16)
                    .map_err(|e| Error::InvalidCredential(format!("{pair}: {e}")))
            })
            .collect::<Result<Vec<u8>>>()?;

        Self::from_uid_bytes(&bytes)
    }

    /// Get the canonical identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of UID bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.0.split(' ').count()
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CredentialId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CredentialId::normalize(s)
    }
}

impl TryFrom<String> for CredentialId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        CredentialId::normalize(&value)
    }
}

impl From<CredentialId> for String {
    fn from(value: CredentialId) -> Self {
        value.0
    }
}

impl PartialEq for CredentialId {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for CredentialId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Set of credentials that unlock the door.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(Vec<CredentialId>);

impl AllowList {
    pub fn new(entries: Vec<CredentialId>) -> Self {
        Self(entries)
    }

    /// Parse and normalize every entry.
    ///
    /// # Errors
    /// Returns the first normalization failure.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        entries
            .iter()
            .map(|entry| CredentialId::normalize(entry.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Exact match against the normalized form.
    ///
    /// Every entry is compared so the check does not short-circuit on the
    /// position of a match.
    pub fn contains(&self, credential: &CredentialId) -> bool {
        self.0
            .iter()
            .fold(false, |found, entry| (entry == credential) | found)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Physical door contact as reported by the position sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorPosition {
    Open,
    Closed,
}

impl DoorPosition {
    /// Map an active-HIGH contact read to a position.
    pub fn from_contact(high: bool) -> Self {
        if high { Self::Open } else { Self::Closed }
    }
}

/// Lock state commanded by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockCommand {
    Locked,
    Unlocked,
}

/// Commanded versus sensed door state.
///
/// `sensed` may diverge from `commanded`; an open door while `commanded` is
/// [`LockCommand::Locked`] is the forced-entry signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorState {
    pub commanded: LockCommand,
    pub sensed: DoorPosition,
}

impl Default for DoorState {
    fn default() -> Self {
        Self {
            commanded: LockCommand::Locked,
            sensed: DoorPosition::Closed,
        }
    }
}

/// Command read from the remote control key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorCommand {
    /// `"open"`: unlock through the same actuator path as a grant.
    Open,
    /// `"close"`: relock an open door.
    Close,
    /// `"reset"`: acknowledge a latched forced-entry alarm.
    Reset,
}

impl DoorCommand {
    /// Parse the stored string value. Unknown values carry no command.
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "open" => Some(Self::Open),
            "close" => Some(Self::Close),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Reset => "reset",
        }
    }
}

/// Named audit channels for remote event logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventChannel {
    ValidAccess,
    InvalidAccess,
    DoorStatus,
    FailedAttempts,
    SuspiciousActivity,
    ForcedEntry,
}

impl EventChannel {
    pub const ALL: [EventChannel; 6] = [
        Self::ValidAccess,
        Self::InvalidAccess,
        Self::DoorStatus,
        Self::FailedAttempts,
        Self::SuspiciousActivity,
        Self::ForcedEntry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidAccess => "validAccess",
            Self::InvalidAccess => "invalidAccess",
            Self::DoorStatus => "doorStatus",
            Self::FailedAttempts => "failedAttempts",
            Self::SuspiciousActivity => "suspiciousActivity",
            Self::ForcedEntry => "forcedEntry",
        }
    }
}

impl fmt::Display for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicator LEDs on the front panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Led {
    Red,
    Green,
}

/// How an indication drives the LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCue {
    /// Leave LEDs as they are.
    Unchanged,
    /// Turn the LED on for the pattern duration, or until cleared when the
    /// pattern has no duration.
    Steady(Led),
    /// Turn the LED on while a tone sounds and off during rests.
    Flash(Led),
    /// Turn the LED off.
    Release(Led),
    /// Every LED off.
    AllOff,
}

/// One note of a tone pattern. A zero frequency is a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStep {
    pub frequency_hz: u16,
    pub duration_ms: u32,
}

const fn note(frequency_hz: u16, duration_ms: u32) -> ToneStep {
    ToneStep {
        frequency_hz,
        duration_ms,
    }
}

const fn rest(duration_ms: u32) -> ToneStep {
    note(0, duration_ms)
}

static DOOR_OPENED_STEPS: [ToneStep; 6] = [
    note(NOTE_C4, 200),
    rest(50),
    note(NOTE_D4, 200),
    rest(50),
    note(NOTE_E4, 200),
    rest(50),
];

static DOOR_CLOSED_STEPS: [ToneStep; 6] = [
    note(NOTE_E4, 200),
    rest(50),
    note(NOTE_D4, 200),
    rest(50),
    note(NOTE_C4, 200),
    rest(50),
];

static DENIED_STEPS: [ToneStep; 4] = [note(NOTE_C5, 200), rest(200), note(NOTE_C5, 200), rest(100)];

static ATTEMPT_ALARM_STEPS: [ToneStep; 10] = [
    note(NOTE_A4, 500),
    rest(500),
    note(NOTE_A4, 500),
    rest(500),
    note(NOTE_A4, 500),
    rest(500),
    note(NOTE_A4, 500),
    rest(500),
    note(NOTE_A4, 500),
    rest(500),
];

static VIBRATION_ALARM_STEPS: [ToneStep; 10] = [
    note(NOTE_C6, 200),
    rest(200),
    note(NOTE_C6, 200),
    rest(200),
    note(NOTE_C6, 200),
    rest(200),
    note(NOTE_C6, 200),
    rest(200),
    note(NOTE_C6, 200),
    rest(200),
];

static FORCED_ENTRY_STEPS: [ToneStep; 2] = [note(NOTE_C5, 500), rest(500)];

/// Rendering recipe for an indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicationPattern {
    pub steps: &'static [ToneStep],
    pub led: LedCue,
    /// Extra time the LED cue is held after the last step.
    pub hold_ms: u32,
    /// Loop the steps until another indication replaces this one.
    pub repeat: bool,
}

/// Local feedback cue emitted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indication {
    /// Green LED on for the duration of a grant.
    Granted,
    /// Rising three-note chime.
    DoorOpened,
    /// Falling three-note chime, green LED off.
    DoorClosed,
    /// Red LED, two high beeps, red held for two seconds.
    Denied,
    /// Five 500 ms alarm tones after repeated failures.
    AttemptAlarm,
    /// Five short flashes and beeps on tamper.
    VibrationAlarm,
    /// Continuous alarm until cleared.
    ForcedEntryAlarm,
    /// Silence and every LED off.
    AllClear,
}

impl Indication {
    pub fn pattern(&self) -> IndicationPattern {
        match self {
            Self::Granted => IndicationPattern {
                steps: &[],
                led: LedCue::Steady(Led::Green),
                hold_ms: 0,
                repeat: false,
            },
            Self::DoorOpened => IndicationPattern {
                steps: &DOOR_OPENED_STEPS,
                led: LedCue::Unchanged,
                hold_ms: 0,
                repeat: false,
            },
            Self::DoorClosed => IndicationPattern {
                steps: &DOOR_CLOSED_STEPS,
                led: LedCue::Release(Led::Green),
                hold_ms: 0,
                repeat: false,
            },
            Self::Denied => IndicationPattern {
                steps: &DENIED_STEPS,
                led: LedCue::Steady(Led::Red),
                hold_ms: 2_000,
                repeat: false,
            },
            Self::AttemptAlarm => IndicationPattern {
                steps: &ATTEMPT_ALARM_STEPS,
                led: LedCue::Unchanged,
                hold_ms: 0,
                repeat: false,
            },
            Self::VibrationAlarm => IndicationPattern {
                steps: &VIBRATION_ALARM_STEPS,
                led: LedCue::Flash(Led::Red),
                hold_ms: 0,
                repeat: false,
            },
            Self::ForcedEntryAlarm => IndicationPattern {
                steps: &FORCED_ENTRY_STEPS,
                led: LedCue::Flash(Led::Red),
                hold_ms: 0,
                repeat: true,
            },
            Self::AllClear => IndicationPattern {
                steps: &[],
                led: LedCue::AllOff,
                hold_ms: 0,
                repeat: false,
            },
        }
    }

    /// Total length of a finite pattern, `None` for repeating ones.
    pub fn duration(&self) -> Option<Duration> {
        let pattern = self.pattern();
        if pattern.repeat {
            return None;
        }
        let steps_ms: u64 = pattern.steps.iter().map(|s| u64::from(s.duration_ms)).sum();
        Some(Duration::from_millis(steps_ms + u64::from(pattern.hold_ms)))
    }
}
