//! What the two-line display should be showing.

use std::borrow::Cow;

/// One display screen.
///
/// The controller decides which screen is current on every tick and only
/// emits a display write when that changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Idle,
    Prompt,
    Granted,
    Denied,
    Closing,
    /// Reader disabled, with whole seconds left.
    Cooldown { seconds: u64 },
    Vibration,
    ForcedEntry,
}

impl Screen {
    /// Primary and secondary line text.
    pub fn lines(&self) -> (Cow<'static, str>, &'static str) {
        match self {
            Screen::Idle => (Cow::Borrowed("Automatic Door"), "Waiting..."),
            Screen::Prompt => (Cow::Borrowed("Please scan"), "member card"),
            Screen::Granted => (Cow::Borrowed("Access granted"), ""),
            Screen::Denied => (Cow::Borrowed("Access denied!"), "Invalid card"),
            Screen::Closing => (Cow::Borrowed("Closing door"), ""),
            Screen::Cooldown { seconds } => {
                (Cow::Owned(format!("Reader off: {seconds}s")), "Please wait...")
            }
            Screen::Vibration => (Cow::Borrowed("ALARM!"), "Vibration detected"),
            Screen::ForcedEntry => (Cow::Borrowed("ALARM!"), "Door forced open"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorward_core::constants::DISPLAY_COLUMNS;

    #[test]
    fn test_cooldown_counts_seconds() {
        let (primary, secondary) = Screen::Cooldown { seconds: 27 }.lines();
        assert_eq!(primary, "Reader off: 27s");
        assert_eq!(secondary, "Please wait...");
    }

    #[test]
    fn test_primary_lines_fit_display() {
        let screens = [
            Screen::Idle,
            Screen::Prompt,
            Screen::Granted,
            Screen::Denied,
            Screen::Closing,
            Screen::Cooldown { seconds: 30 },
            Screen::Vibration,
            Screen::ForcedEntry,
        ];
        for screen in screens {
            assert!(screen.lines().0.chars().count() <= DISPLAY_COLUMNS, "{screen:?}");
        }
    }
}
