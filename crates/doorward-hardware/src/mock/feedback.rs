//! Mock display, LEDs, and buzzer.

use std::sync::{Arc, Mutex};

use doorward_core::{Indication, constants::DISPLAY_COLUMNS};

use super::lock_state;
use crate::{Result, traits::FeedbackDevice};

#[derive(Debug, Default)]
struct FeedbackLog {
    lines: (String, String),
    screens: Vec<(String, String)>,
    indications: Vec<Indication>,
}

/// Mock feedback device.
///
/// Lines longer than the display width are cut at
/// [`DISPLAY_COLUMNS`] characters, as a character LCD would.
#[derive(Debug)]
pub struct MockFeedback {
    log: Arc<Mutex<FeedbackLog>>,
}

impl MockFeedback {
    pub fn new() -> (Self, MockFeedbackHandle) {
        let log = Arc::new(Mutex::new(FeedbackLog::default()));
        (
            Self {
                log: Arc::clone(&log),
            },
            MockFeedbackHandle { log },
        )
    }
}

impl Default for MockFeedback {
    fn default() -> Self {
        Self::new().0
    }
}

fn fit_line(text: &str) -> String {
    text.chars().take(DISPLAY_COLUMNS).collect()
}

impl FeedbackDevice for MockFeedback {
    async fn show(&mut self, primary: &str, secondary: &str) -> Result<()> {
        let mut log = lock_state(&self.log);
        let lines = (fit_line(primary), fit_line(secondary));
        log.screens.push(lines.clone());
        log.lines = lines;
        Ok(())
    }

    async fn indicate(&mut self, indication: Indication) -> Result<()> {
        lock_state(&self.log).indications.push(indication);
        Ok(())
    }
}

/// Handle for inspecting a [`MockFeedback`].
#[derive(Debug, Clone)]
pub struct MockFeedbackHandle {
    log: Arc<Mutex<FeedbackLog>>,
}

impl MockFeedbackHandle {
    /// Lines currently on the display.
    pub fn lines(&self) -> (String, String) {
        lock_state(&self.log).lines.clone()
    }

    /// Every screen shown, oldest first.
    pub fn screens(&self) -> Vec<(String, String)> {
        lock_state(&self.log).screens.clone()
    }

    /// Every indication started, oldest first.
    pub fn indications(&self) -> Vec<Indication> {
        lock_state(&self.log).indications.clone()
    }

    /// Forget recorded history, keeping the current lines.
    pub fn clear(&self) {
        let mut log = lock_state(&self.log);
        log.screens.clear();
        log.indications.clear();
    }
}
