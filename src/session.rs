use chrono::{DateTime, Local};

use crate::scoring::Score;
use crate::sentences::Difficulty;

/// Mutable state of the test currently on screen. Owned by [`crate::app::App`].
#[derive(Debug, Clone)]
pub struct SessionState {
    pub difficulty: Difficulty,
    pub sentence: String,
    pub input: String,
    pub entry_enabled: bool,
    /// Wall-clock time of the first keystroke
    pub started_at: Option<DateTime<Local>>,
    pub result: Option<Score>,
}

impl SessionState {
    pub fn new(difficulty: Difficulty, sentence: impl Into<String>) -> Self {
        Self {
            difficulty,
            sentence: sentence.into(),
            input: String::new(),
            entry_enabled: true,
            started_at: None,
            result: None,
        }
    }

    pub fn typed_text(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        if self.entry_enabled {
            self.input.push(c);
        }
    }

    pub fn push_newline(&mut self) {
        self.push_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.entry_enabled {
            self.input.pop();
        }
    }

    /// Back to a fresh, editable test. Difficulty and sentence are kept.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.entry_enabled = true;
        self.started_at = None;
        self.result = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Difficulty::default(), "")
    }
}
