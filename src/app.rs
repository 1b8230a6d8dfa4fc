use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Instant;

use crate::countdown::{Countdown, CountdownEvent};
use crate::scores::{HighScores, ScoreRecord, ScoreStore};
use crate::scoring::{self, Score};
use crate::session::SessionState;
use crate::sentences::{self, Difficulty};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// The single controller: owns the session, its countdown and the score log.
pub struct App {
    pub session: SessionState,
    pub countdown: Countdown,
    pub high_scores: HighScores,
    store: Box<dyn ScoreStore>,
    rng: StdRng,
}

impl App {
    pub fn new(difficulty: Difficulty, countdown_secs: u64, store: Box<dyn ScoreStore>) -> Self {
        Self::with_rng(difficulty, countdown_secs, store, StdRng::from_entropy())
    }

    pub fn with_rng(
        difficulty: Difficulty,
        countdown_secs: u64,
        store: Box<dyn ScoreStore>,
        mut rng: StdRng,
    ) -> Self {
        let sentence = sentences::choose(difficulty, &mut rng);
        let mut app = Self {
            session: SessionState::new(difficulty, sentence),
            countdown: Countdown::new(countdown_secs),
            high_scores: HighScores::default(),
            store,
            rng,
        };
        app.reload_high_scores();
        app
    }

    pub fn difficulty(&self) -> Difficulty {
        self.session.difficulty
    }

    pub fn sentence(&self) -> &str {
        &self.session.sentence
    }

    pub fn result(&self) -> Option<Score> {
        self.session.result
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn is_finished(&self) -> bool {
        self.session.result.is_some()
    }

    /// Switch sentence pool. Like picking a radio button, this only swaps the
    /// prompt; a running countdown keeps going.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.session.difficulty = difficulty;
        self.select_sentence();
    }

    pub fn next_difficulty(&mut self) {
        self.set_difficulty(self.session.difficulty.next());
    }

    pub fn prev_difficulty(&mut self) {
        self.set_difficulty(self.session.difficulty.prev());
    }

    fn select_sentence(&mut self) {
        self.session.sentence = sentences::choose(self.session.difficulty, &mut self.rng).to_string();
    }

    /// Any keystroke into the text box starts the countdown
    fn on_keystroke(&mut self, now: Instant) -> bool {
        if !self.session.entry_enabled {
            return false;
        }
        if self.countdown.start(now) {
            self.session.started_at = Some(Local::now());
            log::debug!(
                "countdown started ({}s, {})",
                self.countdown.total_secs(),
                self.session.difficulty
            );
        }
        true
    }

    pub fn on_char(&mut self, c: char, now: Instant) {
        if self.on_keystroke(now) {
            self.session.push_char(c);
        }
    }

    pub fn on_enter(&mut self, now: Instant) {
        if self.on_keystroke(now) {
            self.session.push_newline();
        }
    }

    pub fn on_backspace(&mut self, now: Instant) {
        if self.on_keystroke(now) {
            self.session.backspace();
        }
    }

    /// Fire every countdown tick due by `now`. Returns true if anything changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(event) = self.countdown.poll(now) {
            changed = true;
            if event == CountdownEvent::Expired {
                self.finish();
                break;
            }
        }
        changed
    }

    /// "Done": score what has been typed so far. Ignored once a result exists.
    pub fn submit(&mut self) -> Option<Score> {
        if self.is_finished() {
            return None;
        }
        self.countdown.halt();
        Some(self.finish())
    }

    fn finish(&mut self) -> Score {
        let score = scoring::score(
            self.session.typed_text(),
            self.countdown.elapsed_secs(),
            &self.session.sentence,
        );
        self.session.result = Some(score);
        self.session.entry_enabled = false;
        log::info!(
            "{} test finished: {} WPM, {}% accuracy in {}s",
            self.session.difficulty,
            score.wpm,
            score.accuracy,
            self.countdown.elapsed_secs()
        );

        let record = ScoreRecord::new(self.session.difficulty, score);
        if let Err(e) = self.store.append(&record) {
            log::error!("saving score failed: {:#}", e);
        }
        self.reload_high_scores();
        score
    }

    /// "Try Again": full countdown, empty editable input, fresh sentence
    pub fn reset(&mut self) {
        self.countdown.reset();
        self.session.clear_input();
        self.select_sentence();
    }

    /// Recompute best WPM per difficulty from the log. On failure the
    /// previous values are kept.
    pub fn reload_high_scores(&mut self) {
        match self.store.load_high_scores() {
            Ok(scores) => self.high_scores = scores,
            Err(e) => log::error!("reading scores failed: {:#}", e),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('c') if ctrl => return KeyOutcome::Quit,
            KeyCode::Char('d') if ctrl => {
                self.submit();
            }
            KeyCode::Char('r') if ctrl => self.reset(),
            KeyCode::Left | KeyCode::BackTab => self.prev_difficulty(),
            KeyCode::Right | KeyCode::Tab => self.next_difficulty(),
            KeyCode::Enter => self.on_enter(now),
            KeyCode::Backspace => self.on_backspace(now),
            KeyCode::Char(c) if !ctrl => self.on_char(c, now),
            _ => {}
        }
        KeyOutcome::Continue
    }
}
