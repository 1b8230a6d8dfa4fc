use serde::{Deserialize, Serialize};

/// Result of a completed test, truncated to whole numbers for display and storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub wpm: u32,
    pub accuracy: u32,
}

/// Number of whitespace separated words in `text`
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Words typed per minute over `elapsed_secs`. Zero when no time has elapsed.
pub fn words_per_minute(typed: &str, elapsed_secs: u64) -> f64 {
    if elapsed_secs == 0 {
        return 0.0;
    }
    (word_count(typed) as f64 / elapsed_secs as f64) * 60.0
}

/// Percentage of reference words reproduced at the same position.
///
/// Only the first `min(typed, reference)` positions are compared, so extra
/// trailing words are ignored and missing words count as wrong.
pub fn accuracy(typed: &str, reference: &str) -> f64 {
    let reference_words: Vec<&str> = reference.split_whitespace().collect();
    if reference_words.is_empty() {
        return 0.0;
    }

    let correct = typed
        .split_whitespace()
        .zip(reference_words.iter())
        .filter(|(got, want)| got == *want)
        .count();

    (correct as f64 / reference_words.len() as f64) * 100.0
}

pub fn score(typed: &str, elapsed_secs: u64, reference: &str) -> Score {
    Score {
        wpm: words_per_minute(typed, elapsed_secs) as u32,
        accuracy: accuracy(typed, reference) as u32,
    }
}
