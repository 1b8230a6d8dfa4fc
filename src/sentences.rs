use clap::ValueEnum;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

/// Which sentence pool a test draws its prompt from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Next difficulty in selector order, wrapping around
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

const EASY: &[&str] = &["The sun is bright.", "I love my dog.", "It is a good day."];

const MEDIUM: &[&str] = &[
    "Python is a great programming language.",
    "Typing fast needs consistent effort.",
    "AI is changing the world rapidly.",
];

const HARD: &[&str] = &[
    "Accuracy is more important than speed when learning to type.",
    "OpenAI's large language models are very powerful and flexible.",
    "Keyboard efficiency can dramatically impact coding productivity.",
];

/// The fixed sentence pool for a difficulty
pub fn pool(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Medium => MEDIUM,
        Difficulty::Hard => HARD,
    }
}

/// Pick one sentence uniformly at random from the difficulty's pool
pub fn choose<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> &'static str {
    // pools are static and non-empty
    pool(difficulty).choose(rng).copied().unwrap_or(EASY[0])
}
