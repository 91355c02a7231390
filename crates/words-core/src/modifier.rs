//! Score multipliers printed on board cells.

use serde::{Deserialize, Serialize};

/// A premium square.
///
/// Letter modifiers multiply the tile placed on them; word modifiers multiply
/// the whole word that covers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// Letter placed here counts twice
    #[serde(rename = "DL")]
    DoubleLetter,
    /// Letter placed here counts three times
    #[serde(rename = "TL")]
    TripleLetter,
    /// Word covering this cell counts twice
    #[serde(rename = "DW")]
    DoubleWord,
    /// Word covering this cell counts three times
    #[serde(rename = "TW")]
    TripleWord,
}

impl Modifier {
    /// All modifiers
    pub const ALL: [Modifier; 4] = [
        Modifier::DoubleLetter,
        Modifier::TripleLetter,
        Modifier::DoubleWord,
        Modifier::TripleWord,
    ];

    /// Short label used on boards and in score explanations
    pub fn code(&self) -> &'static str {
        match self {
            Modifier::DoubleLetter => "DL",
            Modifier::TripleLetter => "TL",
            Modifier::DoubleWord => "DW",
            Modifier::TripleWord => "TW",
        }
    }

    /// Apply to a single letter's score (word modifiers leave it alone)
    pub fn modify_letter_score(&self, score: u32) -> u32 {
        match self {
            Modifier::DoubleLetter => score.saturating_mul(2),
            Modifier::TripleLetter => score.saturating_mul(3),
            Modifier::DoubleWord | Modifier::TripleWord => score,
        }
    }

    /// Apply to a whole word's score (letter modifiers leave it alone)
    pub fn modify_word_score(&self, score: u32) -> u32 {
        match self {
            Modifier::DoubleWord => score.saturating_mul(2),
            Modifier::TripleWord => score.saturating_mul(3),
            Modifier::DoubleLetter | Modifier::TripleLetter => score,
        }
    }

    /// Whether this modifier applies to the word rather than one letter
    pub fn is_word_modifier(&self) -> bool {
        matches!(self, Modifier::DoubleWord | Modifier::TripleWord)
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
