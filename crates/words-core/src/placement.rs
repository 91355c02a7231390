//! Placement outcomes and scoring.

use crate::modifier::Modifier;
use crate::point::{point_map, Point};
use crate::word::Word;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Letter value lookup
pub type LetterPoints = BTreeMap<char, u32>;

/// Everything a legal placement would change and earn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    /// Tiles taken from the rack, by cell; blank tiles are recorded as
    /// [`BLANK`](crate::word::BLANK)
    #[serde(with = "point_map")]
    pub letters_used: BTreeMap<Point, char>,
    /// The word as placed, annotated with every blank it covers
    pub direct_word: Word,
    /// Crossing words formed by the new tiles
    pub indirect_words: Vec<Word>,
    /// Premium squares under new tiles, by letter index in the direct word
    pub modifiers: BTreeMap<usize, Modifier>,
    /// Total points earned
    pub points: u32,
    /// How the points add up, e.g. `HE: (DW)(H=4+E=1) = 10`
    pub points_explanation: String,
}

impl PlacementResult {
    /// An unscored result for `direct_word` with nothing consumed yet
    pub fn new(direct_word: Word) -> Self {
        Self {
            letters_used: BTreeMap::new(),
            direct_word,
            indirect_words: Vec::new(),
            modifiers: BTreeMap::new(),
            points: 0,
            points_explanation: String::new(),
        }
    }

    /// Score the direct word (with modifiers) and every indirect word
    /// (without), filling in `points` and `points_explanation`.
    pub fn with_computed_points(mut self, letter_points: &LetterPoints) -> Self {
        let (mut total, explanation) =
            score_word(&self.direct_word, letter_points, &self.modifiers);
        let mut explanations = vec![explanation];

        for word in &self.indirect_words {
            let (score, explanation) = score_word(word, letter_points, &BTreeMap::new());
            total = total.saturating_add(score);
            explanations.push(explanation);
        }

        self.points = total;
        self.points_explanation = explanations.join(" + ");
        self
    }

    /// The tiles this placement takes from a rack
    pub fn tiles(&self) -> Vec<char> {
        self.letters_used.values().copied().collect()
    }
}

/// Score one word.
///
/// Blank tiles are worth nothing and ignore letter modifiers. Word modifiers
/// multiply the summed letters, once per modifier cell covered.
pub fn score_word(
    word: &Word,
    letter_points: &LetterPoints,
    modifiers: &BTreeMap<usize, Modifier>,
) -> (u32, String) {
    let mut score: u32 = 0;
    let mut terms = Vec::with_capacity(word.len());

    for (i, &letter) in word.letters.iter().enumerate() {
        if word.is_blank_at(i) {
            terms.push(format!("{}=0", crate::word::BLANK));
            continue;
        }

        let base = letter_points.get(&letter).copied().unwrap_or(0);
        let letter_score = match modifiers.get(&i) {
            Some(modifier) if !modifier.is_word_modifier() => {
                let modified = modifier.modify_letter_score(base);
                terms.push(format!("{}={}{}", letter, modifier, base));
                modified
            }
            _ => {
                terms.push(format!("{}={}", letter, base));
                base
            }
        };

        score = score.saturating_add(letter_score);
    }

    let mut word_modifiers = Vec::new();
    for modifier in modifiers.values().filter(|m| m.is_word_modifier()) {
        score = modifier.modify_word_score(score);
        word_modifiers.push(modifier.code());
    }

    let mut explanation = format!("{}: ", word);
    if word_modifiers.is_empty() {
        explanation.push_str(&terms.join("+"));
    } else {
        explanation.push_str(&format!("({})({})", word_modifiers.join("*"), terms.join("+")));
    }
    explanation.push_str(&format!(" = {}", score));

    (score, explanation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Direction;
    use pretty_assertions::assert_eq;

    fn points(entries: &[(char, u32)]) -> LetterPoints {
        entries.iter().copied().collect()
    }

    fn hello() -> Word {
        Word::new(Point::new(0, 0), Direction::Horizontal, "HELLO")
    }

    #[test]
    fn test_basic_word() {
        let table = points(&[('H', 4), ('E', 1), ('L', 1), ('O', 1)]);
        let (score, explanation) = score_word(&hello(), &table, &BTreeMap::new());
        assert_eq!(score, 8);
        assert_eq!(explanation, "HELLO: H=4+E=1+L=1+L=1+O=1 = 8");
    }

    #[test]
    fn test_triple_word_on_any_letter() {
        let table = points(&[('H', 4), ('E', 1), ('L', 1), ('O', 1)]);
        for index in 0..5 {
            let modifiers = BTreeMap::from([(index, Modifier::TripleWord)]);
            let (score, _) = score_word(&hello(), &table, &modifiers);
            assert_eq!(score, 24, "triple word at index {}", index);
        }
    }

    #[test]
    fn test_letter_modifier() {
        let table = points(&[('H', 4), ('E', 1), ('L', 1), ('O', 1)]);
        let modifiers = BTreeMap::from([(0, Modifier::TripleLetter)]);
        let (score, explanation) = score_word(&hello(), &table, &modifiers);
        assert_eq!(score, 16);
        assert!(explanation.contains("H=TL4"));
    }

    #[test]
    fn test_two_word_modifiers_stack() {
        let table = points(&[('H', 4), ('E', 1), ('L', 1), ('O', 1)]);
        let modifiers = BTreeMap::from([(0, Modifier::DoubleWord), (4, Modifier::TripleWord)]);
        let (score, explanation) = score_word(&hello(), &table, &modifiers);
        assert_eq!(score, 48);
        assert!(explanation.starts_with("HELLO: (DW*TW)"));
    }

    #[test]
    fn test_blank_scores_zero_and_skips_letter_modifier() {
        let table = points(&[('H', 10), ('E', 1), ('L', 1), ('O', 1)]);
        let word = hello().with_blanks([Point::new(0, 0)]);
        let modifiers = BTreeMap::from([(0, Modifier::TripleLetter), (1, Modifier::DoubleLetter)]);

        let (score, _) = score_word(&word, &table, &modifiers);
        assert_eq!(score, 5);
    }

    #[test]
    fn test_indirect_words_ignore_modifiers() {
        let table = points(&[
            ('H', 10),
            ('E', 1),
            ('L', 1),
            ('O', 1),
            ('W', 1),
            ('R', 1),
            ('D', 1),
        ]);

        let mut result = PlacementResult::new(hello().with_blanks([Point::new(0, 0)]));
        result.indirect_words = vec![Word::new(Point::new(0, 0), Direction::Vertical, "WORLD")
            .with_blanks([Point::new(0, 0)])];
        result.modifiers = BTreeMap::from([(1, Modifier::TripleWord)]);
        let result = result.with_computed_points(&table);

        // (0+1+1+1+1)*3 + (0+1+1+1+1)
        assert_eq!(result.points, 16);
        assert!(result.points_explanation.contains(" + "));
    }

    #[test]
    fn test_huge_letter_values_saturate() {
        let table = points(&[('H', u32::MAX), ('I', u32::MAX)]);
        let word = Word::new(Point::new(0, 0), Direction::Horizontal, "HI");
        let modifiers = BTreeMap::from([(0, Modifier::TripleLetter), (1, Modifier::TripleWord)]);

        let (score, _) = score_word(&word, &table, &modifiers);
        assert_eq!(score, u32::MAX);

        let mut result = PlacementResult::new(word.clone());
        result.indirect_words = vec![word];
        assert_eq!(result.with_computed_points(&table).points, u32::MAX);
    }
}
