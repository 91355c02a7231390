//! Player state: rack and turn history.

use crate::placement::PlacementResult;
use crate::point::Point;
use crate::word::{Word, BLANK};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Player identifier
pub type PlayerId = Uuid;

/// Whether a player is still taking part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Active,
    /// Left or disconnected; keeps their seat and score
    Inactive,
}

/// One accepted play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Round the play was made in
    pub round: u32,
    pub result: PlacementResult,
    /// Tiles dealt from the pool afterwards
    pub drawn: Vec<char>,
}

/// A player in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Rack, in the order tiles were dealt; blanks are `_`
    pub letters: Vec<char>,
    /// Accepted plays, oldest first
    pub turns: Vec<Turn>,
    pub status: PlayerStatus,
}

impl Player {
    /// Create a new player with an empty rack
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            letters: Vec::new(),
            turns: Vec::new(),
            status: PlayerStatus::Active,
        }
    }

    /// Total points across every recorded turn
    pub fn score(&self) -> u32 {
        self.turns
            .iter()
            .fold(0, |total: u32, turn| total.saturating_add(turn.result.points))
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Tiles in the rack, counted by letter
    fn rack_counts(&self) -> BTreeMap<char, usize> {
        let mut counts = BTreeMap::new();
        for &letter in &self.letters {
            *counts.entry(letter).or_insert(0) += 1;
        }
        counts
    }

    /// Whether the rack holds every tile in `letters` (no blank substitution)
    pub fn has_letters(&self, letters: &[char]) -> bool {
        let mut counts = self.rack_counts();
        letters.iter().all(|&letter| take_tile(&mut counts, letter))
    }

    /// Work out which new cells of `word` must be covered by blank tiles.
    ///
    /// `letters_used` maps each new cell to the tile it needs (already `_`
    /// where the word asks for a blank). Letters are matched in word order and
    /// a blank is spent on the first letter the rack cannot cover. Returns the
    /// extra blank cells, or `None` if the rack cannot cover the word at all.
    pub fn blanks_needed(
        &self,
        word: &Word,
        letters_used: &BTreeMap<Point, char>,
    ) -> Option<BTreeSet<Point>> {
        let mut counts = self.rack_counts();
        let mut blanks = BTreeSet::new();

        for (point, _) in word.cells() {
            let Some(&tile) = letters_used.get(&point) else {
                continue;
            };

            if take_tile(&mut counts, tile) {
                continue;
            }

            if tile == BLANK || !take_tile(&mut counts, BLANK) {
                return None;
            }
            blanks.insert(point);
        }

        Some(blanks)
    }

    /// Add tiles to the rack
    pub fn give_letters(&mut self, letters: &[char]) {
        self.letters.extend_from_slice(letters);
    }

    /// Remove one rack tile per entry in `letters`, keeping the order of the
    /// rest. Tiles the rack does not hold are ignored.
    pub fn take_letters(&mut self, letters: &[char]) {
        for letter in letters {
            if let Some(pos) = self.letters.iter().position(|l| l == letter) {
                self.letters.remove(pos);
            }
        }
    }

    pub fn record_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Forget the most recent turn
    pub fn pop_turn(&mut self) -> Option<Turn> {
        self.turns.pop()
    }
}

/// Spend one `tile` from `counts`, if there is one
fn take_tile(counts: &mut BTreeMap<char, usize>, tile: char) -> bool {
    match counts.get_mut(&tile) {
        Some(count) if *count > 0 => {
            *count -= 1;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Direction;

    fn player_with(rack: &str) -> Player {
        let mut player = Player::new("alice");
        player.give_letters(&rack.chars().collect::<Vec<_>>());
        player
    }

    fn used(word: &Word) -> BTreeMap<Point, char> {
        word.cells().collect()
    }

    #[test]
    fn test_has_letters() {
        let player = player_with("HELLO");
        assert!(player.has_letters(&['L', 'L', 'H']));
        assert!(!player.has_letters(&['L', 'L', 'L']));
        assert!(!player.has_letters(&['Z']));
    }

    #[test]
    fn test_take_letters_keeps_order() {
        let mut player = player_with("HELLO");
        player.take_letters(&['L', 'H']);
        assert_eq!(player.letters, vec!['E', 'L', 'O']);

        player.take_letters(&['Q']);
        assert_eq!(player.letters, vec!['E', 'L', 'O']);
    }

    #[test]
    fn test_no_blanks_needed() {
        let player = player_with("HELLO");
        let word = Word::new(Point::new(0, 0), Direction::Horizontal, "HELLO");
        assert_eq!(player.blanks_needed(&word, &used(&word)), Some(BTreeSet::new()));
    }

    #[test]
    fn test_blanks_cover_missing_letters_in_order() {
        let player = player_with("HEL_O_");
        let word = Word::new(Point::new(0, 0), Direction::Horizontal, "HELLOO");
        assert_eq!(
            player.blanks_needed(&word, &used(&word)),
            Some(BTreeSet::from([Point::new(3, 0), Point::new(5, 0)]))
        );
    }

    #[test]
    fn test_not_enough_blanks() {
        let player = player_with("HEL_");
        let word = Word::new(Point::new(0, 0), Direction::Horizontal, "HELLO");
        assert_eq!(player.blanks_needed(&word, &used(&word)), None);
    }

    #[test]
    fn test_requested_blank_needs_blank_tile() {
        let player = player_with("HI");
        let word = Word::new(Point::new(0, 0), Direction::Horizontal, "HI");
        let mut letters = used(&word);
        letters.insert(Point::new(1, 0), BLANK);
        assert_eq!(player.blanks_needed(&word, &letters), None);
    }

    #[test]
    fn test_score_sums_turns() {
        let mut player = Player::new("bob");
        assert_eq!(player.score(), 0);

        for points in [5, 12] {
            let mut result =
                PlacementResult::new(Word::new(Point::new(0, 0), Direction::Horizontal, "HI"));
            result.points = points;
            player.record_turn(Turn {
                round: 1,
                result,
                drawn: vec![],
            });
        }
        assert_eq!(player.score(), 17);

        player.pop_turn();
        assert_eq!(player.score(), 5);
    }
}
