//! The playing surface.
//!
//! This module contains:
//! - The sparse letter grid and the history of placed words
//! - Placement legality checks and cross-word discovery
//! - Bounding-box tracking and viewport reads for clients

use crate::config::Config;
use crate::error::GameError;
use crate::modifier::Modifier;
use crate::placement::PlacementResult;
use crate::point::{point_map, Direction, Point, ORIGIN};
use crate::word::{Word, BLANK};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Rectangle covering every placed letter and the origin.
///
/// Minimums are inclusive, maximums exclusive, so an empty board is all zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Grow to cover `word`
    fn include(&mut self, word: &Word) {
        let len = word.len() as i32;
        self.min_x = self.min_x.min(word.start.x);
        self.min_y = self.min_y.min(word.start.y);

        match word.direction {
            Direction::Horizontal => {
                self.max_x = self.max_x.max(word.start.x + len);
                self.max_y = self.max_y.max(word.start.y + 1);
            }
            Direction::Vertical => {
                self.max_x = self.max_x.max(word.start.x + 1);
                self.max_y = self.max_y.max(word.start.y + len);
            }
        }
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }
}

/// One cell of a board view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub point: Point,
    /// Letter placed here, if any
    pub letter: Option<char>,
    /// Whether the letter is a blank tile
    pub blank: bool,
    /// Premium square, if any (shown even under a letter)
    pub modifier: Option<Modifier>,
}

/// The complete game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Placed letters by cell
    #[serde(with = "point_map")]
    grid: HashMap<Point, char>,
    /// Cells holding blank tiles
    blanks: BTreeSet<Point>,
    /// Every word placed, in play order
    words: Vec<Word>,
    bounds: Bounds,
    config: Config,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Board {
    /// Create an empty board scored with `config`
    pub fn new(config: Config) -> Self {
        Self {
            grid: HashMap::new(),
            blanks: BTreeSet::new(),
            words: Vec::new(),
            bounds: Bounds::default(),
            config,
        }
    }

    // ==================== Query Methods ====================

    /// Letter at `point`
    pub fn get_letter(&self, point: Point) -> Option<char> {
        self.grid.get(&point).copied()
    }

    /// Premium square at `point` (whether or not it is covered)
    pub fn get_modifier(&self, point: Point) -> Option<Modifier> {
        self.config.modifiers.get(point.x, point.y)
    }

    /// Whether the letter at `point` is a blank tile
    pub fn is_blank(&self, point: Point) -> bool {
        self.blanks.contains(&point)
    }

    /// Every word placed so far, in play order
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether no letters have been placed
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Number of tiles on the board
    pub fn tile_count(&self) -> usize {
        self.grid.len()
    }

    /// Cells between `min` and `max` (inclusive) that hold a letter or a
    /// modifier, row by row.
    pub fn view(&self, min: Point, max: Point) -> Vec<Cell> {
        let mut cells = Vec::new();

        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let point = Point::new(x, y);
                let letter = self.get_letter(point);
                let modifier = self.get_modifier(point);

                if letter.is_none() && modifier.is_none() {
                    continue;
                }

                cells.push(Cell {
                    point,
                    letter,
                    blank: self.is_blank(point),
                    modifier,
                });
            }
        }

        cells
    }

    // ==================== Placement ====================

    /// Check whether `word` could be placed, without changing the board.
    ///
    /// The result's direct word is canonical: cells already on the board carry
    /// the board's blank markers, new cells carry the candidate's.
    pub fn try_place(&self, word: &Word) -> Result<PlacementResult, GameError> {
        if !word.in_bounds() {
            return Err(GameError::OutOfBounds);
        }

        let mut needs_connection = true;
        if self.is_empty() {
            if !word.covers(ORIGIN) {
                return Err(GameError::FirstWordNotCentered);
            }
            needs_connection = false;
        }

        let mut direct = word.clone();
        let mut letters_used = BTreeMap::new();
        let mut modifiers = BTreeMap::new();
        let mut indirect_words = Vec::new();

        for (i, (point, letter)) in word.cells().enumerate() {
            if let Some(current) = self.get_letter(point) {
                if current != letter {
                    return Err(GameError::WordConflict {
                        point,
                        wanted: letter,
                        got: current,
                    });
                }

                // Tiles already down keep whatever they were
                if self.is_blank(point) {
                    direct.blanks.insert(point);
                } else {
                    direct.blanks.remove(&point);
                }

                needs_connection = false;
                continue;
            }

            if let Some(modifier) = self.get_modifier(point) {
                modifiers.insert(i, modifier);
            }

            let is_blank = word.blanks.contains(&point);
            letters_used.insert(point, if is_blank { BLANK } else { letter });

            if let Some(indirect) =
                self.word_formed_by_new_letter(point, letter, is_blank, word.direction.other())
            {
                indirect_words.push(indirect);
                needs_connection = false;
            }
        }

        if needs_connection {
            return Err(GameError::WordNotConnected);
        }

        if letters_used.is_empty() {
            return Err(GameError::Unchanged);
        }

        let (before, after) = word.bounding_cells();
        if self.grid.contains_key(&before) || self.grid.contains_key(&after) {
            return Err(GameError::IncompleteWord);
        }

        let mut result = PlacementResult::new(direct);
        result.letters_used = letters_used;
        result.modifiers = modifiers;
        result.indirect_words = indirect_words;

        Ok(result.with_computed_points(&self.config.letter_points))
    }

    /// Check and commit `word`.
    ///
    /// The canonical direct word is what gets written to the board and the
    /// history, so replaying the history restores blank tiles too.
    pub fn place(&mut self, word: &Word) -> Result<PlacementResult, GameError> {
        let result = self.try_place(word)?;
        let placed = &result.direct_word;

        for (point, letter) in placed.cells() {
            self.grid.insert(point, letter);
        }
        self.blanks.extend(placed.blanks.iter().copied());
        self.bounds.include(placed);
        self.words.push(placed.clone());

        Ok(result)
    }

    /// Take back the most recent word by replaying every earlier one onto a
    /// cleared board.
    pub fn remove_last_word(&mut self) -> Result<(), GameError> {
        if self.words.pop().is_none() {
            return Err(GameError::NothingToUndo);
        }

        let words = std::mem::take(&mut self.words);
        self.grid.clear();
        self.blanks.clear();
        self.bounds = Bounds::default();

        for word in &words {
            self.place(word)?;
        }

        Ok(())
    }

    /// The perpendicular run through a newly placed letter, if it is longer
    /// than the letter itself.
    fn word_formed_by_new_letter(
        &self,
        point: Point,
        letter: char,
        is_blank: bool,
        direction: Direction,
    ) -> Option<Word> {
        let mut start = point;
        while self.grid.contains_key(&start.step(direction, -1)) {
            start = start.step(direction, -1);
        }

        let mut end = point;
        while self.grid.contains_key(&end.step(direction, 1)) {
            end = end.step(direction, 1);
        }

        if start == end {
            return None;
        }

        let mut letters = Vec::new();
        let mut blanks = BTreeSet::new();
        let mut cursor = start;
        loop {
            letters.push(self.get_letter(cursor).unwrap_or(letter));
            if self.is_blank(cursor) || (cursor == point && is_blank) {
                blanks.insert(cursor);
            }

            if cursor == end {
                break;
            }
            cursor = cursor.step(direction, 1);
        }

        Some(Word {
            start,
            direction,
            letters,
            blanks,
        })
    }
}
