//! Words: letters laid out from an anchor point along one axis.

use crate::point::{Direction, Point, MAX_COORDINATE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The rack tile that can stand in for any letter
pub const BLANK: char = '_';

/// A candidate or placed word.
///
/// Words are values: every `with_*` method returns a new word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Cell of the first letter
    pub start: Point,
    /// Axis the word is read along
    pub direction: Direction,
    /// Letters in reading order
    pub letters: Vec<char>,
    /// Cells holding blank tiles (scored as zero, displayed as the letter)
    #[serde(default)]
    pub blanks: BTreeSet<Point>,
}

impl Word {
    /// Create a word with no blanks
    pub fn new(start: Point, direction: Direction, value: &str) -> Self {
        Self {
            start,
            direction,
            letters: value.chars().collect(),
            blanks: BTreeSet::new(),
        }
    }

    /// The same word with the given cells marked as blank tiles
    pub fn with_blanks(&self, points: impl IntoIterator<Item = Point>) -> Self {
        let mut word = self.clone();
        word.blanks.extend(points);
        word
    }

    /// Number of letters
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Cell of the letter at `index` (may be outside the word)
    pub fn point_at(&self, index: i32) -> Point {
        self.start.step(self.direction, index)
    }

    /// Cell and letter at `index`, if the index is inside the word
    pub fn index(&self, index: usize) -> Option<(Point, char)> {
        let letter = *self.letters.get(index)?;
        Some((self.point_at(index as i32), letter))
    }

    /// Cells and letters in reading order
    pub fn cells(&self) -> impl Iterator<Item = (Point, char)> + '_ {
        self.letters
            .iter()
            .enumerate()
            .map(|(i, &letter)| (self.point_at(i as i32), letter))
    }

    /// Letter at `point`, if the word covers it
    pub fn get(&self, point: Point) -> Option<char> {
        let dx = i64::from(point.x) - i64::from(self.start.x);
        let dy = i64::from(point.y) - i64::from(self.start.y);
        let (along, across) = match self.direction {
            Direction::Horizontal => (dx, dy),
            Direction::Vertical => (dy, dx),
        };

        if across != 0 || along < 0 {
            return None;
        }

        self.letters.get(usize::try_from(along).ok()?).copied()
    }

    /// Whether every cell of the word, and the cell on each side of it, lies
    /// within [`MAX_COORDINATE`] of the origin. Cell arithmetic on a word is
    /// only done once this holds.
    pub fn in_bounds(&self) -> bool {
        if self.len() > MAX_COORDINATE as usize || !self.start.in_bounds() {
            return false;
        }
        self.point_at(-1).in_bounds() && self.point_at(self.len() as i32).in_bounds()
    }

    /// Whether the word covers `point`
    pub fn covers(&self, point: Point) -> bool {
        self.get(point).is_some()
    }

    /// Whether the letter at `index` is a blank tile
    pub fn is_blank_at(&self, index: usize) -> bool {
        self.blanks.contains(&self.point_at(index as i32))
    }

    /// The letters as a plain string, blanks shown as their letter
    pub fn value(&self) -> String {
        self.letters.iter().collect()
    }

    /// First cell past each end: `(before, after)`
    pub fn bounding_cells(&self) -> (Point, Point) {
        (self.point_at(-1), self.point_at(self.len() as i32))
    }
}

impl fmt::Display for Word {
    /// Blank tiles print as `_`, followed by the literal letters in
    /// parentheses when any are present, e.g. `_ELLO (HELLO)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            if self.is_blank_at(i) {
                write!(f, "{}", BLANK)?;
            } else {
                write!(f, "{}", self.letters[i])?;
            }
        }

        if !self.blanks.is_empty() {
            write!(f, " ({})", self.value())?;
        }

        Ok(())
    }
}
