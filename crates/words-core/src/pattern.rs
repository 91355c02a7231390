//! Declarative layouts for premium squares.
//!
//! A [`PatternGroup`] is a small rule interpreter: an ordered list of
//! [`Pattern`]s, each pairing a value with geometric [`Shape`]s. Looking up a
//! cell walks the patterns in order and returns the value of the first one
//! with a matching shape.
//!
//! Shapes are placed relative to the fixed board origin, not to the letters on
//! the board, so the same group can score placements and paint any viewport.
//! The origin is the start square and is never modified.

use serde::{Deserialize, Serialize};

/// A set of cells described geometrically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Exactly one cell
    Explicit { x: i32, y: i32 },

    /// Cells on both diagonals through `(x, y)`.
    ///
    /// Counting diagonal steps away from the centre (offset by `start_at`),
    /// the run repeats every `skip_count + match_count` steps and the first
    /// `match_count` positions of each cycle match.
    BothDiagonals {
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
        #[serde(default)]
        start_at: u32,
        #[serde(default)]
        skip_count: u32,
        match_count: u32,
    },

    /// Corners of a repeating grid of `width` x `height` cells anchored at
    /// `(x, y)`; neighbouring cells share their border, so matches repeat
    /// every `width - 1` columns and `height - 1` rows.
    Grid {
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
        width: u32,
        height: u32,
    },
}

impl Shape {
    /// Whether the shape covers `(x, y)`. The origin is never covered.
    pub fn matches(&self, x: i32, y: i32) -> bool {
        if (x, y) == (0, 0) {
            return false;
        }

        match *self {
            Shape::Explicit { x: px, y: py } => px == x && py == y,
            Shape::BothDiagonals {
                x: cx,
                y: cy,
                start_at,
                skip_count,
                match_count,
            } => {
                let (dx, dy) = (offset(x, cx), offset(y, cy));
                if dx.abs() != dy.abs() {
                    return false;
                }

                let cycle = u64::from(skip_count) + u64::from(match_count);
                if cycle == 0 {
                    return false;
                }

                (dx.unsigned_abs() + u64::from(start_at)) % cycle < u64::from(match_count)
            }
            Shape::Grid {
                x: gx,
                y: gy,
                width,
                height,
            } => {
                if width <= 1 || height <= 1 {
                    return false;
                }

                let (dx, dy) = (offset(x, gx), offset(y, gy));
                dx % (i64::from(width) - 1) == 0 && dy % (i64::from(height) - 1) == 0
            }
        }
    }
}

/// Signed distance from `from` to `to`, wide enough for any pair of `i32`s
fn offset(to: i32, from: i32) -> i64 {
    i64::from(to) - i64::from(from)
}

/// A value painted onto every cell covered by any of its shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern<T> {
    pub value: T,
    pub shapes: Vec<Shape>,
}

impl<T: Copy> Pattern<T> {
    pub fn new(value: T, shapes: Vec<Shape>) -> Self {
        Self { value, shapes }
    }

    /// The pattern's value if any shape covers `(x, y)`
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.shapes
            .iter()
            .any(|shape| shape.matches(x, y))
            .then_some(self.value)
    }
}

/// Ordered patterns; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternGroup<T>(pub Vec<Pattern<T>>);

impl<T> Default for PatternGroup<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: Copy> PatternGroup<T> {
    pub fn new(patterns: Vec<Pattern<T>>) -> Self {
        Self(patterns)
    }

    /// Value of the first pattern covering `(x, y)`
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.0.iter().find_map(|pattern| pattern.get(x, y))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
