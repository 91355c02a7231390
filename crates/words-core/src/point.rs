//! Board coordinates and axes.
//!
//! The board is an unbounded plane of square cells addressed by integer
//! `(x, y)` pairs:
//! - `x` increases going east (right)
//! - `y` increases going south (down)
//! - `(0, 0)` is the start square every first word must cover

use serde::{Deserialize, Serialize};

/// The start square at the centre of the board
pub const ORIGIN: Point = Point::new(0, 0);

/// Furthest a playable cell may lie from the origin along either axis
pub const MAX_COORDINATE: i32 = 1 << 20;

/// A cell on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Point {
    /// Column (increases going east)
    pub x: i32,
    /// Row (increases going south)
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point shifted by `(dx, dy)`
    pub const fn offset(&self, (dx, dy): (i32, i32)) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// The point `steps` cells along `direction` (negative steps go backwards)
    pub fn step(&self, direction: Direction, steps: i32) -> Point {
        self.offset(direction.vector(steps))
    }

    /// Whether both coordinates are within [`MAX_COORDINATE`] of the origin
    pub fn in_bounds(&self) -> bool {
        self.x.unsigned_abs() <= MAX_COORDINATE as u32
            && self.y.unsigned_abs() <= MAX_COORDINATE as u32
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis a word is read along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Left to right
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl Direction {
    /// Both directions, horizontal first
    pub const ALL: [Direction; 2] = [Direction::Horizontal, Direction::Vertical];

    /// The perpendicular axis
    pub const fn other(&self) -> Direction {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }

    /// Signed `(dx, dy)` offset of `magnitude` steps along this axis
    pub const fn vector(&self, magnitude: i32) -> (i32, i32) {
        match self {
            Direction::Horizontal => (magnitude, 0),
            Direction::Vertical => (0, magnitude),
        }
    }
}

/// Serde helper for letter maps keyed by [`Point`].
///
/// JSON object keys must be strings, so point-keyed maps are written as a list
/// of `[point, letter]` entries instead.
pub(crate) mod point_map {
    use super::Point;
    use serde::de::Deserializer;
    use serde::ser::Serializer;
    use serde::Deserialize;

    pub fn serialize<'a, M, S>(map: &'a M, serializer: S) -> Result<S::Ok, S::Error>
    where
        &'a M: IntoIterator<Item = (&'a Point, &'a char)>,
        S: Serializer,
    {
        serializer.collect_seq(map)
    }

    pub fn deserialize<'de, M, D>(deserializer: D) -> Result<M, D::Error>
    where
        M: FromIterator<(Point, char)>,
        D: Deserializer<'de>,
    {
        let entries = Vec::<(Point, char)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds() {
        assert!(ORIGIN.in_bounds());
        assert!(Point::new(-MAX_COORDINATE, MAX_COORDINATE).in_bounds());
        assert!(!Point::new(MAX_COORDINATE + 1, 0).in_bounds());
        assert!(!Point::new(0, i32::MIN).in_bounds());
    }

    #[test]
    fn test_other_direction() {
        assert_eq!(Direction::Horizontal.other(), Direction::Vertical);
        assert_eq!(Direction::Vertical.other(), Direction::Horizontal);
    }

    #[test]
    fn test_vector() {
        assert_eq!(Direction::Horizontal.vector(3), (3, 0));
        assert_eq!(Direction::Vertical.vector(-2), (0, -2));
    }

    #[test]
    fn test_step_along_direction() {
        let p = Point::new(2, -1);
        assert_eq!(p.step(Direction::Horizontal, 2), Point::new(4, -1));
        assert_eq!(p.step(Direction::Vertical, -1), Point::new(2, -2));
    }

    #[test]
    fn test_points_order_by_x_then_y() {
        let mut points = vec![Point::new(1, 0), Point::new(0, 5), Point::new(0, -1)];
        points.sort();
        assert_eq!(
            points,
            vec![Point::new(0, -1), Point::new(0, 5), Point::new(1, 0)]
        );
    }
}
