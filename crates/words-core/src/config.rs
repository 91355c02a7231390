//! Game configuration and the bundled presets.
//!
//! A [`Config`] fixes everything rule-related that varies between games:
//! how many of each tile are in the bag, what each letter is worth, where the
//! premium squares are, and how many tiles a rack holds.

use crate::error::GameError;
use crate::modifier::Modifier;
use crate::pattern::{Pattern, PatternGroup, Shape};
use crate::placement::LetterPoints;
use crate::word::BLANK;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Most tiles a bag may hold
pub const MAX_TILES: u32 = 1_000;
/// Largest allowed rack
pub const MAX_RACK_SIZE: usize = 20;
/// Highest value a single letter may have
pub const MAX_LETTER_POINTS: u32 = 1_000;

/// Tile counts of the standard bag, blanks last
const STANDARD_DISTRIBUTION: [(char, u32); 27] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 4),
    ('E', 12),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 4),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
    (BLANK, 2),
];

/// Letter values shared by every preset
const STANDARD_POINTS: [(char, u32); 27] = [
    ('A', 1),
    ('B', 3),
    ('C', 3),
    ('D', 2),
    ('E', 1),
    ('F', 4),
    ('G', 2),
    ('H', 4),
    ('I', 1),
    ('J', 8),
    ('K', 5),
    ('L', 1),
    ('M', 3),
    ('N', 1),
    ('O', 1),
    ('P', 3),
    ('Q', 10),
    ('R', 1),
    ('S', 1),
    ('T', 1),
    ('U', 1),
    ('V', 4),
    ('W', 4),
    ('X', 8),
    ('Y', 4),
    ('Z', 10),
    (BLANK, 0),
];

/// Rules that vary between games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How many of each tile the bag starts with
    pub letter_distribution: BTreeMap<char, u32>,
    /// Value of each letter
    pub letter_points: LetterPoints,
    /// Premium squares, first match wins
    pub modifiers: PatternGroup<Modifier>,
    /// Tiles held by a full rack
    pub rack_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::standard()
    }
}

impl Config {
    /// The standard game: 100 tiles, racks of 7
    pub fn standard() -> Self {
        Self {
            letter_distribution: STANDARD_DISTRIBUTION.into_iter().collect(),
            letter_points: STANDARD_POINTS.into_iter().collect(),
            modifiers: standard_modifiers(),
            rack_size: 7,
        }
    }

    /// Twice the tiles, racks of 10
    pub fn extended() -> Self {
        Self {
            letter_distribution: STANDARD_DISTRIBUTION
                .into_iter()
                .map(|(letter, count)| (letter, count * 2))
                .collect(),
            letter_points: STANDARD_POINTS.into_iter().collect(),
            modifiers: standard_modifiers(),
            rack_size: 10,
        }
    }

    /// Total number of tiles in the bag
    pub fn tile_count(&self) -> u32 {
        self.letter_distribution
            .values()
            .fold(0, |total: u32, &count| total.saturating_add(count))
    }

    /// Value of a single letter (unknown letters are worth nothing)
    pub fn points_for(&self, letter: char) -> u32 {
        self.letter_points.get(&letter).copied().unwrap_or(0)
    }

    /// This config with the given overrides applied.
    ///
    /// The merged config must pass [`Config::validate`].
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, GameError> {
        if let Some(rack_size) = overrides.rack_size {
            self.rack_size = rack_size;
        }
        if let Some(distribution) = &overrides.letter_distribution {
            self.letter_distribution.extend(distribution);
        }
        if let Some(points) = &overrides.letter_points {
            self.letter_points.extend(points);
        }

        self.validate()?;
        Ok(self)
    }

    /// Check the bag, rack and letter values are within playable limits
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rack_size == 0 || self.rack_size > MAX_RACK_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "rack size must be between 1 and {}",
                MAX_RACK_SIZE
            )));
        }
        if self.tile_count() > MAX_TILES {
            return Err(GameError::InvalidConfig(format!(
                "bag may hold at most {} tiles",
                MAX_TILES
            )));
        }
        if let Some((letter, _)) = self
            .letter_points
            .iter()
            .find(|(_, points)| **points > MAX_LETTER_POINTS)
        {
            return Err(GameError::InvalidConfig(format!(
                "{:?} is worth more than {} points",
                letter, MAX_LETTER_POINTS
            )));
        }
        Ok(())
    }

    /// Shuffled bag of every tile in the distribution
    pub fn initial_pool(&self) -> Vec<char> {
        self.initial_pool_with_rng(&mut rand::thread_rng())
    }

    /// Shuffled bag of every tile in the distribution, using the given RNG
    pub fn initial_pool_with_rng<R: Rng>(&self, rng: &mut R) -> Vec<char> {
        let mut pool: Vec<char> = self
            .letter_distribution
            .iter()
            .flat_map(|(&letter, &count)| std::iter::repeat(letter).take(count as usize))
            .collect();

        pool.shuffle(rng);
        pool
    }
}

/// Premium square layout used by both presets.
///
/// Triple words sit on an 8-cell grid, double words run along the diagonals
/// from 3 to 6 steps out, triple letters form a 4-cell grid offset from the
/// centre, and double letters fill in the diagonals next to the centre plus a
/// few sparse grids.
fn standard_modifiers() -> PatternGroup<Modifier> {
    let grid = |x, y, size| Shape::Grid {
        x,
        y,
        width: size,
        height: size,
    };

    PatternGroup::new(vec![
        Pattern::new(Modifier::TripleWord, vec![grid(0, 0, 9)]),
        Pattern::new(
            Modifier::DoubleWord,
            vec![Shape::BothDiagonals {
                x: 0,
                y: 0,
                start_at: 3,
                skip_count: 2,
                match_count: 4,
            }],
        ),
        Pattern::new(Modifier::TripleLetter, vec![grid(2, 2, 5)]),
        Pattern::new(
            Modifier::DoubleLetter,
            vec![
                Shape::BothDiagonals {
                    x: 0,
                    y: 0,
                    start_at: 0,
                    skip_count: 0,
                    match_count: 3,
                },
                grid(0, 0, 5),
                grid(1, 5, 11),
                grid(-1, 5, 11),
                grid(5, 1, 11),
                grid(5, -1, 11),
            ],
        ),
    ])
}

/// Per-game changes layered over a preset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub rack_size: Option<usize>,
    /// Counts to replace, by letter
    #[serde(default)]
    pub letter_distribution: Option<BTreeMap<char, u32>>,
    /// Values to replace, by letter
    #[serde(default)]
    pub letter_points: Option<LetterPoints>,
}

/// A named configuration offered to players when creating a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub config: Config,
}

impl Preset {
    /// All bundled presets
    pub fn all() -> Vec<Preset> {
        vec![
            Preset {
                id: "standard".into(),
                name: "Standard".into(),
                description: "The standard letter distribution and scoring.".into(),
                config: Config::standard(),
            },
            Preset {
                id: "extended".into(),
                name: "Extended".into(),
                description: "Twice the letters and a bigger rack.".into(),
                config: Config::extended(),
            },
        ]
    }

    /// Look up a bundled preset
    pub fn by_id(id: &str) -> Option<Preset> {
        Self::all().into_iter().find(|preset| preset.id == id)
    }
}
