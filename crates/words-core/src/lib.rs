//! Words - a multiplayer tile-placement word game engine
//!
//! This crate provides the rules of the game:
//! - An unbounded, sparse board with placement legality and cross-word checks
//! - Scoring with letter and word modifiers and blank tiles
//! - Player racks, turn history and a shuffled letter pool
//! - A turn/round state machine with undo and a placement search
//!
//! # Architecture
//!
//! The engine does no I/O and holds no global state. A [`Game`] is a plain
//! value: the server keeps one per hosted game, serializes it with serde and
//! drives it one call at a time.
//!
//! # Modules
//!
//! - [`point`]: Coordinates and axes
//! - [`modifier`]: Premium square multipliers
//! - [`pattern`]: Declarative premium square layouts
//! - [`word`]: Candidate and placed words
//! - [`placement`]: Placement results and scoring
//! - [`board`]: The letter grid
//! - [`config`]: Rules and presets
//! - [`player`]: Racks and turn history
//! - [`game`]: Game state machine
//! - [`error`]: Engine errors

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod modifier;
pub mod pattern;
pub mod placement;
pub mod player;
pub mod point;
pub mod word;

// Re-export commonly used types
pub use board::{Board, Bounds, Cell};
pub use config::{Config, ConfigOverrides, Preset, MAX_LETTER_POINTS, MAX_RACK_SIZE, MAX_TILES};
pub use error::GameError;
pub use game::Game;
pub use modifier::Modifier;
pub use pattern::{Pattern, PatternGroup, Shape};
pub use placement::{score_word, LetterPoints, PlacementResult};
pub use player::{Player, PlayerId, PlayerStatus, Turn};
pub use point::{Direction, Point, MAX_COORDINATE, ORIGIN};
pub use word::{Word, BLANK};
