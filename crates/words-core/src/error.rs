//! Errors returned by the game engine.

use crate::point::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when driving a game
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    // ==================== State ====================
    #[error("Game has not started")]
    GameNotStarted,

    #[error("Game already started")]
    GameStarted,

    #[error("Not enough players")]
    NotEnoughPlayers,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Player not found")]
    PlayerNotFound,

    // ==================== Placement ====================
    #[error("First word must cover the centre square")]
    FirstWordNotCentered,

    #[error("Word is not connected to any other words")]
    WordNotConnected,

    #[error("No letters were added to the board")]
    Unchanged,

    #[error("Conflict at {point}: wanted {wanted:?}, got {got:?}")]
    WordConflict { point: Point, wanted: char, got: char },

    #[error("Word is part of a longer run of letters")]
    IncompleteWord,

    #[error("Player cannot play word")]
    CannotPlayWord,

    #[error("Word lies outside the playable area")]
    OutOfBounds,

    // ==================== Resources ====================
    #[error("No letters in pool")]
    NoLettersInPool,

    #[error("Nothing to undo")]
    NothingToUndo,

    // ==================== Configuration ====================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
