//! WebSocket protocol messages for Words multiplayer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use words_core::{Cell, ConfigOverrides, Direction, PlacementResult, PlayerStatus, Point, Word};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Create a new game from a preset and join it as host
    CreateGame {
        player_name: String,
        #[serde(default)]
        preset: Option<String>,
        #[serde(default)]
        overrides: ConfigOverrides,
    },

    /// Take a new seat in a game that has not started
    JoinGame { game_id: Uuid, player_name: String },

    /// Reclaim an existing seat, e.g. after reconnecting
    RejoinGame { game_id: Uuid, player_id: Uuid },

    /// Give up the current seat (it can be rejoined later)
    LeaveGame,

    /// Deal the racks and begin (host only)
    StartGame,

    /// Score a placement without playing it
    CheckWord { placement: PlacementRequest },

    /// Play a word
    PlayWord { placement: PlacementRequest },

    /// List every way to play `word` through a cell
    FindPlacements { x: i32, y: i32, word: String },

    /// Take back the last play (host only)
    Undo,

    /// Request board cells; defaults to the area around every placed letter
    GetBoard {
        #[serde(default)]
        min: Option<Point>,
        #[serde(default)]
        max: Option<Point>,
    },

    /// Send chat message
    Chat { message: String },

    /// Request the list of games waiting for players
    ListGames,

    /// Request the available presets
    ListPresets,

    /// Ping for keepalive
    Ping,
}

/// A word a client wants to check or play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub word: String,
}

impl PlacementRequest {
    pub fn to_word(&self) -> Word {
        Word::new(Point::new(self.x, self.y), self.direction, &self.word.to_uppercase())
    }
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with the connection's ID
    Welcome { connection_id: Uuid },

    /// Game created successfully
    GameCreated { game_id: Uuid },

    /// Seated in a game; `player_id` is needed to rejoin later
    JoinedGame { game: GameInfo, player_id: Uuid },

    /// Seats or statuses changed
    GameUpdated { game: GameInfo },

    /// Racks dealt, play begins
    GameStarted { game: GameInfo },

    /// The receiving player's tiles
    Rack { letters: Vec<char> },

    /// Result of a check
    WordChecked { placement: PlacementResult },

    /// A word was played
    WordPlayed {
        player_id: Uuid,
        placement: PlacementResult,
    },

    /// Candidate placements, best first
    Placements { placements: Vec<PlacementResult> },

    /// Board cells
    Board { cells: Vec<Cell> },

    /// Current player changed
    TurnChanged { player_id: Uuid, round: u32 },

    /// The last play was taken back
    Undone { game: GameInfo },

    /// Chat message received
    ChatMessage { player_name: String, message: String },

    /// Games waiting for players
    GameList { games: Vec<GameInfo> },

    /// Available presets
    PresetList { presets: Vec<PresetInfo> },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Game information for clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: Uuid,
    pub host_id: Option<Uuid>,
    pub status: RoomStatus,
    pub round: u32,
    pub current_player: Option<Uuid>,
    pub letters_remaining: usize,
    pub players: Vec<PlayerInfo>,
}

/// Player information in a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: Uuid,
    pub name: String,
    pub score: u32,
    /// Tiles on the rack (the letters themselves are private)
    pub tiles: usize,
    pub status: PlayerStatus,
    pub connected: bool,
}

/// Preset summary for the create-game screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rack_size: usize,
    pub tile_count: u32,
}

/// Game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Waiting,
    InGame,
}
