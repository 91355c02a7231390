//! Game room management.
//!
//! A room is one hosted [`Game`] plus the connections currently sitting in
//! its seats. Everything a room knows beyond the game itself is transient:
//! after a restart the room is rebuilt from the stored game and players
//! reclaim their seats with their player id.

use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;
use words_core::{Cell, Game, GameError, PlacementResult, PlayerId, PlayerStatus, Point};

use crate::protocol::{GameInfo, PlacementRequest, PlayerInfo, RoomStatus};
use crate::store::StoreError;

/// Identifies one WebSocket connection
pub type ConnectionId = Uuid;

/// Smallest board area returned when a client does not ask for one, and the
/// margin kept around the placed letters when clamping a requested area
const VIEW_RADIUS: i32 = 15;

/// Most cells a single board view may span
const MAX_VIEW_CELLS: i64 = 256 * 256;

#[derive(Debug, Error)]
pub enum RoomError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Not seated in this game")]
    NotInGame,

    #[error("Not the host")]
    NotHost,

    #[error("Seat is held by another connection")]
    SeatTaken,

    #[error("Game not found")]
    GameNotFound,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Requested board area is too large")]
    ViewTooLarge,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A hosted game and its seated connections.
pub struct GameRoom {
    pub id: Uuid,
    pub game: Game,
    /// Connection holding each seat
    seats: HashMap<PlayerId, ConnectionId>,
}

impl GameRoom {
    pub fn new(game: Game) -> Self {
        Self {
            id: game.id,
            game,
            seats: HashMap::new(),
        }
    }

    pub fn status(&self) -> RoomStatus {
        if self.game.is_started() {
            RoomStatus::InGame
        } else {
            RoomStatus::Waiting
        }
    }

    /// The first active player hosts the game
    pub fn host_id(&self) -> Option<PlayerId> {
        self.game
            .players()
            .iter()
            .find(|p| p.is_active())
            .map(|p| p.id)
    }

    /// Player seated by `conn`
    pub fn player_for(&self, conn: ConnectionId) -> Result<PlayerId, RoomError> {
        self.seats
            .iter()
            .find(|(_, c)| **c == conn)
            .map(|(player, _)| *player)
            .ok_or(RoomError::NotInGame)
    }

    pub fn connections(&self) -> Vec<ConnectionId> {
        self.seats.values().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn player_name(&self, conn: ConnectionId) -> Option<String> {
        let player_id = self.player_for(conn).ok()?;
        self.game.player(player_id).map(|p| p.name.clone())
    }

    pub fn rack(&self, player_id: PlayerId) -> Vec<char> {
        self.game
            .player(player_id)
            .map(|p| p.letters.clone())
            .unwrap_or_default()
    }

    /// Every seated connection with its player's rack
    pub fn racks(&self) -> Vec<(ConnectionId, Vec<char>)> {
        self.seats
            .iter()
            .map(|(player_id, conn)| (*conn, self.rack(*player_id)))
            .collect()
    }

    // ==================== Seats ====================

    /// Seat a new player
    pub fn add_player(&mut self, conn: ConnectionId, name: String) -> Result<PlayerId, RoomError> {
        let player_id = self.game.add_player(name)?.id;
        self.seats.insert(player_id, conn);
        Ok(player_id)
    }

    /// Put a connection back into an existing seat
    pub fn rejoin(&mut self, conn: ConnectionId, player_id: PlayerId) -> Result<(), RoomError> {
        if self.game.player(player_id).is_none() {
            return Err(GameError::PlayerNotFound.into());
        }
        if let Some(holder) = self.seats.get(&player_id) {
            if *holder != conn {
                return Err(RoomError::SeatTaken);
            }
        }

        self.game.set_player_status(player_id, PlayerStatus::Active)?;
        self.seats.insert(player_id, conn);
        Ok(())
    }

    /// Vacate the seat held by `conn`. The player stays in the game as
    /// inactive and can rejoin later.
    pub fn leave(&mut self, conn: ConnectionId) -> Result<PlayerId, RoomError> {
        let player_id = self.player_for(conn)?;
        self.seats.remove(&player_id);
        self.game
            .set_player_status(player_id, PlayerStatus::Inactive)?;
        Ok(player_id)
    }

    // ==================== Play ====================

    pub fn start(&mut self, conn: ConnectionId) -> Result<(), RoomError> {
        let player_id = self.player_for(conn)?;
        if self.host_id() != Some(player_id) {
            return Err(RoomError::NotHost);
        }

        self.game.start()?;
        Ok(())
    }

    pub fn check_word(
        &self,
        conn: ConnectionId,
        request: &PlacementRequest,
    ) -> Result<PlacementResult, RoomError> {
        let player_id = self.player_for(conn)?;
        Ok(self.game.check_word(player_id, &request.to_word())?)
    }

    pub fn play_word(
        &mut self,
        conn: ConnectionId,
        request: &PlacementRequest,
    ) -> Result<(PlayerId, PlacementResult), RoomError> {
        let player_id = self.player_for(conn)?;
        let result = self.game.play_word(player_id, &request.to_word())?;
        Ok((player_id, result))
    }

    pub fn find_placements(
        &self,
        conn: ConnectionId,
        anchor: Point,
        word: &str,
    ) -> Result<Vec<PlacementResult>, RoomError> {
        let player_id = self.player_for(conn)?;
        Ok(self
            .game
            .find_placements(player_id, anchor, &word.to_uppercase())?)
    }

    /// Take back the last play (host only)
    pub fn undo(&mut self, conn: ConnectionId) -> Result<(), RoomError> {
        let player_id = self.player_for(conn)?;
        if self.host_id() != Some(player_id) {
            return Err(RoomError::NotHost);
        }

        self.game.undo()?;
        Ok(())
    }

    /// Board cells in a rectangle.
    ///
    /// Missing corners default to a square around the origin, widened to
    /// cover every placed letter. Requested corners are clamped to that same
    /// area, since nothing beyond it can hold a letter.
    pub fn board_view(
        &self,
        min: Option<Point>,
        max: Option<Point>,
    ) -> Result<Vec<Cell>, RoomError> {
        let bounds = self.game.board().bounds();
        let outer_min = Point::new(
            bounds.min_x.min(-VIEW_RADIUS),
            bounds.min_y.min(-VIEW_RADIUS),
        );
        let outer_max = Point::new(
            (bounds.max_x - 1).max(VIEW_RADIUS),
            (bounds.max_y - 1).max(VIEW_RADIUS),
        );

        let min = min.map_or(outer_min, |p| {
            Point::new(p.x.clamp(outer_min.x, outer_max.x), p.y.clamp(outer_min.y, outer_max.y))
        });
        let max = max.map_or(outer_max, |p| {
            Point::new(p.x.clamp(outer_min.x, outer_max.x), p.y.clamp(outer_min.y, outer_max.y))
        });

        let width = (i64::from(max.x) - i64::from(min.x) + 1).max(0);
        let height = (i64::from(max.y) - i64::from(min.y) + 1).max(0);
        if width * height > MAX_VIEW_CELLS {
            return Err(RoomError::ViewTooLarge);
        }

        Ok(self.game.board().view(min, max))
    }

    pub fn to_info(&self) -> GameInfo {
        GameInfo {
            id: self.id,
            host_id: self.host_id(),
            status: self.status(),
            round: self.game.round(),
            current_player: self.game.current_player().map(|p| p.id),
            letters_remaining: self.game.letters_remaining(),
            players: self
                .game
                .players()
                .iter()
                .map(|p| PlayerInfo {
                    id: p.id,
                    name: p.name.clone(),
                    score: p.score(),
                    tiles: p.letters.len(),
                    status: p.status,
                    connected: self.seats.contains_key(&p.id),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use words_core::{Config, Direction};

    fn room() -> GameRoom {
        GameRoom::new(Game::new(Config::standard()))
    }

    fn hello() -> PlacementRequest {
        PlacementRequest {
            x: 0,
            y: 0,
            direction: Direction::Horizontal,
            word: "hello".into(),
        }
    }

    /// Room with two seated players; the host holds HELLO
    fn started_room() -> (GameRoom, ConnectionId, ConnectionId) {
        let mut room = room();
        let (host, guest) = (Uuid::new_v4(), Uuid::new_v4());
        let host_id = room.add_player(host, "alice".into()).unwrap();
        room.add_player(guest, "bob".into()).unwrap();
        room.game.player_mut(host_id).unwrap().letters = "HELLOAB".chars().collect();
        room.start(host).unwrap();
        (room, host, guest)
    }

    #[test]
    fn test_create_room() {
        let room = room();
        assert_eq!(room.id, room.game.id);
        assert_eq!(room.status(), RoomStatus::Waiting);
        assert_eq!(room.host_id(), None);
        assert!(room.is_empty());
    }

    #[test]
    fn test_add_and_leave() {
        let mut room = room();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let alice = room.add_player(a, "alice".into()).unwrap();
        let bob = room.add_player(b, "bob".into()).unwrap();
        assert_eq!(room.host_id(), Some(alice));
        assert_eq!(room.player_for(b).unwrap(), bob);
        assert_eq!(room.player_name(a).as_deref(), Some("alice"));

        // Host passes to the next active player
        assert_eq!(room.leave(a).unwrap(), alice);
        assert_eq!(room.host_id(), Some(bob));
        assert!(matches!(room.player_for(a), Err(RoomError::NotInGame)));

        let info = room.to_info();
        assert_eq!(info.players.len(), 2);
        assert!(!info.players[0].connected);
        assert_eq!(info.players[0].status, PlayerStatus::Inactive);
    }

    #[test]
    fn test_rejoin() {
        let mut room = room();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let alice = room.add_player(a, "alice".into()).unwrap();

        assert!(matches!(room.rejoin(b, alice), Err(RoomError::SeatTaken)));

        room.leave(a).unwrap();
        room.rejoin(b, alice).unwrap();
        assert_eq!(room.player_for(b).unwrap(), alice);
        assert_eq!(room.host_id(), Some(alice));

        assert!(matches!(
            room.rejoin(a, Uuid::new_v4()),
            Err(RoomError::Game(GameError::PlayerNotFound))
        ));
    }

    #[test]
    fn test_only_host_starts() {
        let mut room = room();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        room.add_player(a, "alice".into()).unwrap();
        room.add_player(b, "bob".into()).unwrap();

        assert!(matches!(room.start(b), Err(RoomError::NotHost)));
        room.start(a).unwrap();
        assert_eq!(room.status(), RoomStatus::InGame);
        assert!(matches!(
            room.start(a),
            Err(RoomError::Game(GameError::GameStarted))
        ));
    }

    #[test]
    fn test_play_word() {
        let (mut room, host, guest) = started_room();

        assert!(matches!(
            room.play_word(guest, &hello()),
            Err(RoomError::Game(GameError::NotYourTurn))
        ));

        let checked = room.check_word(host, &hello()).unwrap();
        let (player_id, played) = room.play_word(host, &hello()).unwrap();
        assert_eq!(checked, played);
        assert_eq!(room.player_for(host).unwrap(), player_id);
        assert_eq!(room.rack(player_id).len(), 7);

        let info = room.to_info();
        assert_eq!(info.players[0].score, played.points);
        assert_eq!(info.current_player, Some(room.player_for(guest).unwrap()));
    }

    #[test]
    fn test_undo_is_host_only() {
        let (mut room, host, guest) = started_room();
        room.play_word(host, &hello()).unwrap();

        assert!(matches!(room.undo(guest), Err(RoomError::NotHost)));
        room.undo(host).unwrap();
        assert!(room.game.board().is_empty());
    }

    #[test]
    fn test_board_view_defaults() {
        let (mut room, host, _) = started_room();
        room.play_word(host, &hello()).unwrap();

        let cells = room.board_view(None, None).unwrap();
        let letters: String = cells.iter().filter_map(|c| c.letter).collect();
        assert_eq!(letters, "HELLO");
        assert!(cells
            .iter()
            .all(|c| c.point.x.abs() <= VIEW_RADIUS && c.point.y.abs() <= VIEW_RADIUS));

        let cells = room
            .board_view(Some(Point::new(0, 0)), Some(Point::new(1, 0)))
            .unwrap();
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn test_board_view_clamps_huge_requests() {
        let (mut room, host, _) = started_room();
        room.play_word(host, &hello()).unwrap();

        let everything = room.board_view(None, None).unwrap();
        let huge = room
            .board_view(
                Some(Point::new(i32::MIN, i32::MIN)),
                Some(Point::new(i32::MAX, i32::MAX)),
            )
            .unwrap();
        assert_eq!(huge, everything);

        let far = room
            .board_view(Some(Point::new(2000, 2000)), Some(Point::new(4000, 4000)))
            .unwrap();
        assert!(far.len() <= 1);

        // Inverted corners select nothing
        let inverted = room
            .board_view(Some(Point::new(5, 5)), Some(Point::new(-5, -5)))
            .unwrap();
        assert!(inverted.is_empty());
    }
}
