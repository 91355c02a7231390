//! Core game state machine.
//!
//! A [`Game`] owns the board, the players and the letter pool. Players join
//! while the game is open, [`Game::start`] deals the racks, and from then on
//! players take turns in join order. A full rotation through the players is a
//! round.
//!
//! The pool is shuffled once when the game is created. Draws advance an index
//! into it instead of removing tiles, so [`Game::undo`] can hand tiles back by
//! rewinding the index and reshuffling whatever has not been drawn.

use crate::board::Board;
use crate::config::Config;
use crate::error::GameError;
use crate::placement::PlacementResult;
use crate::player::{Player, PlayerId, PlayerStatus, Turn};
use crate::point::{Direction, Point};
use crate::word::Word;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Complete state of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Game identifier
    pub id: Uuid,
    /// Rules this game is played with
    pub config: Config,
    /// Every tile in the bag, in draw order
    pool: Vec<char>,
    /// Number of tiles drawn so far
    pool_index: usize,
    /// Players in turn order
    players: Vec<Player>,
    /// Index of the player whose turn it is
    turn: usize,
    /// Current round (starts at 1)
    round: u32,
    started: bool,
    board: Board,
}

impl Game {
    /// Create an open game with a freshly shuffled pool
    pub fn new(config: Config) -> Self {
        let mut rng = rand::thread_rng();
        Self::new_with_rng(config, &mut rng)
    }

    /// Create an open game, shuffling the pool with the provided RNG
    pub fn new_with_rng<R: Rng>(config: Config, rng: &mut R) -> Self {
        Self {
            id: Uuid::new_v4(),
            pool: config.initial_pool_with_rng(rng),
            pool_index: 0,
            players: Vec::new(),
            turn: 0,
            round: 1,
            started: false,
            board: Board::new(config.clone()),
            config,
        }
    }

    // ==================== Queries ====================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Index of the player whose turn it is
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Tiles still in the pool
    pub fn letters_remaining(&self) -> usize {
        self.pool.len() - self.pool_index
    }

    /// The player whose turn it is, once the game has started
    pub fn current_player(&self) -> Option<&Player> {
        if !self.started {
            return None;
        }
        self.players.get(self.turn)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Seat of a player in turn order
    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    // ==================== Setup ====================

    /// Seat a new player at the end of the turn order
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<&Player, GameError> {
        if self.started {
            return Err(GameError::GameStarted);
        }

        let player = Player::new(name);
        debug!(game = %self.id, player = %player.name, "player joined");
        self.players.push(player);

        let index = self.players.len() - 1;
        Ok(&self.players[index])
    }

    pub fn set_player_status(
        &mut self,
        id: PlayerId,
        status: PlayerStatus,
    ) -> Result<(), GameError> {
        let player = self.player_mut(id).ok_or(GameError::PlayerNotFound)?;
        player.status = status;
        Ok(())
    }

    /// Deal every rack and open play.
    ///
    /// Fails without dealing anything if the pool would run dry before every
    /// player who needs tiles has been given some.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.started {
            return Err(GameError::GameStarted);
        }
        if self.players.is_empty() {
            return Err(GameError::NotEnoughPlayers);
        }

        let mut available = self.letters_remaining();
        for player in &self.players {
            let needed = self.config.rack_size.saturating_sub(player.letters.len());
            if needed == 0 {
                continue;
            }
            if available == 0 {
                return Err(GameError::NoLettersInPool);
            }
            available -= needed.min(available);
        }

        for index in 0..self.players.len() {
            self.fill_rack(index);
        }

        self.started = true;
        debug!(game = %self.id, players = self.players.len(), "game started");
        Ok(())
    }

    // ==================== Play ====================

    /// Check whether a player could play `word`, without changing anything.
    ///
    /// Letters the rack lacks are covered by blank tiles where possible, in
    /// word order; the result is then rescored with those blanks.
    pub fn check_word(
        &self,
        player_id: PlayerId,
        word: &Word,
    ) -> Result<PlacementResult, GameError> {
        if !self.started {
            return Err(GameError::GameNotStarted);
        }
        let player = self.player(player_id).ok_or(GameError::PlayerNotFound)?;
        if !self.could_hold(player, word.len()) {
            return Err(GameError::CannotPlayWord);
        }

        let result = self.board.try_place(word)?;
        let blanks = player
            .blanks_needed(&result.direct_word, &result.letters_used)
            .ok_or(GameError::CannotPlayWord)?;

        if blanks.is_empty() {
            return Ok(result);
        }

        self.board.try_place(&word.with_blanks(blanks))
    }

    /// Play `word` for the player whose turn it is.
    ///
    /// The rack is refilled from whatever the pool still holds; running out
    /// of tiles is not an error here.
    pub fn play_word(
        &mut self,
        player_id: PlayerId,
        word: &Word,
    ) -> Result<PlacementResult, GameError> {
        if !self.started {
            return Err(GameError::GameNotStarted);
        }
        let index = self
            .player_index(player_id)
            .ok_or(GameError::PlayerNotFound)?;
        if index != self.turn {
            return Err(GameError::NotYourTurn);
        }

        let checked = self.check_word(player_id, word)?;
        let result = self.board.place(&checked.direct_word)?;

        self.players[index].take_letters(&result.tiles());
        let drawn = self.fill_rack(index);

        let round = self.round;
        let player = &mut self.players[index];
        debug!(
            game = %self.id,
            player = %player.name,
            word = %result.direct_word,
            points = result.points,
            "word played"
        );
        player.record_turn(Turn {
            round,
            result: result.clone(),
            drawn,
        });

        self.advance_turn();
        Ok(result)
    }

    /// Every legal way for a player to play `letters` so that one of them
    /// lands on `anchor`, best first.
    ///
    /// Horizontal candidates are tried before vertical ones, each sliding the
    /// word back one cell at a time; ties keep that order.
    pub fn find_placements(
        &self,
        player_id: PlayerId,
        anchor: Point,
        letters: &str,
    ) -> Result<Vec<PlacementResult>, GameError> {
        if !self.started {
            return Err(GameError::GameNotStarted);
        }
        let player = self.player(player_id).ok_or(GameError::PlayerNotFound)?;
        if !anchor.in_bounds() {
            return Err(GameError::OutOfBounds);
        }

        let len = letters.chars().count();
        if !self.could_hold(player, len) {
            return Err(GameError::CannotPlayWord);
        }
        let len = len as i32;
        let mut placements = Vec::new();

        for direction in Direction::ALL {
            for offset in 0..len {
                let word = Word::new(anchor.step(direction, -offset), direction, letters);
                if let Ok(result) = self.check_word(player_id, &word) {
                    placements.push(result);
                }
            }
        }

        if placements.is_empty() {
            return Err(GameError::CannotPlayWord);
        }

        placements.sort_by(|a, b| b.points.cmp(&a.points));
        Ok(placements)
    }

    /// Take back the most recent play
    pub fn undo(&mut self) -> Result<(), GameError> {
        let mut rng = rand::thread_rng();
        self.undo_with_rng(&mut rng)
    }

    /// Take back the most recent play, reshuffling the pool with the provided
    /// RNG.
    ///
    /// The player gets back the tiles they played and returns the ones they
    /// drew, which go back into the undrawn part of the pool.
    pub fn undo_with_rng<R: Rng>(&mut self, rng: &mut R) -> Result<(), GameError> {
        if !self.started {
            return Err(GameError::GameNotStarted);
        }

        let Some(last) = self.previous_turn() else {
            return Err(GameError::NothingToUndo);
        };
        if self.players[last].turns.is_empty() {
            return Err(GameError::NothingToUndo);
        }

        self.board.remove_last_word()?;

        let player = &mut self.players[last];
        let Some(turn) = player.pop_turn() else {
            return Err(GameError::NothingToUndo);
        };
        player.take_letters(&turn.drawn);
        player.give_letters(&turn.result.tiles());
        debug!(
            game = %self.id,
            player = %player.name,
            word = %turn.result.direct_word,
            "play undone"
        );

        self.pool_index = self.pool_index.saturating_sub(turn.drawn.len());
        self.pool[self.pool_index..].shuffle(rng);

        if self.turn == 0 {
            self.round = self.round.saturating_sub(1);
        }
        self.turn = last;

        Ok(())
    }

    // ==================== Serialization ====================

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    // ==================== Internals ====================

    /// Whether a word of `len` letters could be built from the player's rack
    /// and the tiles already on the board
    fn could_hold(&self, player: &Player, len: usize) -> bool {
        len <= player.letters.len() + self.board.tile_count()
    }

    /// Pass play to the next seat, starting a new round after the last
    fn advance_turn(&mut self) {
        self.turn += 1;
        if self.turn >= self.players.len() {
            self.turn = 0;
            self.round += 1;
        }
    }

    /// Seat that played last
    fn previous_turn(&self) -> Option<usize> {
        let count = self.players.len();
        if count == 0 {
            return None;
        }
        Some((self.turn + count - 1) % count)
    }

    /// Top a rack up to the rack size from the pool, returning what was dealt
    fn fill_rack(&mut self, index: usize) -> Vec<char> {
        let needed = self
            .config
            .rack_size
            .saturating_sub(self.players[index].letters.len());
        let drawn = self.draw(needed);

        if !drawn.is_empty() {
            let player = &mut self.players[index];
            debug!(
                game = %self.id,
                player = %player.name,
                letters = %drawn.iter().collect::<String>(),
                "giving letters to player"
            );
            player.give_letters(&drawn);
        }

        drawn
    }

    /// Draw up to `n` tiles
    fn draw(&mut self, n: usize) -> Vec<char> {
        let n = n.min(self.letters_remaining());
        let drawn = self.pool[self.pool_index..self.pool_index + n].to_vec();
        self.pool_index += n;
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rack(letters: &str) -> Vec<char> {
        letters.chars().collect()
    }

    fn hello() -> Word {
        Word::new(Point::new(0, 0), Direction::Horizontal, "HELLO")
    }

    fn seeded_game() -> Game {
        let mut rng = StdRng::seed_from_u64(42);
        Game::new_with_rng(Config::standard(), &mut rng)
    }

    #[test]
    fn test_new_game() {
        let game = seeded_game();
        assert_eq!(game.round(), 1);
        assert_eq!(game.letters_remaining(), 100);
        assert!(!game.is_started());
        assert!(game.current_player().is_none());
    }

    #[test]
    fn test_same_seed_same_pool() {
        assert_eq!(seeded_game().pool, seeded_game().pool);
    }

    #[test]
    fn test_start_needs_players() {
        let mut game = seeded_game();
        assert_eq!(game.start(), Err(GameError::NotEnoughPlayers));

        game.add_player("alice").unwrap();
        game.start().unwrap();
        assert_eq!(game.start(), Err(GameError::GameStarted));
        assert_eq!(game.add_player("bob").unwrap_err(), GameError::GameStarted);
    }

    #[test]
    fn test_start_deals_racks() {
        let mut game = seeded_game();
        game.add_player("alice").unwrap();
        game.add_player("bob").unwrap();
        game.start().unwrap();

        assert!(game.players().iter().all(|p| p.letters.len() == 7));
        assert_eq!(game.letters_remaining(), 86);
        assert_eq!(game.current_player().map(|p| p.name.as_str()), Some("alice"));
    }

    #[test]
    fn test_start_with_empty_pool() {
        let mut config = Config::standard();
        config.letter_distribution = [('A', 7)].into_iter().collect();

        let mut game = Game::new_with_rng(config, &mut StdRng::seed_from_u64(1));
        game.add_player("alice").unwrap();
        game.add_player("bob").unwrap();

        assert_eq!(game.start(), Err(GameError::NoLettersInPool));
        assert!(!game.is_started());
        assert!(game.players().iter().all(|p| p.letters.is_empty()));
    }

    #[test]
    fn test_not_started() {
        let mut game = seeded_game();
        let id = game.add_player("alice").unwrap().id;

        assert_eq!(game.check_word(id, &hello()), Err(GameError::GameNotStarted));
        assert_eq!(game.play_word(id, &hello()), Err(GameError::GameNotStarted));
        assert_eq!(game.undo(), Err(GameError::GameNotStarted));
    }

    #[test]
    fn test_unknown_player() {
        let mut game = seeded_game();
        game.add_player("alice").unwrap();
        game.start().unwrap();

        let stranger = Uuid::new_v4();
        assert_eq!(game.check_word(stranger, &hello()), Err(GameError::PlayerNotFound));
        assert_eq!(
            game.find_placements(stranger, Point::new(0, 0), "HI"),
            Err(GameError::PlayerNotFound)
        );
    }

    #[test]
    fn test_rack_must_cover_word() {
        let mut game = seeded_game();
        let id = game.add_player("alice").unwrap().id;
        game.player_mut(id).unwrap().letters = rack("QQQQQQQ");
        game.start().unwrap();

        assert_eq!(game.check_word(id, &hello()), Err(GameError::CannotPlayWord));
    }

    #[test]
    fn test_far_away_placements_are_rejected() {
        let mut game = seeded_game();
        let id = game.add_player("alice").unwrap().id;
        game.player_mut(id).unwrap().letters = rack("HIHIHIH");
        game.start().unwrap();

        let word = Word::new(Point::new(i32::MIN, 0), Direction::Horizontal, "HI");
        assert_eq!(game.check_word(id, &word), Err(GameError::OutOfBounds));
        assert_eq!(game.play_word(id, &word), Err(GameError::OutOfBounds));
        assert_eq!(
            game.find_placements(id, Point::new(i32::MIN, i32::MAX), "HI"),
            Err(GameError::OutOfBounds)
        );
        assert!(game.board().is_empty());
    }

    #[test]
    fn test_word_longer_than_rack_and_board() {
        let mut game = seeded_game();
        let id = game.add_player("alice").unwrap().id;
        game.player_mut(id).unwrap().letters = rack("_______");
        game.start().unwrap();

        let long = "A".repeat(10_000);
        let word = Word::new(Point::new(0, 0), Direction::Horizontal, &long);
        assert_eq!(game.check_word(id, &word), Err(GameError::CannotPlayWord));
        assert_eq!(
            game.find_placements(id, Point::new(0, 0), &long),
            Err(GameError::CannotPlayWord)
        );
    }

    #[test]
    fn test_blank_fills_missing_letter() {
        let mut game = seeded_game();
        let id = game.add_player("alice").unwrap().id;
        game.player_mut(id).unwrap().letters = rack("HELO_QQ");
        game.start().unwrap();

        let result = game.check_word(id, &hello()).unwrap();
        // The first L is real, the second is the blank
        assert_eq!(result.letters_used[&Point::new(2, 0)], 'L');
        assert_eq!(result.letters_used[&Point::new(3, 0)], '_');
        assert!(result.direct_word.is_blank_at(3));
    }

    #[test]
    fn test_play_word_updates_rack_and_turns() {
        let mut game = seeded_game();
        let alice = game.add_player("alice").unwrap().id;
        let bob = game.add_player("bob").unwrap().id;
        game.player_mut(alice).unwrap().letters = rack("HELLOXY");
        game.start().unwrap();

        assert_eq!(game.play_word(bob, &hello()), Err(GameError::NotYourTurn));

        let result = game.play_word(alice, &hello()).unwrap();
        let player = game.player(alice).unwrap();
        assert_eq!(player.letters.len(), 7);
        assert_eq!(&player.letters[..2], &['X', 'Y']);
        assert_eq!(player.turns.len(), 1);
        assert_eq!(player.turns[0].drawn.len(), 5);
        assert_eq!(player.score(), result.points);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.round(), 1);
    }

    #[test]
    fn test_refill_with_empty_pool_is_fine() {
        let mut config = Config::standard();
        config.letter_distribution = [('H', 1), ('I', 1)].into_iter().collect();
        config.rack_size = 2;

        let mut game = Game::new_with_rng(config, &mut StdRng::seed_from_u64(3));
        let id = game.add_player("alice").unwrap().id;
        game.start().unwrap();
        assert_eq!(game.letters_remaining(), 0);

        let word = Word::new(Point::new(0, 0), Direction::Horizontal, "HI");
        game.play_word(id, &word).unwrap();
        assert!(game.player(id).unwrap().letters.is_empty());
    }

    #[test]
    fn test_undo_restores_rack_and_pool() {
        let mut game = seeded_game();
        let alice = game.add_player("alice").unwrap().id;
        game.add_player("bob").unwrap();
        game.player_mut(alice).unwrap().letters = rack("HELLOXY");
        game.start().unwrap();

        let remaining = game.letters_remaining();
        game.play_word(alice, &hello()).unwrap();
        assert_eq!(game.letters_remaining(), remaining - 5);

        game.undo_with_rng(&mut StdRng::seed_from_u64(9)).unwrap();

        let mut letters = game.player(alice).unwrap().letters.clone();
        letters.sort_unstable();
        assert_eq!(letters, rack("EHLLOXY"));
        assert!(game.player(alice).unwrap().turns.is_empty());
        assert_eq!(game.letters_remaining(), remaining);
        assert_eq!(game.turn(), 0);
        assert!(game.board().is_empty());
    }

    #[test]
    fn test_undo_across_round_boundary() {
        let mut game = seeded_game();
        let alice = game.add_player("alice").unwrap().id;
        game.player_mut(alice).unwrap().letters = rack("HELLOXY");
        game.start().unwrap();

        game.play_word(alice, &hello()).unwrap();
        assert_eq!((game.turn(), game.round()), (0, 2));

        game.undo().unwrap();
        assert_eq!((game.turn(), game.round()), (0, 1));
    }

    #[test]
    fn test_nothing_to_undo() {
        let mut game = seeded_game();
        game.add_player("alice").unwrap();
        game.start().unwrap();

        let before = game.clone();
        assert_eq!(game.undo(), Err(GameError::NothingToUndo));
        assert_eq!(game, before);
    }

    #[test]
    fn test_find_placements_none_legal() {
        let mut game = seeded_game();
        let id = game.add_player("alice").unwrap().id;
        game.player_mut(id).unwrap().letters = rack("QQQQQQQ");
        game.start().unwrap();

        assert_eq!(
            game.find_placements(id, Point::new(0, 0), "HI"),
            Err(GameError::CannotPlayWord)
        );
    }

    #[test]
    fn test_set_player_status() {
        let mut game = seeded_game();
        let id = game.add_player("alice").unwrap().id;

        game.set_player_status(id, PlayerStatus::Inactive).unwrap();
        assert!(!game.player(id).unwrap().is_active());
        assert_eq!(
            game.set_player_status(Uuid::new_v4(), PlayerStatus::Active),
            Err(GameError::PlayerNotFound)
        );
        assert_eq!(game.player_by_name("alice").map(|p| p.id), Some(id));
    }

    #[test]
    fn test_json_round_trip() {
        let mut game = seeded_game();
        let id = game.add_player("alice").unwrap().id;
        game.player_mut(id).unwrap().letters = rack("HELL_XY");
        game.start().unwrap();
        game.play_word(id, &hello()).unwrap();

        let json = game.to_json().unwrap();
        assert_eq!(Game::from_json(&json).unwrap(), game);
    }
}
