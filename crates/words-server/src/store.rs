//! Game persistence.
//!
//! Every accepted change to a game is written through a [`GameStore`], so a
//! game can be picked up again after the server restarts or after its room
//! was dropped from memory.

use dashmap::DashMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;
use words_core::Game;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Stored game is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where games live between requests.
pub trait GameStore: Send + Sync {
    fn save_game(&self, game: &Game) -> Result<(), StoreError>;

    /// `Ok(None)` when no game has that id
    fn get_game_by_id(&self, id: Uuid) -> Result<Option<Game>, StoreError>;
}

/// One JSON document per game in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl GameStore for FileStore {
    fn save_game(&self, game: &Game) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let mut writer = BufWriter::new(File::create(self.file(game.id))?);
        serde_json::to_writer(&mut writer, game)?;
        writer.flush()?;
        Ok(())
    }

    fn get_game_by_id(&self, id: Uuid) -> Result<Option<Game>, StoreError> {
        let file = match File::open(self.file(id)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let game = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(game))
    }
}

/// Games kept in memory only; lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: DashMap<Uuid, Game>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn save_game(&self, game: &Game) -> Result<(), StoreError> {
        self.games.insert(game.id, game.clone());
        Ok(())
    }

    fn get_game_by_id(&self, id: Uuid) -> Result<Option<Game>, StoreError> {
        Ok(self.games.get(&id).map(|game| game.clone()))
    }
}
