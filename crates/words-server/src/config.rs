//! Server settings read from the environment.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::store::{FileStore, GameStore, MemoryStore};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`SERVER_ADDR`)
    pub addr: SocketAddr,
    /// Where games are saved (`GAMES_DIR`); `None` keeps them in memory
    pub games_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = var("SERVER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("Invalid SERVER_ADDR {:?}", addr))?;

        let games_dir = match var("GAMES_DIR") {
            Some(dir) if dir.is_empty() => None,
            Some(dir) => Some(PathBuf::from(dir)),
            None => Some(std::env::temp_dir().join("words-games")),
        };

        Ok(Self { addr, games_dir })
    }

    pub fn store(&self) -> Arc<dyn GameStore> {
        match &self.games_dir {
            Some(dir) => Arc::new(FileStore::new(dir)),
            None => Arc::new(MemoryStore::new()),
        }
    }
}
