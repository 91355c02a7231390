//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, GameInfo, PlacementRequest, PresetInfo, RoomStatus, ServerMessage};
use crate::room::{ConnectionId, GameRoom, RoomError};
use crate::store::{GameStore, MemoryStore};
use dashmap::mapref::one::{Ref, RefMut};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use words_core::{ConfigOverrides, Game, Point, Preset};

const DEFAULT_PRESET: &str = "standard";

/// Server state shared across all connections.
pub struct ServerState {
    /// Games held in memory, one lock per game
    pub rooms: DashMap<Uuid, GameRoom>,
    /// Mapping from connection ID to the game it is seated in
    pub connection_rooms: DashMap<ConnectionId, Uuid>,
    /// Mapping from connection ID to its message sender
    pub senders: DashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>,
    pub store: Arc<dyn GameStore>,
}

impl ServerState {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            rooms: DashMap::new(),
            connection_rooms: DashMap::new(),
            senders: DashMap::new(),
            store,
        }
    }

    /// Send a message to a specific connection.
    pub fn send_to(&self, conn: ConnectionId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&conn) {
            let _ = sender.send(msg);
        }
    }

    /// Send a message to every listed connection.
    pub fn send_to_all(&self, conns: &[ConnectionId], msg: ServerMessage) {
        for conn in conns {
            self.send_to(*conn, msg.clone());
        }
    }

    /// Send a message to every listed connection except one.
    pub fn send_to_all_except(&self, conns: &[ConnectionId], except: ConnectionId, msg: ServerMessage) {
        for conn in conns.iter().filter(|c| **c != except) {
            self.send_to(*conn, msg.clone());
        }
    }

    /// Get list of games waiting for players.
    pub fn waiting_games(&self) -> Vec<GameInfo> {
        self.rooms
            .iter()
            .filter(|r| r.status() == RoomStatus::Waiting)
            .map(|r| r.to_info())
            .collect()
    }

    /// Game the connection is seated in
    fn room_of(&self, conn: ConnectionId) -> Result<Uuid, RoomError> {
        self.connection_rooms
            .get(&conn)
            .map(|game_id| *game_id)
            .ok_or(RoomError::NotInGame)
    }

    fn room(&self, game_id: Uuid) -> Result<Ref<'_, Uuid, GameRoom>, RoomError> {
        self.rooms.get(&game_id).ok_or(RoomError::GameNotFound)
    }

    fn room_mut(&self, game_id: Uuid) -> Result<RefMut<'_, Uuid, GameRoom>, RoomError> {
        self.rooms.get_mut(&game_id).ok_or(RoomError::GameNotFound)
    }

    /// Bring a stored game into memory if it is not already there.
    fn ensure_loaded(&self, game_id: Uuid) -> Result<(), RoomError> {
        if self.rooms.contains_key(&game_id) {
            return Ok(());
        }

        let game = self
            .store
            .get_game_by_id(game_id)?
            .ok_or(RoomError::GameNotFound)?;
        info!(%game_id, "game loaded from store");
        self.rooms
            .entry(game_id)
            .or_insert_with(|| GameRoom::new(game));
        Ok(())
    }

    /// Write a game through to the store. A failed save is logged; the
    /// in-memory game stays authoritative. Callers pass a snapshot taken
    /// before releasing the room so no shard lock is held during I/O.
    fn save(&self, game: &Game) {
        if let Err(e) = self.store.save_game(game) {
            error!(game_id = %game.id, "Failed to save game: {}", e);
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Words server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let conn = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.senders.insert(conn, tx);

    let welcome = ServerMessage::Welcome { connection_id: conn };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text.into())).await?;

    // Forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(conn, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", conn, e);
                    state.send_to(
                        conn,
                        ServerMessage::Error {
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", conn);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to(conn, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", conn, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    handle_disconnect(conn, &state);
    state.senders.remove(&conn);
    send_task.abort();

    info!("Connection closed for {}", conn);
    Ok(())
}

/// Handle a client message. Failures are reported back to the sender only.
fn handle_message(conn: ConnectionId, msg: ClientMessage, state: &ServerState) {
    let result = match msg {
        ClientMessage::CreateGame {
            player_name,
            preset,
            overrides,
        } => create_game(conn, player_name, preset, overrides, state),

        ClientMessage::JoinGame {
            game_id,
            player_name,
        } => join_game(conn, game_id, player_name, state),

        ClientMessage::RejoinGame { game_id, player_id } => {
            rejoin_game(conn, game_id, player_id, state)
        }

        ClientMessage::LeaveGame => leave_game(conn, state),

        ClientMessage::StartGame => start_game(conn, state),

        ClientMessage::CheckWord { placement } => check_word(conn, &placement, state),

        ClientMessage::PlayWord { placement } => play_word(conn, &placement, state),

        ClientMessage::FindPlacements { x, y, word } => {
            find_placements(conn, Point::new(x, y), &word, state)
        }

        ClientMessage::Undo => undo(conn, state),

        ClientMessage::GetBoard { min, max } => get_board(conn, min, max, state),

        ClientMessage::Chat { message } => chat(conn, message, state),

        ClientMessage::ListGames => {
            let games = state.waiting_games();
            state.send_to(conn, ServerMessage::GameList { games });
            Ok(())
        }

        ClientMessage::ListPresets => {
            let presets = Preset::all()
                .into_iter()
                .map(|p| PresetInfo {
                    tile_count: p.config.tile_count(),
                    rack_size: p.config.rack_size,
                    id: p.id,
                    name: p.name,
                    description: p.description,
                })
                .collect();
            state.send_to(conn, ServerMessage::PresetList { presets });
            Ok(())
        }

        ClientMessage::Ping => {
            state.send_to(conn, ServerMessage::Pong);
            Ok(())
        }
    };

    if let Err(e) = result {
        debug!("Request from {} failed: {}", conn, e);
        state.send_to(
            conn,
            ServerMessage::Error {
                message: e.to_string(),
            },
        );
    }
}

fn turn_changed(room: &GameRoom) -> Option<ServerMessage> {
    room.game
        .current_player()
        .map(|p| ServerMessage::TurnChanged {
            player_id: p.id,
            round: room.game.round(),
        })
}

fn create_game(
    conn: ConnectionId,
    player_name: String,
    preset: Option<String>,
    overrides: ConfigOverrides,
    state: &ServerState,
) -> Result<(), RoomError> {
    let preset_id = preset.as_deref().unwrap_or(DEFAULT_PRESET);
    let preset =
        Preset::by_id(preset_id).ok_or_else(|| RoomError::UnknownPreset(preset_id.to_string()))?;

    leave_current(conn, state);

    let mut room = GameRoom::new(Game::new(preset.config.with_overrides(&overrides)?));
    let player_id = room.add_player(conn, player_name)?;
    // Not yet shared, so no lock is held here
    state.save(&room.game);

    let game_id = room.id;
    let game = room.to_info();
    state.rooms.insert(game_id, room);
    state.connection_rooms.insert(conn, game_id);
    info!(%game_id, preset = preset_id, "game created");

    state.send_to(conn, ServerMessage::GameCreated { game_id });
    state.send_to(conn, ServerMessage::JoinedGame { game, player_id });
    Ok(())
}

fn join_game(
    conn: ConnectionId,
    game_id: Uuid,
    player_name: String,
    state: &ServerState,
) -> Result<(), RoomError> {
    leave_current(conn, state);
    state.ensure_loaded(game_id)?;

    let mut room = state.room_mut(game_id)?;
    let player_id = room.add_player(conn, player_name)?;
    let snapshot = room.game.clone();
    state.connection_rooms.insert(conn, game_id);

    let game = room.to_info();
    let conns = room.connections();
    drop(room); // Release lock before saving and broadcasting
    state.save(&snapshot);

    state.send_to(
        conn,
        ServerMessage::JoinedGame {
            game: game.clone(),
            player_id,
        },
    );
    state.send_to_all_except(&conns, conn, ServerMessage::GameUpdated { game });
    Ok(())
}

fn rejoin_game(
    conn: ConnectionId,
    game_id: Uuid,
    player_id: Uuid,
    state: &ServerState,
) -> Result<(), RoomError> {
    leave_current(conn, state);
    state.ensure_loaded(game_id)?;

    let mut room = state.room_mut(game_id)?;
    room.rejoin(conn, player_id)?;
    let snapshot = room.game.clone();
    state.connection_rooms.insert(conn, game_id);
    info!(%game_id, %player_id, "player rejoined");

    let game = room.to_info();
    let conns = room.connections();
    let rack = room.game.is_started().then(|| room.rack(player_id));
    let turn = turn_changed(&room);
    drop(room);
    state.save(&snapshot);

    state.send_to(
        conn,
        ServerMessage::JoinedGame {
            game: game.clone(),
            player_id,
        },
    );
    if let Some(letters) = rack {
        state.send_to(conn, ServerMessage::Rack { letters });
    }
    if let Some(turn) = turn {
        state.send_to(conn, turn);
    }
    state.send_to_all_except(&conns, conn, ServerMessage::GameUpdated { game });
    Ok(())
}

fn leave_game(conn: ConnectionId, state: &ServerState) -> Result<(), RoomError> {
    let (_, game_id) = state
        .connection_rooms
        .remove(&conn)
        .ok_or(RoomError::NotInGame)?;

    let mut room = state.room_mut(game_id)?;
    let player_id = room.leave(conn)?;
    let snapshot = room.game.clone();
    debug!(%game_id, %player_id, "player left");

    let game = room.to_info();
    let conns = room.connections();
    drop(room);
    state.save(&snapshot);

    // Nobody is watching; the store keeps the game
    if state.rooms.remove_if(&game_id, |_, room| room.is_empty()).is_some() {
        info!(%game_id, "game unloaded");
        return Ok(());
    }

    state.send_to_all(&conns, ServerMessage::GameUpdated { game });
    Ok(())
}

/// Leave whatever game the connection is in, if any.
fn leave_current(conn: ConnectionId, state: &ServerState) {
    if state.connection_rooms.contains_key(&conn) {
        if let Err(e) = leave_game(conn, state) {
            warn!("Failed to leave game for {}: {}", conn, e);
        }
    }
}

fn start_game(conn: ConnectionId, state: &ServerState) -> Result<(), RoomError> {
    let game_id = state.room_of(conn)?;
    let mut room = state.room_mut(game_id)?;
    room.start(conn)?;
    let snapshot = room.game.clone();
    info!(%game_id, "game started");

    let game = room.to_info();
    let conns = room.connections();
    let racks = room.racks();
    let turn = turn_changed(&room);
    drop(room);
    state.save(&snapshot);

    state.send_to_all(&conns, ServerMessage::GameStarted { game });
    for (seat, letters) in racks {
        state.send_to(seat, ServerMessage::Rack { letters });
    }
    if let Some(turn) = turn {
        state.send_to_all(&conns, turn);
    }
    Ok(())
}

fn check_word(
    conn: ConnectionId,
    placement: &PlacementRequest,
    state: &ServerState,
) -> Result<(), RoomError> {
    let game_id = state.room_of(conn)?;
    let placement = state.room(game_id)?.check_word(conn, placement)?;
    state.send_to(conn, ServerMessage::WordChecked { placement });
    Ok(())
}

fn play_word(
    conn: ConnectionId,
    placement: &PlacementRequest,
    state: &ServerState,
) -> Result<(), RoomError> {
    let game_id = state.room_of(conn)?;
    let mut room = state.room_mut(game_id)?;
    let (player_id, placement) = room.play_word(conn, placement)?;
    let snapshot = room.game.clone();

    let game = room.to_info();
    let conns = room.connections();
    let letters = room.rack(player_id);
    let turn = turn_changed(&room);
    drop(room);
    state.save(&snapshot);

    state.send_to_all(
        &conns,
        ServerMessage::WordPlayed {
            player_id,
            placement,
        },
    );
    state.send_to(conn, ServerMessage::Rack { letters });
    state.send_to_all(&conns, ServerMessage::GameUpdated { game });
    if let Some(turn) = turn {
        state.send_to_all(&conns, turn);
    }
    Ok(())
}

fn find_placements(
    conn: ConnectionId,
    anchor: Point,
    word: &str,
    state: &ServerState,
) -> Result<(), RoomError> {
    let game_id = state.room_of(conn)?;
    let placements = state.room(game_id)?.find_placements(conn, anchor, word)?;
    state.send_to(conn, ServerMessage::Placements { placements });
    Ok(())
}

fn undo(conn: ConnectionId, state: &ServerState) -> Result<(), RoomError> {
    let game_id = state.room_of(conn)?;
    let mut room = state.room_mut(game_id)?;
    room.undo(conn)?;
    let snapshot = room.game.clone();
    info!(%game_id, "play undone");

    let game = room.to_info();
    let conns = room.connections();
    let racks = room.racks();
    let turn = turn_changed(&room);
    drop(room);
    state.save(&snapshot);

    state.send_to_all(&conns, ServerMessage::Undone { game });
    for (seat, letters) in racks {
        state.send_to(seat, ServerMessage::Rack { letters });
    }
    if let Some(turn) = turn {
        state.send_to_all(&conns, turn);
    }
    Ok(())
}

fn get_board(
    conn: ConnectionId,
    min: Option<Point>,
    max: Option<Point>,
    state: &ServerState,
) -> Result<(), RoomError> {
    let game_id = state.room_of(conn)?;
    let cells = state.room(game_id)?.board_view(min, max)?;
    state.send_to(conn, ServerMessage::Board { cells });
    Ok(())
}

fn chat(conn: ConnectionId, message: String, state: &ServerState) -> Result<(), RoomError> {
    let game_id = state.room_of(conn)?;
    let room = state.room(game_id)?;
    let player_name = room.player_name(conn).ok_or(RoomError::NotInGame)?;
    let conns = room.connections();
    drop(room);

    state.send_to_all(
        &conns,
        ServerMessage::ChatMessage {
            player_name,
            message,
        },
    );
    Ok(())
}

/// Handle player disconnect.
fn handle_disconnect(conn: ConnectionId, state: &ServerState) {
    leave_current(conn, state);
}
