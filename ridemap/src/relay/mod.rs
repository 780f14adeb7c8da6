//! Echo relay for real-time smoke tests.
//!
//! A small WebSocket server that lets a client check its socket plumbing:
//! it greets, echoes, and fans messages out to rooms. It carries no
//! application protocol.
//!
//! ```text
//! client                      relay
//!   | ---- handshake --------> |
//!   | <--- welcome {id} ------ |
//!   | ---- join {room} ------> |
//!   | <--- joined {room} ----- |
//!   | ---- broadcast --------> | ---> other members of room
//!   | ---- anything else ----> |
//!   | <--- echo {data} ------- |
//! ```

mod frame;

pub use frame::{
    RelayFrame, EVENT_BROADCAST, EVENT_ECHO, EVENT_ERROR, EVENT_JOIN, EVENT_JOINED, EVENT_WELCOME,
};

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Port used when the config does not name one.
pub const DEFAULT_RELAY_PORT: u16 = 3001;

/// Per-client outbound queue depth.
const OUTBOUND_QUEUE: usize = 256;

/// Errors from the relay server.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Failed to bind relay listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Relay I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

type ClientId = u64;

#[derive(Default)]
struct RelayState {
    next_id: AtomicU64,
    clients: DashMap<ClientId, mpsc::Sender<Message>>,
    rooms: DashMap<String, HashSet<ClientId>>,
}

impl RelayState {
    fn register(&self, tx: mpsc::Sender<Message>) -> ClientId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.clients.insert(id, tx);
        id
    }

    fn join(&self, id: ClientId, room: &str) {
        self.rooms.entry(room.to_string()).or_default().insert(id);
    }

    fn remove(&self, id: ClientId) {
        self.clients.remove(&id);
        self.rooms.retain(|_, members| {
            members.remove(&id);
            !members.is_empty()
        });
    }

    /// Queue `frame` for every member of `room` except `from`. Returns the
    /// number of recipients.
    fn broadcast(&self, from: ClientId, room: &str, frame: &RelayFrame) -> usize {
        let targets: Vec<ClientId> = match self.rooms.get(room) {
            Some(members) => members.iter().copied().filter(|id| *id != from).collect(),
            None => return 0,
        };

        let text = frame.to_json();
        let mut delivered = 0;
        for id in targets {
            let Some(tx) = self.clients.get(&id).map(|c| c.value().clone()) else {
                continue;
            };
            match tx.try_send(Message::Text(text.clone())) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(client = id, room, error = %e, "Dropped relay broadcast"),
            }
        }
        delivered
    }

    fn room_size(&self, room: &str) -> usize {
        self.rooms.get(room).map(|m| m.len()).unwrap_or(0)
    }
}

/// WebSocket echo/room server.
pub struct RelayServer {
    listener: TcpListener,
    state: Arc<RelayState>,
}

impl RelayServer {
    /// Bind the listener. Use port 0 to let the OS choose.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, RelayError> {
        let listener = TcpListener::bind(addr).await.map_err(RelayError::Bind)?;
        Ok(Self {
            listener,
            state: Arc::new(RelayState::default()),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.listener.local_addr()?)
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.state.clients.len()
    }

    /// Accept connections until `shutdown` is cancelled.
    ///
    /// Each connection runs on its own task and is closed when `shutdown`
    /// fires. Returns once every connection task has finished.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), RelayError> {
        let addr = self.local_addr()?;
        info!(%addr, "Relay listening");

        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Relay shutting down");
                    break;
                }

                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    reap(joined);
                }

                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "Relay accept failed");
                            continue;
                        }
                    };
                    let state = Arc::clone(&self.state);
                    let token = shutdown.child_token();
                    connections.spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, state, token).await {
                            debug!(%peer, error = %e, "Relay connection ended with error");
                        }
                    });
                }
            }
        }

        debug!(open = connections.len(), "Waiting for relay connections to close");
        while let Some(joined) = connections.join_next().await {
            reap(joined);
        }
        info!("Relay stopped");

        Ok(())
    }
}

fn reap(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "Relay connection task failed");
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<RelayState>,
    shutdown: CancellationToken,
) -> Result<(), RelayError> {
    let socket = tokio::select! {
        biased;
        _ = shutdown.cancelled() => return Ok(()),
        socket = tokio_tungstenite::accept_async(stream) => socket?,
    };
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);

    let writer = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let id = state.register(out_tx.clone());
    info!(client = id, %peer, "Relay client connected");

    let welcome = RelayFrame::new(EVENT_WELCOME, json!({ "id": id }));
    let _ = out_tx.send(Message::Text(welcome.to_json())).await;

    let result = loop {
        let msg = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break Ok(()),
            msg = ws_rx.next() => msg,
        };

        let text = match msg {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => break Ok(()),
            Some(Ok(_)) => continue,
            Some(Err(e)) => break Err(RelayError::from(e)),
        };

        let reply = match RelayFrame::parse(&text) {
            Ok(frame) => dispatch(&state, id, frame),
            Err(e) => Some(RelayFrame::new(
                EVENT_ERROR,
                json!({ "message": format!("Invalid frame: {e}") }),
            )),
        };

        if let Some(reply) = reply {
            if out_tx.send(Message::Text(reply.to_json())).await.is_err() {
                break Ok(());
            }
        }
    };

    state.remove(id);
    drop(out_tx);
    let _ = writer.await;
    info!(client = id, %peer, "Relay client disconnected");
    result
}

/// Apply one client frame; returns the reply for the sender, if any.
fn dispatch(state: &RelayState, id: ClientId, frame: RelayFrame) -> Option<RelayFrame> {
    match frame.event.as_str() {
        EVENT_JOIN => {
            let Some(room) = frame.room else {
                return Some(RelayFrame::new(
                    EVENT_ERROR,
                    json!({ "message": "join requires a room" }),
                ));
            };
            state.join(id, &room);
            debug!(client = id, room = %room, members = state.room_size(&room), "Joined room");
            Some(RelayFrame::new(EVENT_JOINED, json!({ "room": room })).in_room(room))
        }
        EVENT_BROADCAST => {
            let Some(room) = frame.room else {
                return Some(RelayFrame::new(
                    EVENT_ERROR,
                    json!({ "message": "broadcast requires a room" }),
                ));
            };
            let out = RelayFrame::new(EVENT_BROADCAST, frame.data).in_room(room.clone());
            let delivered = state.broadcast(id, &room, &out);
            debug!(client = id, room = %room, delivered, "Broadcast");
            None
        }
        _ => {
            let mut echo = RelayFrame::new(EVENT_ECHO, frame.data);
            echo.room = frame.room;
            Some(echo)
        }
    }
}
