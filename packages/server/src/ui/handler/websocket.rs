//! WebSocket connection handlers.
//!
//! The gateway between the wire and the usecases: one connection per peer,
//! an mpsc channel for outbound fan-out, and a receive loop feeding inbound
//! events into dispatch. All peer-visible failure is absence of effect.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{PeerId, PeerIdFactory, PlaybackAction, Timestamp},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent, SessionStateDto},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Identity is per connection, generated here; peers never name themselves
    let peer_id = PeerIdFactory::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This function handles the outbound message flow: session events addressed
/// to this peer (via the rx channel) are sent to its WebSocket connection.
///
/// # Arguments
///
/// * `rx` - Channel receiver for messages addressed to this peer
/// * `sender` - WebSocket sink to send messages to this peer
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this peer
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, peer_id: PeerId) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the peer and deliver the full snapshot to it alone
    let snapshot = state
        .connect_peer_usecase
        .execute(peer_id.clone(), tx)
        .await;
    let count = snapshot.connected_peers;

    let state_msg = ServerEvent::SessionState(SessionStateDto::from(snapshot));
    let state_json = match serde_json::to_string(&state_msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize session state: {}", e);
            finish_disconnect(&state, &peer_id).await;
            return;
        }
    };
    if let Err(e) = sender.send(Message::Text(state_json.into())).await {
        tracing::error!(
            "Failed to send session state to '{}': {}",
            peer_id.as_str(),
            e
        );
        finish_disconnect(&state, &peer_id).await;
        return;
    }
    tracing::info!("Peer '{}' connected ({} online)", peer_id.as_str(), count);

    // Everyone learns the new count, the new peer included
    broadcast_user_joined(&state, count).await;

    let peer_id_clone = peer_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this peer
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_event(&state_clone, &peer_id_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Peer '{}' requested close", peer_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push session events out to this peer
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    finish_disconnect(&state, &peer_id).await;
}

/// Membership cleanup shared by the normal teardown and the failed-handshake
/// path: remove the peer, then tell the remaining peers the new count.
/// Counts are absolute values, so every receiver converges regardless of
/// which updates it saw before.
async fn finish_disconnect(state: &Arc<AppState>, peer_id: &PeerId) {
    let remaining = state.disconnect_peer_usecase.execute(peer_id).await;
    tracing::info!(
        "Peer '{}' disconnected ({} remaining)",
        peer_id.as_str(),
        remaining
    );

    let left_msg = ServerEvent::UserLeft { count: remaining };
    match serde_json::to_string(&left_msg) {
        Ok(json) => state.disconnect_peer_usecase.broadcast_all(&json).await,
        Err(e) => tracing::error!("Failed to serialize userLeft: {}", e),
    }
}

/// Parse and route one inbound frame.
///
/// Malformed frames (non-JSON, unknown `type`, missing fields such as a
/// seek without a time) are dropped here with a warning; nothing is echoed
/// back to the sender.
async fn handle_client_event(state: &Arc<AppState>, peer_id: &PeerId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Ignoring malformed event from '{}': {} ({})",
                peer_id.as_str(),
                e,
                text
            );
            return;
        }
    };

    match event {
        ClientEvent::Join => {
            // Registration happened at upgrade; re-entering the path is
            // idempotent. The requester gets a fresh snapshot and everyone
            // gets the count again.
            let snapshot = state.sync_session_usecase.execute().await;
            let count = snapshot.connected_peers;
            push_session_state(state, peer_id, snapshot).await;
            broadcast_user_joined(state, count).await;
        }
        ClientEvent::SyncRequest => {
            let snapshot = state.sync_session_usecase.execute().await;
            push_session_state(state, peer_id, snapshot).await;
        }
        ClientEvent::Play { timestamp } => {
            dispatch(state, PlaybackAction::Play, timestamp).await;
        }
        ClientEvent::Pause { timestamp } => {
            dispatch(state, PlaybackAction::Pause, timestamp).await;
        }
        ClientEvent::Seek { time, timestamp } => {
            dispatch(state, PlaybackAction::Seek { time }, timestamp).await;
        }
        ClientEvent::ChangeVideo { url, timestamp } => {
            dispatch(state, PlaybackAction::ChangeVideo { url }, timestamp).await;
        }
    }
}

/// Run an action through the dispatch usecase and fan the effect out to all
/// peers. A dropped action (stale, unextractable url) fans out nothing.
async fn dispatch(state: &Arc<AppState>, action: PlaybackAction, issued_at: i64) {
    let Some(effect) = state
        .dispatch_action_usecase
        .execute(action, Timestamp::new(issued_at))
        .await
    else {
        return;
    };

    let event = ServerEvent::from(effect);
    match serde_json::to_string(&event) {
        Ok(json) => state.dispatch_action_usecase.broadcast_all(&json).await,
        Err(e) => tracing::error!("Failed to serialize action effect: {}", e),
    }
}

async fn push_session_state(
    state: &Arc<AppState>,
    peer_id: &PeerId,
    snapshot: crate::domain::SessionSnapshot,
) {
    let msg = ServerEvent::SessionState(SessionStateDto::from(snapshot));
    match serde_json::to_string(&msg) {
        Ok(json) => state.sync_session_usecase.push_to(peer_id, &json).await,
        Err(e) => tracing::error!("Failed to serialize session state: {}", e),
    }
}

async fn broadcast_user_joined(state: &Arc<AppState>, count: usize) {
    let joined_msg = ServerEvent::UserJoined { count };
    match serde_json::to_string(&joined_msg) {
        Ok(json) => state.connect_peer_usecase.broadcast_all(&json).await,
        Err(e) => tracing::error!("Failed to serialize userJoined: {}", e),
    }
}
