//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{Color, ConnectionId},
    infrastructure::dto::websocket::{ClientMessage, RejectReason, ServerMessage},
    ui::{hub::HubHandle, state::AppState},
    usecase::JoinError,
};

/// How long a fresh socket may take to send its join request
const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

type WsSender = SplitSink<WebSocket, Message>;
type WsReceiver = SplitStream<WebSocket>;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let id = state.next_connection_id();
    ws.on_upgrade(move |socket| handle_socket(socket, state, id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// When the channel closes (the participant was evicted or left) a normal
/// close frame is sent before the task ends.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this connection
/// * `sender` - WebSocket sink of this connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: WsSender,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return;
            }
        }
        close(&mut sender, close_code::NORMAL, "session closed").await;
    })
}

async fn close(sender: &mut WsSender, code: u16, reason: &'static str) {
    let frame = CloseFrame {
        code,
        reason: Utf8Bytes::from_static(reason),
    };
    if let Err(e) = sender.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

async fn reject(sender: &mut WsSender, reason: RejectReason) {
    match ServerMessage::join_rejected(reason).to_json() {
        Ok(json) => {
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::debug!("Failed to send join-rejected: {}", e);
            }
        }
        Err(e) => tracing::error!("Failed to encode join-rejected: {}", e),
    }
}

/// Waits for the first meaningful frame and checks that it is a join request.
async fn await_join_request(receiver: &mut WsReceiver, id: ConnectionId) -> bool {
    let first_frame = async {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    return matches!(
                        ClientMessage::from_json(text.as_str()),
                        Ok(ClientMessage::Join(_))
                    );
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => continue,
                Ok(_) => return false,
                Err(e) => {
                    tracing::debug!("Connection {} failed before joining: {}", id, e);
                    return false;
                }
            }
        }
        false
    };

    match tokio::time::timeout(JOIN_TIMEOUT, first_frame).await {
        Ok(is_join) => is_join,
        Err(_) => {
            tracing::warn!("Connection {} did not join within {:?}", id, JOIN_TIMEOUT);
            false
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, id: ConnectionId) {
    let (mut sender, mut receiver) = socket.split();

    if !await_join_request(&mut receiver, id).await {
        tracing::warn!("Connection {} did not start with a join request", id);
        close(&mut sender, close_code::POLICY, "join required").await;
        return;
    }

    // Create a channel for this connection to receive frames
    let (tx, rx) = mpsc::unbounded_channel();

    match state.hub.join(id, tx).await {
        Ok(participant) => {
            tracing::info!("{} joined as connection {}", participant.name, id);
        }
        Err(JoinError::SessionFull { capacity }) => {
            tracing::warn!(
                "Session full (capacity: {}), rejecting connection {}",
                capacity,
                id
            );
            reject(&mut sender, RejectReason::SessionFull).await;
            close(&mut sender, close_code::AGAIN, "session full").await;
            return;
        }
        Err(JoinError::DuplicateConnection(_)) => {
            tracing::error!("Connection {} joined twice; dropping it", id);
            reject(&mut sender, RejectReason::Internal).await;
            close(&mut sender, close_code::ERROR, "duplicate connection").await;
            return;
        }
        Err(JoinError::Unavailable) => {
            tracing::info!("Server is stopping, rejecting connection {}", id);
            reject(&mut sender, RejectReason::Unavailable).await;
            close(&mut sender, close_code::AGAIN, "server stopping").await;
            return;
        }
    }

    // Frames from other participants (and our own echoes) go out through rx
    let mut send_task = pusher_loop(rx, sender);

    let hub = state.hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on connection {}: {}", id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => dispatch(&hub, id, text.as_str()),
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.hub.leave(id);
}

/// Forwards one client frame to the hub. Malformed frames are dropped.
fn dispatch(hub: &HubHandle, id: ConnectionId, text: &str) {
    match ClientMessage::from_json(text) {
        Ok(ClientMessage::Chat(msg)) => hub.submit(id, msg.text),
        Ok(ClientMessage::Rename(msg)) => hub.rename(id, msg.name),
        Ok(ClientMessage::Color(msg)) => match Color::from_hex(&msg.color) {
            Ok(color) => hub.set_color(id, color),
            Err(e) => tracing::warn!("Dropping colour request from {}: {}", id, e),
        },
        Ok(ClientMessage::Join(_)) => {
            tracing::warn!("Connection {} sent a second join request, ignoring", id);
        }
        Err(e) => tracing::warn!("Dropping malformed frame from {}: {}", id, e),
    }
}
