//! Outbound WebSocket connection to a Parlor server.

use std::{sync::Arc, time::Duration};

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use parlor_server::{
    domain::Color,
    infrastructure::dto::websocket::{ClientMessage, JoinAcceptedMessage, ServerMessage},
};
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::protocol::{CloseFrame, Message, frame::coding::CloseCode},
};

use crate::{
    error::ClientError,
    mirror::{RosterChange, RosterMirror, SharedMirror, parse_color},
    presentation::PresentationSink,
};

/// How long `close` waits for the server to acknowledge
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<Ws, Message>;
type WsReader = SplitStream<Ws>;

/// Resolves once the server side of the connection has gone away
pub type ConnectionClosed = oneshot::Receiver<()>;

/// A joined connection.
///
/// Incoming frames are rendered on the sink and folded into the roster
/// mirror by a reader task; outgoing frames are queued for a writer task.
#[derive(Debug)]
pub struct ClientConnection {
    connection_id: u64,
    outbound: Option<mpsc::UnboundedSender<ClientMessage>>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl ClientConnection {
    /// Connect to `url` and complete the join handshake within `timeout`.
    ///
    /// The mirror is reset from the handshake snapshot before this returns.
    pub async fn connect(
        url: &str,
        timeout: Duration,
        sink: Arc<dyn PresentationSink>,
        mirror: SharedMirror,
    ) -> Result<(Self, ConnectionClosed), ClientError> {
        tracing::info!("Connecting to {}", url);
        let (writer, reader, accepted) = tokio::time::timeout(timeout, handshake(url))
            .await
            .map_err(|_| ClientError::HandshakeTimeout(timeout))??;

        mirror.lock().await.reset(&accepted);
        tracing::info!(
            "Joined as {} (connection {})",
            accepted.name,
            accepted.connection_id
        );

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed) = oneshot::channel();

        let connection = Self {
            connection_id: accepted.connection_id,
            outbound: Some(outbound),
            writer: tokio::spawn(write_loop(outbound_rx, writer)),
            reader: tokio::spawn(read_loop(reader, sink, mirror, closed_tx)),
        };
        Ok((connection, closed))
    }

    pub fn connection_id(&self) -> u64 {
        self.connection_id
    }

    /// Queue a chat message. Blank input is dropped here already.
    pub fn submit(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.send(ClientMessage::chat(text));
    }

    pub fn rename(&self, name: &str) {
        self.send(ClientMessage::rename(name));
    }

    pub fn set_color(&self, color: Color) {
        self.send(ClientMessage::color(color.to_hex()));
    }

    fn send(&self, message: ClientMessage) {
        let delivered = self
            .outbound
            .as_ref()
            .is_some_and(|outbound| outbound.send(message).is_ok());
        if !delivered {
            tracing::debug!("Connection {} is closing, dropping frame", self.connection_id);
        }
    }

    /// Send a close frame and wait briefly for both tasks to finish.
    pub async fn close(mut self) {
        // Closing the queue makes the writer send the close frame
        self.outbound.take();

        if tokio::time::timeout(CLOSE_TIMEOUT, &mut self.writer)
            .await
            .is_err()
        {
            tracing::debug!("Writer of connection {} did not finish", self.connection_id);
        }
        if tokio::time::timeout(CLOSE_TIMEOUT, &mut self.reader)
            .await
            .is_err()
        {
            tracing::debug!("Server did not acknowledge close of {}", self.connection_id);
        }
    }
}

impl Drop for ClientConnection {
    fn drop(&mut self) {
        self.writer.abort();
        self.reader.abort();
    }
}

async fn handshake(url: &str) -> Result<(WsWriter, WsReader, JoinAcceptedMessage), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let (mut writer, mut reader) = ws_stream.split();

    let join = ClientMessage::join()
        .to_json()
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    writer
        .send(Message::Text(join.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    while let Some(frame) = reader.next().await {
        match frame {
            Ok(Message::Text(text)) => match ServerMessage::from_json(text.as_str()) {
                Ok(ServerMessage::JoinAccepted(accepted)) => return Ok((writer, reader, accepted)),
                Ok(ServerMessage::JoinRejected(rejected)) => {
                    return Err(ClientError::JoinRejected(rejected.reason));
                }
                Ok(other) => tracing::debug!("Ignoring {:?} before join-accepted", other),
                Err(e) => tracing::warn!("Dropping malformed frame: {}", e),
            },
            Ok(Message::Close(frame)) => {
                let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                return Err(ClientError::ConnectionError(format!(
                    "server closed the connection during the handshake ({})",
                    reason
                )));
            }
            Ok(_) => continue,
            Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
        }
    }

    Err(ClientError::ConnectionError(
        "connection closed during the handshake".to_string(),
    ))
}

async fn write_loop(mut outbound: mpsc::UnboundedReceiver<ClientMessage>, mut writer: WsWriter) {
    while let Some(message) = outbound.recv().await {
        let json = match message.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize message: {}", e);
                continue;
            }
        };
        if let Err(e) = writer.send(Message::Text(json.into())).await {
            tracing::warn!("Failed to send message: {}", e);
            return;
        }
    }

    let frame = CloseFrame {
        code: CloseCode::Normal,
        reason: "bye".into(),
    };
    if let Err(e) = writer.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

async fn read_loop(
    mut reader: WsReader,
    sink: Arc<dyn PresentationSink>,
    mirror: SharedMirror,
    closed: oneshot::Sender<()>,
) {
    while let Some(frame) = reader.next().await {
        match frame {
            Ok(Message::Text(text)) => match ServerMessage::from_json(text.as_str()) {
                Ok(message) => {
                    let mut mirror = mirror.lock().await;
                    present(&message, sink.as_ref(), &mut mirror);
                }
                Err(e) => tracing::warn!("Dropping malformed frame: {}", e),
            },
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                break;
            }
        }
    }

    // Nobody may be listening after an explicit close
    let _ = closed.send(());
}

/// Render one server frame and fold it into the mirror.
pub fn present(message: &ServerMessage, sink: &dyn PresentationSink, mirror: &mut RosterMirror) {
    match message {
        ServerMessage::ChatEvent(chat) => {
            sink.notify_message(&chat.sender_name, &chat.text, parse_color(&chat.color));
        }
        ServerMessage::RosterUpdate(update) => {
            let is_me = mirror.is_me(update.connection_id);
            match mirror.apply(update) {
                RosterChange::Joined(p) => sink.notify_system_message(&format!("{} joined", p.name)),
                RosterChange::Left(p) => sink.notify_system_message(&format!("{} left", p.name)),
                RosterChange::Renamed {
                    previous,
                    participant,
                } if is_me => sink.notify_system_message(&format!(
                    "You are now known as {} (was {})",
                    participant.name, previous
                )),
                RosterChange::Renamed {
                    previous,
                    participant,
                } => sink.notify_system_message(&format!(
                    "{} is now known as {}",
                    previous, participant.name
                )),
                RosterChange::Recolored(p) if is_me => {
                    sink.notify_system_message(&format!("Your colour is now {}", p.color));
                }
                RosterChange::Recolored(_) | RosterChange::Unchanged => {}
            }
        }
        ServerMessage::JoinAccepted(_) | ServerMessage::JoinRejected(_) => {
            tracing::debug!("Ignoring handshake frame after join");
        }
    }
}
