//! The session manager: one role state machine per process.
//!
//! ```text
//!              start_server            start_host
//!   ServerOnly <------------ Offline ------------> Host
//!        |     stop_server     ^  |    stop_host    |
//!        +---------------------+  |                 | loopback dropped
//!                                 | start_client    v
//!                   stop_client / | drop        ServerOnly
//!                 handshake fail  v
//!                             ClientOnly
//! ```
//!
//! Role changes happen under one lock. The only operation that waits on the
//! network without holding it is the client handshake, so a stop can always
//! cancel a pending connect. A generation counter tells a finishing
//! handshake whether it was overtaken by a stop.

use std::{net::SocketAddr, sync::Arc};

use parlor_server::{bootstrap::build_server, domain::Color, ui::ServerHandle};
use tokio::sync::{Mutex, oneshot};

use crate::{
    connection::{ClientConnection, ConnectionClosed},
    error::SessionError,
    mirror::{ParticipantView, RosterMirror, SharedMirror},
    presentation::{LifecycleEvent, PresentationSink},
    subscription::Subscription,
};

use super::{SessionConfig, SessionRole, config::loopback_url};

enum ClientSlot {
    Idle,
    /// Dropping `cancel` aborts the pending handshake
    Connecting {
        _cancel: oneshot::Sender<()>,
    },
    Connected {
        connection: ClientConnection,
        watcher: Subscription,
    },
}

struct SessionState {
    role: SessionRole,
    server: Option<ServerHandle>,
    client: ClientSlot,
    generation: u64,
}

/// Owns the process-wide [`SessionRole`].
///
/// Construct one per process and share it by `Arc`.
pub struct SessionManager {
    config: SessionConfig,
    sink: Arc<dyn PresentationSink>,
    mirror: SharedMirror,
    state: Arc<Mutex<SessionState>>,
}

impl SessionManager {
    pub fn new(config: SessionConfig, sink: Arc<dyn PresentationSink>) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            sink,
            mirror: RosterMirror::shared(),
            state: Arc::new(Mutex::new(SessionState {
                role: SessionRole::Offline,
                server: None,
                client: ClientSlot::Idle,
                generation: 0,
            })),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub async fn role(&self) -> SessionRole {
        self.state.lock().await.role
    }

    /// Address of the embedded server, if one is running
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.state
            .lock()
            .await
            .server
            .as_ref()
            .map(ServerHandle::local_addr)
    }

    /// Snapshot of the client-side roster mirror
    pub async fn roster(&self) -> Vec<ParticipantView> {
        self.mirror.lock().await.snapshot()
    }

    /// This process's own participant, once joined
    pub async fn me(&self) -> Option<ParticipantView> {
        self.mirror.lock().await.me().cloned()
    }

    /// `Offline -> ServerOnly`
    pub async fn start_server(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.role != SessionRole::Offline {
            let role = state.role;
            drop(state);
            return Err(self.fail(SessionError::AlreadyActive(role)));
        }

        let server = match self.bind().await {
            Ok(server) => server,
            Err(e) => {
                drop(state);
                return Err(self.fail(e));
            }
        };
        let addr = server.local_addr();
        state.server = Some(server);
        state.role = SessionRole::ServerOnly;
        drop(state);

        tracing::info!("Session role: {}", SessionRole::ServerOnly);
        self.sink
            .notify_lifecycle(LifecycleEvent::ServerStarted(addr));
        Ok(())
    }

    /// `Offline -> Host`: a server plus a local participant connected to it.
    pub async fn start_host(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.role != SessionRole::Offline {
            let role = state.role;
            drop(state);
            return Err(self.fail(SessionError::AlreadyActive(role)));
        }

        let server = match self.bind().await {
            Ok(server) => server,
            Err(e) => {
                drop(state);
                return Err(self.fail(e));
            }
        };
        let addr = server.local_addr();
        state.server = Some(server);
        state.role = SessionRole::Host;
        let (generation, cancel) = Self::begin_connecting(&mut state);
        drop(state);

        tracing::info!("Session role: {}", SessionRole::Host);
        self.sink
            .notify_lifecycle(LifecycleEvent::ServerStarted(addr));
        self.establish(loopback_url(addr), generation, cancel).await
    }

    /// `Offline -> ClientOnly`.
    ///
    /// The role changes before the handshake starts; a failed or timed-out
    /// handshake reverts it to `Offline`.
    pub async fn start_client(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.role != SessionRole::Offline {
            let role = state.role;
            drop(state);
            return Err(self.fail(SessionError::AlreadyActive(role)));
        }
        state.role = SessionRole::ClientOnly;
        let (generation, cancel) = Self::begin_connecting(&mut state);
        drop(state);

        tracing::info!("Session role: {}", SessionRole::ClientOnly);
        let url = self.config.server_url();
        self.sink
            .notify_system_message(&format!("Connecting to {}", url));
        self.establish(url, generation, cancel).await
    }

    pub async fn stop_client(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.role != SessionRole::ClientOnly {
            let role = state.role;
            drop(state);
            return Err(self.fail(SessionError::NotActive(role)));
        }
        let slot = Self::end_connection(&mut state);
        state.role = SessionRole::Offline;
        drop(state);

        for departed in self.release(slot).await {
            self.sink
                .notify_system_message(&format!("{} left", departed.name));
        }
        self.sink.notify_lifecycle(LifecycleEvent::Disconnected);
        Ok(())
    }

    pub async fn stop_server(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.role != SessionRole::ServerOnly {
            let role = state.role;
            drop(state);
            return Err(self.fail(SessionError::NotActive(role)));
        }
        let server = state.server.take();
        state.role = SessionRole::Offline;
        drop(state);

        self.shut_down(server).await;
        Ok(())
    }

    pub async fn stop_host(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.role != SessionRole::Host {
            let role = state.role;
            drop(state);
            return Err(self.fail(SessionError::NotActive(role)));
        }
        let slot = Self::end_connection(&mut state);
        let server = state.server.take();
        state.role = SessionRole::Offline;
        drop(state);

        // Stop the server first so the loopback participant is evicted with
        // everyone else
        self.shut_down(server).await;
        self.release(slot).await;
        self.sink.notify_lifecycle(LifecycleEvent::Disconnected);
        Ok(())
    }

    /// Stop whatever the current role is running
    pub async fn stop(&self) -> Result<(), SessionError> {
        match self.role().await {
            SessionRole::ClientOnly => self.stop_client().await,
            SessionRole::ServerOnly => self.stop_server().await,
            SessionRole::Host => self.stop_host().await,
            SessionRole::Offline => Err(self.fail(SessionError::NotActive(SessionRole::Offline))),
        }
    }

    /// Connect when offline, disconnect when a plain client
    pub async fn toggle_connection(&self) -> Result<(), SessionError> {
        match self.role().await {
            SessionRole::Offline => self.start_client().await,
            SessionRole::ClientOnly => self.stop_client().await,
            role => Err(self.fail(SessionError::AlreadyActive(role))),
        }
    }

    /// Send a chat message. Discarded without a connection.
    pub async fn submit(&self, text: &str) {
        match &self.state.lock().await.client {
            ClientSlot::Connected { connection, .. } => connection.submit(text),
            _ => tracing::debug!("Not connected, discarding message"),
        }
    }

    pub async fn rename(&self, name: &str) {
        match &self.state.lock().await.client {
            ClientSlot::Connected { connection, .. } => connection.rename(name),
            _ => tracing::debug!("Not connected, discarding rename"),
        }
    }

    pub async fn set_color(&self, color: Color) {
        match &self.state.lock().await.client {
            ClientSlot::Connected { connection, .. } => connection.set_color(color),
            _ => tracing::debug!("Not connected, discarding colour change"),
        }
    }

    async fn bind(&self) -> Result<ServerHandle, SessionError> {
        build_server(self.config.max_participants)
            .start(&self.config.listen_addr())
            .await
            .map_err(|e| SessionError::BindError(e.to_string()))
    }

    fn begin_connecting(state: &mut SessionState) -> (u64, oneshot::Receiver<()>) {
        let (cancel_tx, cancel) = oneshot::channel();
        state.generation += 1;
        state.client = ClientSlot::Connecting { _cancel: cancel_tx };
        (state.generation, cancel)
    }

    /// Detach the client slot; any pending handshake is cancelled.
    fn end_connection(state: &mut SessionState) -> ClientSlot {
        state.generation += 1;
        std::mem::replace(&mut state.client, ClientSlot::Idle)
    }

    /// Close the client connection and empty the mirror.
    ///
    /// Returns the other participants the mirror still knew about.
    async fn release(&self, slot: ClientSlot) -> Vec<ParticipantView> {
        if let ClientSlot::Connected {
            connection,
            watcher,
        } = slot
        {
            drop(watcher);
            connection.close().await;
        }
        self.mirror.lock().await.disband()
    }

    /// Stop the server, announcing every participant it evicted
    async fn shut_down(&self, server: Option<ServerHandle>) {
        if let Some(server) = server {
            let evicted = server.stop().await;
            tracing::info!("Evicted {} participants", evicted.len());
            for participant in &evicted {
                self.sink
                    .notify_system_message(&format!("{} left", participant.name));
            }
        }
        self.sink.notify_lifecycle(LifecycleEvent::ServerStopped);
    }

    /// Finish a connect started by `start_client` or `start_host`
    async fn establish(
        &self,
        url: String,
        generation: u64,
        cancel: oneshot::Receiver<()>,
    ) -> Result<(), SessionError> {
        let attempt = ClientConnection::connect(
            &url,
            self.config.handshake_timeout,
            self.sink.clone(),
            self.mirror.clone(),
        );
        let outcome = tokio::select! {
            outcome = attempt => outcome,
            _ = cancel => {
                return Err(SessionError::ConnectionFailed(
                    "connection attempt cancelled".to_string(),
                ));
            }
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            // A stop overtook the handshake
            drop(state);
            if let Ok((connection, _)) = outcome {
                connection.close().await;
                // The handshake filled the mirror after the stop emptied it,
                // unless a newer connect owns the mirror by now
                let state = self.state.lock().await;
                if matches!(state.client, ClientSlot::Idle) {
                    self.mirror.lock().await.clear();
                }
            }
            return Err(SessionError::ConnectionFailed(
                "connection attempt cancelled".to_string(),
            ));
        }

        match outcome {
            Ok((connection, closed)) => {
                let watcher = self.watch(closed, generation);
                state.client = ClientSlot::Connected {
                    connection,
                    watcher,
                };
                drop(state);
                self.sink.notify_lifecycle(LifecycleEvent::Connected);
                Ok(())
            }
            Err(e) => {
                state.client = ClientSlot::Idle;
                state.generation += 1;
                let server = match state.role {
                    SessionRole::Host => state.server.take(),
                    _ => None,
                };
                state.role = SessionRole::Offline;
                drop(state);

                self.mirror.lock().await.clear();
                self.sink.notify_connection_status(false);
                if server.is_some() {
                    self.shut_down(server).await;
                }
                Err(self.fail(SessionError::ConnectionFailed(e.to_string())))
            }
        }
    }

    /// Reacts to the server dropping an established connection
    fn watch(&self, closed: ConnectionClosed, generation: u64) -> Subscription {
        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);
        let mirror = Arc::clone(&self.mirror);

        Subscription::spawn(async move {
            // An error only means the reader was torn down
            let _ = closed.await;

            let mut state = state.lock().await;
            if state.generation != generation {
                return;
            }
            let slot = std::mem::replace(&mut state.client, ClientSlot::Idle);
            let ClientSlot::Connected {
                connection,
                watcher,
            } = slot
            else {
                state.client = slot;
                return;
            };
            // This task is the watcher; keep it alive to finish the cleanup
            watcher.detach();
            state.role = match state.role {
                SessionRole::Host => SessionRole::ServerOnly,
                _ => SessionRole::Offline,
            };
            let role = state.role;
            drop(state);

            tracing::warn!("Connection lost, session role now {}", role);
            drop(connection);
            mirror.lock().await.clear();
            sink.notify_lifecycle(LifecycleEvent::Disconnected);
        })
    }

    fn fail(&self, error: SessionError) -> SessionError {
        tracing::warn!("{}", error);
        self.sink.notify_error(&error.to_string());
        error
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        // The connection watcher holds the state, so break the cycle here
        if let Ok(mut state) = self.state.try_lock() {
            state.client = ClientSlot::Idle;
            state.server = None;
        }
    }
}
