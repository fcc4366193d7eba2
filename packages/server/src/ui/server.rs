//! Server execution logic.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::{sync::oneshot, task::JoinHandle};
use tower_http::trace::TraceLayer;

use crate::{
    domain::Participant,
    usecase::{
        ChangeColorUseCase, GetRosterUseCase, JoinParticipantUseCase, LeaveParticipantUseCase,
        RenameParticipantUseCase, SubmitMessageUseCase,
    },
};

use super::{
    handler::{get_participant, get_participants, health_check, websocket_handler},
    hub::{Hub, HubHandle},
    signal::shutdown_signal,
    state::AppState,
};

/// How long `stop` waits for open connections to drain
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Every use case the server is wired with
pub struct ServerUseCases {
    pub join: Arc<JoinParticipantUseCase>,
    pub leave: Arc<LeaveParticipantUseCase>,
    pub submit: Arc<SubmitMessageUseCase>,
    pub rename: Arc<RenameParticipantUseCase>,
    pub change_color: Arc<ChangeColorUseCase>,
    pub roster: Arc<GetRosterUseCase>,
}

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = parlor_server::bootstrap::build_server(16);
/// let handle = server.start("127.0.0.1:7777").await?;
/// // ...
/// let evicted = handle.stop().await;
/// ```
pub struct Server {
    usecases: ServerUseCases,
}

impl Server {
    pub fn new(usecases: ServerUseCases) -> Self {
        Self { usecases }
    }

    /// Bind `addr` and start serving in the background.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound. Nothing
    /// is left running in that case.
    pub async fn start(self, addr: &str) -> Result<ServerHandle, ServerError> {
        let listener =
            tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|source| ServerError::Bind {
                    addr: addr.to_string(),
                    source,
                })?;
        let local_addr = listener.local_addr()?;

        let ServerUseCases {
            join,
            leave,
            submit,
            rename,
            change_color,
            roster,
        } = self.usecases;
        let (hub, hub_task) = Hub::new(join, leave, submit, rename, change_color).spawn();
        let app = router(Arc::new(AppState::new(hub.clone(), roster)));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let serve_task = tokio::spawn(async move {
            let shutdown = async {
                // A dropped sender also means stop
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!("Server error: {}", e);
            }
        });

        tracing::info!("WebSocket chat server listening on {}", local_addr);

        Ok(ServerHandle {
            local_addr,
            hub,
            hub_task,
            shutdown: Some(shutdown_tx),
            serve_task,
        })
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 7777)
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let handle = self.start(&format!("{}:{}", host, port)).await?;
        tracing::info!("Connect to: ws://{}/ws", handle.local_addr());
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        shutdown_signal().await;

        let evicted = handle.stop().await;
        tracing::info!(
            "Server shutdown complete ({} participants evicted)",
            evicted.len()
        );
        Ok(())
    }
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/participants", get(get_participants))
        .route("/api/participants/{connection_id}", get(get_participant))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A running server. Dropping the handle aborts the server tasks; call
/// [`ServerHandle::stop`] for an orderly shutdown.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    hub: HubHandle,
    hub_task: JoinHandle<()>,
    shutdown: Option<oneshot::Sender<()>>,
    serve_task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Evict every participant, then stop accepting connections.
    ///
    /// All participants are gone from the roster before this returns.
    pub async fn stop(mut self) -> Vec<Participant> {
        let evicted = self.hub.shutdown().await;
        if let Err(e) = (&mut self.hub_task).await {
            tracing::warn!("Hub task ended abnormally: {}", e);
        }

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut self.serve_task)
            .await
            .is_err()
        {
            tracing::warn!(
                "Connections still open after {:?}, aborting",
                SHUTDOWN_GRACE
            );
            self.serve_task.abort();
        }

        tracing::info!("Server on {} stopped", self.local_addr);
        evicted
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.serve_task.abort();
        self.hub_task.abort();
    }
}
