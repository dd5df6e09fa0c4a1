//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    BroadcastDriftUseCase, ConnectPeerUseCase, DisconnectPeerUseCase, DispatchActionUseCase,
    SyncSessionUseCase,
};

use super::{
    drift::DriftBroadcaster,
    handler::{debug_session_state, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Watch-together sync server
///
/// This struct encapsulates the wired usecases and provides methods to run
/// the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_peer_usecase,
///     disconnect_peer_usecase,
///     dispatch_action_usecase,
///     sync_session_usecase,
///     broadcast_drift_usecase,
///     Duration::from_millis(5000),
/// );
/// server.run("127.0.0.1".to_string(), 3001).await?;
/// ```
pub struct Server {
    /// ConnectPeerUseCase（peer 接続のユースケース）
    connect_peer_usecase: Arc<ConnectPeerUseCase>,
    /// DisconnectPeerUseCase（peer 切断のユースケース）
    disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
    /// DispatchActionUseCase（再生アクション適用のユースケース）
    dispatch_action_usecase: Arc<DispatchActionUseCase>,
    /// SyncSessionUseCase（セッション状態取得のユースケース）
    sync_session_usecase: Arc<SyncSessionUseCase>,
    /// BroadcastDriftUseCase（ドリフト補正のユースケース）
    broadcast_drift_usecase: Arc<BroadcastDriftUseCase>,
    /// Interval between drift-correction broadcasts
    drift_interval: Duration,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_peer_usecase: Arc<ConnectPeerUseCase>,
        disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
        dispatch_action_usecase: Arc<DispatchActionUseCase>,
        sync_session_usecase: Arc<SyncSessionUseCase>,
        broadcast_drift_usecase: Arc<BroadcastDriftUseCase>,
        drift_interval: Duration,
    ) -> Self {
        Self {
            connect_peer_usecase,
            disconnect_peer_usecase,
            dispatch_action_usecase,
            sync_session_usecase,
            broadcast_drift_usecase,
            drift_interval,
        }
    }

    /// Build the axum router over this server's application state.
    ///
    /// Exposed separately from [`run`](Self::run) so integration tests can
    /// serve it on an ephemeral port.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            connect_peer_usecase: self.connect_peer_usecase.clone(),
            disconnect_peer_usecase: self.disconnect_peer_usecase.clone(),
            dispatch_action_usecase: self.dispatch_action_usecase.clone(),
            sync_session_usecase: self.sync_session_usecase.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/debug/session", get(debug_session_state))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the watch-together sync server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3001)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // The drift task lives exactly as long as the server
        let drift_broadcaster =
            DriftBroadcaster::spawn(self.broadcast_drift_usecase.clone(), self.drift_interval);

        // Start the server
        tracing::info!(
            "Watch-together sync server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        drift_broadcaster.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
