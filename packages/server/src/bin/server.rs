//! Watch-together session sync server.
//!
//! Keeps every connected peer locked to one shared video playback position,
//! with periodic drift correction while playing.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kotatsu-server
//! cargo run --bin kotatsu-server -- --host 0.0.0.0 --port 3001
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use clap::Parser;
use tokio::sync::Mutex;

use kotatsu_server::{
    domain::{Session, Timestamp},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    ui::Server,
    usecase::{
        BroadcastDriftUseCase, ConnectPeerUseCase, DisconnectPeerUseCase, DispatchActionUseCase,
        SyncSessionUseCase,
    },
};
use kotatsu_shared::{
    logger::setup_logger,
    time::{SystemClock, get_unix_timestamp},
};

#[derive(Parser, Debug)]
#[command(name = "kotatsu-server")]
#[command(about = "Watch-together sync server keeping peers on one shared playback position", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3001")]
    port: u16,

    /// Interval between drift-correction broadcasts, in milliseconds
    #[arg(long, default_value_t = 5000)]
    drift_interval_ms: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Clock
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (the single in-process session)
    let session = Arc::new(Mutex::new(Session::new(Timestamp::new(
        get_unix_timestamp(),
    ))));
    let repository = Arc::new(InMemorySessionRepository::new(session));

    // 2. Create MessagePusher (WebSocket implementation)
    let pusher_peers = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(pusher_peers));

    // 3. Create Clock (system wall clock)
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let connect_peer_usecase = Arc::new(ConnectPeerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let disconnect_peer_usecase = Arc::new(DisconnectPeerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let dispatch_action_usecase = Arc::new(DispatchActionUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let sync_session_usecase = Arc::new(SyncSessionUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let broadcast_drift_usecase = Arc::new(BroadcastDriftUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));

    // 5. Create and run the server
    let server = Server::new(
        connect_peer_usecase,
        disconnect_peer_usecase,
        dispatch_action_usecase,
        sync_session_usecase,
        broadcast_drift_usecase,
        Duration::from_millis(args.drift_interval_ms),
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
