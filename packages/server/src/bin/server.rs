//! Lobby coordination server for a turn-based multiplayer board game.
//!
//! Holds the authoritative room state, serializes mutations per room and
//! fans out change signals to subscribed WebSocket connections.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin machiai-server
//! cargo run --bin machiai-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin machiai-server -- --user-directory-url http://localhost:4000
//! ```

use std::sync::Arc;

use clap::Parser;

use machiai_server::{
    domain::UserDirectory,
    infrastructure::{
        FixedUserDirectory, HttpUserDirectory, InMemoryRoomRegistry, SessionTracker,
        WebSocketBroadcaster,
    },
    ui::{Server, state::AppState},
    usecase::{
        CreateRoomUseCase, DeleteRoomUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        TransferHostUseCase, UpdateStatusUseCase,
    },
};
use machiai_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "machiai-server")]
#[command(about = "Lobby coordination server for a turn-based board game", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Base URL of the external user directory API.
    /// When omitted, profiles are synthesized locally.
    #[arg(long)]
    user_directory_url: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. Broadcaster / SessionTracker
    // 3. Directory
    // 4. UseCases
    // 5. AppState
    // 6. Server

    // 1. Create Registry (in-memory room arena)
    let registry = Arc::new(InMemoryRoomRegistry::new(Arc::new(SystemClock)));

    // 2. Create Broadcaster and SessionTracker
    let broadcaster = Arc::new(WebSocketBroadcaster::new());
    let session_tracker = Arc::new(SessionTracker::new());

    // 3. Create Directory
    let directory: Arc<dyn UserDirectory> = match &args.user_directory_url {
        Some(url) => {
            tracing::info!("Using user directory at {}", url);
            Arc::new(HttpUserDirectory::new(url.clone()))
        }
        None => {
            tracing::info!("No user directory configured, synthesizing profiles locally");
            Arc::new(FixedUserDirectory::new())
        }
    };

    // 4. Create UseCases
    let create_room_usecase = Arc::new(CreateRoomUseCase::new(
        registry.clone(),
        broadcaster.clone(),
        directory.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        broadcaster.clone(),
        directory.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let delete_room_usecase = Arc::new(DeleteRoomUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let update_status_usecase = Arc::new(UpdateStatusUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let transfer_host_usecase = Arc::new(TransferHostUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));

    // 5. Create AppState
    let app_state = Arc::new(AppState {
        create_room_usecase,
        join_room_usecase,
        leave_room_usecase,
        delete_room_usecase,
        update_status_usecase,
        transfer_host_usecase,
        get_rooms_usecase,
        session_tracker,
        broadcaster,
        directory,
    });

    // 6. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
