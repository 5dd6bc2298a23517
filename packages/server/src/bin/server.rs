//! tratto game server entry point.

use std::sync::Arc;

use clap::Parser;

use tratto_server::domain::session::SessionRegistry;
use tratto_server::infrastructure::guess::NormalizingGuessValidator;
use tratto_server::infrastructure::inmemory::{
    InMemoryClassificationStore, InMemoryRoomDirectory, InMemorySongCatalog,
};
use tratto_server::ui::{AppState, Server};
use tratto_server::usecase::{ChatRelay, GameSessionCoordinator, LobbyPublisher};
use tratto_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "tratto-server", about = "Multiplayer draw-and-guess game server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger("tratto-server", &args.log_level);

    // Collaborators
    let directory = Arc::new(InMemoryRoomDirectory::new());
    let catalog = Arc::new(InMemorySongCatalog::with_default_library());
    let validator = Arc::new(NormalizingGuessValidator::new());
    let results = Arc::new(InMemoryClassificationStore::new());

    // Usecases
    let coordinator = Arc::new(GameSessionCoordinator::new(
        directory, catalog, validator, results,
    ));
    let chat = Arc::new(ChatRelay::new());
    let lobby = Arc::new(LobbyPublisher::new());
    let sessions = Arc::new(SessionRegistry::new());

    let state = Arc::new(AppState {
        coordinator,
        chat,
        lobby,
        sessions,
    });

    if let Err(error) = Server::new(state).run(&args.host, args.port).await {
        tracing::error!(error = %error, "server terminated with an error");
        std::process::exit(1);
    }
}
