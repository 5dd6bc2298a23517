//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::domain::session::SessionRegistry;
use crate::usecase::{ChatRelay, GameSessionCoordinator, LobbyPublisher};

pub struct AppState {
    pub coordinator: Arc<GameSessionCoordinator>,
    pub chat: Arc<ChatRelay>,
    pub lobby: Arc<LobbyPublisher>,
    pub sessions: Arc<SessionRegistry>,
}
