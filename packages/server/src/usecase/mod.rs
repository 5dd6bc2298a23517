//! Usecase layer: chat relay, lobby publishing, and game orchestration.

pub mod chat;
pub mod coordinator;
pub mod error;
pub mod lobby;

pub use chat::ChatRelay;
pub use coordinator::GameSessionCoordinator;
pub use error::{ChatRelayError, GameError};
pub use lobby::{LobbyPublisher, SubscriptionId};
