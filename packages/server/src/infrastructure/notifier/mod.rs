//! Transport adapters implementing the notifier port traits.

pub mod websocket;

pub use websocket::{WebSocketChatNotifier, WebSocketGameNotifier, WebSocketLobbyNotifier};
