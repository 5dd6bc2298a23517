//! Port traits for external collaborators and remote notification handles.
//!
//! The engine depends on these contracts only; infrastructure provides the
//! implementations and the binary wires them together.

use async_trait::async_trait;

use crate::domain::error::{CatalogError, NotifyError, StoreError};
use crate::domain::game::{
    Difficulty, RoomConfig, RoomSummary, RoundStartedNotice, ScoreEntry, Song, SongLanguage,
    Stroke,
};
use crate::domain::values::{PlayerName, RoomId};

/// Authoritative room metadata owned by a subsystem outside this engine.
///
/// `room_configuration` may legitimately return `None` (room created with
/// defaults); callers fall back to `RoomConfig::default()`. The lifecycle
/// and disconnect callbacks are fire-and-forget from the engine's point of
/// view and must never make a game operation fail.
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn room_configuration(&self, room_id: &RoomId) -> Option<RoomConfig>;

    async fn mark_started(&self, room_id: &RoomId);

    async fn mark_finished(&self, room_id: &RoomId);

    /// A player left the room on purpose or their connection closed.
    async fn notify_player_disconnected(&self, room_id: &RoomId, name: &PlayerName);

    /// A player's notification handle failed and was pruned.
    async fn notify_unreachable_client(&self, room_id: &RoomId, name: &PlayerName);
}

/// Source of songs for the drawer to depict.
pub trait SongCatalog: Send + Sync {
    fn pick_song(
        &self,
        difficulty: Difficulty,
        language: SongLanguage,
    ) -> Result<Song, CatalogError>;

    fn song_by_id(&self, id: u32) -> Option<Song>;
}

/// Decides whether a submitted guess matches the current song title.
pub trait GuessValidator: Send + Sync {
    fn is_correct_guess(&self, submitted: &str, title: &str) -> bool;
}

/// Persists the final classification when a game ends.
#[async_trait]
pub trait ClassificationStore: Send + Sync {
    async fn persist_results(
        &self,
        room_id: &RoomId,
        results: &[ScoreEntry],
    ) -> Result<(), StoreError>;
}

/// Notification handle for a chat room member.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn participant_joined(&self, name: &PlayerName) -> Result<(), NotifyError>;

    async fn participant_left(&self, name: &PlayerName) -> Result<(), NotifyError>;

    async fn member_list(&self, members: &[PlayerName]) -> Result<(), NotifyError>;

    async fn chat_message(&self, from: &PlayerName, text: &str) -> Result<(), NotifyError>;
}

/// Notification handle for a player inside a game room.
#[async_trait]
pub trait GameNotifier: Send + Sync {
    async fn round_started(&self, notice: &RoundStartedNotice) -> Result<(), NotifyError>;

    async fn player_guessed(&self, name: &PlayerName, points: u32) -> Result<(), NotifyError>;

    async fn chat_message(&self, from: &PlayerName, text: &str) -> Result<(), NotifyError>;

    async fn stroke_received(&self, stroke: &Stroke) -> Result<(), NotifyError>;

    async fn round_ended(&self, timed_out: bool) -> Result<(), NotifyError>;

    async fn clear_canvas(&self) -> Result<(), NotifyError>;

    async fn game_ended(&self, classification: &[ScoreEntry]) -> Result<(), NotifyError>;

    async fn player_disconnected(&self, name: &PlayerName) -> Result<(), NotifyError>;
}

/// Notification handle for a lobby subscriber.
#[async_trait]
pub trait LobbyNotifier: Send + Sync {
    async fn room_list(&self, rooms: &[RoomSummary]) -> Result<(), NotifyError>;

    async fn room_updated(&self, room: &RoomSummary) -> Result<(), NotifyError>;

    async fn room_cancelled(&self, room_id: &RoomId) -> Result<(), NotifyError>;

    async fn participant_expelled(
        &self,
        room_id: &RoomId,
        name: &PlayerName,
    ) -> Result<(), NotifyError>;

    async fn participant_banned(
        &self,
        room_id: &RoomId,
        name: &PlayerName,
    ) -> Result<(), NotifyError>;
}
