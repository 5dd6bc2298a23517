//! WebSocket-backed notifier adapters.
//!
//! Each connection owns an unbounded channel; the WebSocket handler drains
//! it into the socket. A closed channel means the connection task is gone,
//! which the adapters report as `NotifyError::Unreachable` so the owning
//! registry prunes the handle.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::error::NotifyError;
use crate::domain::game::{RoomSummary, RoundStartedNotice, ScoreEntry, Stroke};
use crate::domain::ports::{ChatNotifier, GameNotifier, LobbyNotifier};
use crate::domain::values::{PlayerName, RoomId};
use crate::infrastructure::dto::ServerMessage;

fn push(sender: &UnboundedSender<String>, message: &ServerMessage) -> Result<(), NotifyError> {
    let json =
        serde_json::to_string(message).map_err(|e| NotifyError::Unexpected(e.to_string()))?;
    sender
        .send(json)
        .map_err(|_| NotifyError::Unreachable("connection channel closed".to_string()))
}

pub struct WebSocketGameNotifier {
    sender: UnboundedSender<String>,
}

impl WebSocketGameNotifier {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl GameNotifier for WebSocketGameNotifier {
    async fn round_started(&self, notice: &RoundStartedNotice) -> Result<(), NotifyError> {
        push(&self.sender, &ServerMessage::from(notice))
    }

    async fn player_guessed(&self, name: &PlayerName, points: u32) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::PlayerGuessed {
                name: name.clone(),
                points,
            },
        )
    }

    async fn chat_message(&self, from: &PlayerName, text: &str) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::ChatMessage {
                from: from.clone(),
                text: text.to_string(),
            },
        )
    }

    async fn stroke_received(&self, stroke: &Stroke) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::Stroke {
                stroke: stroke.clone(),
            },
        )
    }

    async fn round_ended(&self, timed_out: bool) -> Result<(), NotifyError> {
        push(&self.sender, &ServerMessage::RoundEnded { timed_out })
    }

    async fn clear_canvas(&self) -> Result<(), NotifyError> {
        push(&self.sender, &ServerMessage::ClearCanvas)
    }

    async fn game_ended(&self, classification: &[ScoreEntry]) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::GameEnded {
                classification: classification.to_vec(),
            },
        )
    }

    async fn player_disconnected(&self, name: &PlayerName) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::PlayerDisconnected { name: name.clone() },
        )
    }
}

pub struct WebSocketChatNotifier {
    sender: UnboundedSender<String>,
}

impl WebSocketChatNotifier {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl ChatNotifier for WebSocketChatNotifier {
    async fn participant_joined(&self, name: &PlayerName) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::ParticipantJoined { name: name.clone() },
        )
    }

    async fn participant_left(&self, name: &PlayerName) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::ParticipantLeft { name: name.clone() },
        )
    }

    async fn member_list(&self, members: &[PlayerName]) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::MemberList {
                members: members.to_vec(),
            },
        )
    }

    async fn chat_message(&self, from: &PlayerName, text: &str) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::ChatMessage {
                from: from.clone(),
                text: text.to_string(),
            },
        )
    }
}

pub struct WebSocketLobbyNotifier {
    sender: UnboundedSender<String>,
}

impl WebSocketLobbyNotifier {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl LobbyNotifier for WebSocketLobbyNotifier {
    async fn room_list(&self, rooms: &[RoomSummary]) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::RoomList {
                rooms: rooms.to_vec(),
            },
        )
    }

    async fn room_updated(&self, room: &RoomSummary) -> Result<(), NotifyError> {
        push(&self.sender, &ServerMessage::RoomUpdated { room: room.clone() })
    }

    async fn room_cancelled(&self, room_id: &RoomId) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::RoomCancelled {
                room_id: room_id.clone(),
            },
        )
    }

    async fn participant_expelled(
        &self,
        room_id: &RoomId,
        name: &PlayerName,
    ) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::ParticipantExpelled {
                room_id: room_id.clone(),
                name: name.clone(),
            },
        )
    }

    async fn participant_banned(
        &self,
        room_id: &RoomId,
        name: &PlayerName,
    ) -> Result<(), NotifyError> {
        push(
            &self.sender,
            &ServerMessage::ParticipantBanned {
                room_id: room_id.clone(),
                name: name.clone(),
            },
        )
    }
}
