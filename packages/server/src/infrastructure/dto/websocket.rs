//! Wire protocol for the WebSocket surface.
//!
//! Internally tagged JSON in both directions. Domain value types that
//! already carry serde derives (strokes, summaries, score entries) are
//! embedded directly; everything round-specific goes through
//! [`ServerMessage::from`] conversions so the drawer hint can never leak
//! to a guesser by accident.

use serde::{Deserialize, Serialize};

use crate::domain::game::{RoomSummary, RoundStartedNotice, ScoreEntry, SongHint, Stroke};
use crate::domain::values::{PlayerName, RoomId};

/// Messages pushed from the server to a connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    RoundStarted {
        round_index: u32,
        total_rounds: u32,
        round_seconds: u64,
        drawer_name: PlayerName,
        you_draw: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<SongHint>,
    },
    PlayerGuessed {
        name: PlayerName,
        points: u32,
    },
    ChatMessage {
        from: PlayerName,
        text: String,
    },
    Stroke {
        stroke: Stroke,
    },
    RoundEnded {
        timed_out: bool,
    },
    ClearCanvas,
    GameEnded {
        classification: Vec<ScoreEntry>,
    },
    PlayerDisconnected {
        name: PlayerName,
    },
    ParticipantJoined {
        name: PlayerName,
    },
    ParticipantLeft {
        name: PlayerName,
    },
    MemberList {
        members: Vec<PlayerName>,
    },
    RoomList {
        rooms: Vec<RoomSummary>,
    },
    RoomUpdated {
        room: RoomSummary,
    },
    RoomCancelled {
        room_id: RoomId,
    },
    ParticipantExpelled {
        room_id: RoomId,
        name: PlayerName,
    },
    ParticipantBanned {
        room_id: RoomId,
        name: PlayerName,
    },
    Error {
        message: String,
    },
}

impl From<&RoundStartedNotice> for ServerMessage {
    fn from(notice: &RoundStartedNotice) -> Self {
        Self::RoundStarted {
            round_index: notice.round_index,
            total_rounds: notice.total_rounds,
            round_seconds: notice.round_seconds,
            drawer_name: notice.drawer_name.clone(),
            you_draw: notice.you_draw,
            hint: notice.hint.clone(),
        }
    }
}

/// Messages a client may send over the WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    StartGame,
    Guess { text: String },
    Chat { text: String },
    Stroke { stroke: Stroke },
    Leave,
}
