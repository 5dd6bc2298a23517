//! Request/response bodies for the HTTP surface.

use serde::{Deserialize, Serialize};

use crate::domain::game::{Phase, RoomSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub player_count: usize,
    pub phase: Phase,
    pub created_at: String,
}

impl From<&RoomSummary> for RoomSummaryDto {
    fn from(summary: &RoomSummary) -> Self {
        Self {
            id: summary.room_id.to_string(),
            player_count: summary.player_count,
            phase: summary.phase,
            created_at: tratto_shared::time::timestamp_to_rfc3339(summary.created_at_millis),
        }
    }
}

/// Host-initiated removal of a participant.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpelRequestDto {
    /// Connection key of the requesting host.
    pub requester_id: String,
    /// Display name of the player to remove.
    pub target_name: String,
    /// When true the removal is also announced as a ban.
    #[serde(default)]
    pub ban: bool,
}
