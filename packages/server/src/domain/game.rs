//! Core game model: room configuration, roster entries, songs, strokes,
//! and the events emitted by the round state machine.

use serde::{Deserialize, Serialize};

use crate::domain::values::{PlayerKey, PlayerName, RoomId};

/// Song difficulty tiers used when drawing from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        write!(f, "{label}")
    }
}

/// Song language filter for catalog selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SongLanguage {
    Italian,
    English,
    Any,
}

impl Default for SongLanguage {
    fn default() -> Self {
        Self::Any
    }
}

/// Timing and catalog parameters of a room.
///
/// Applied when the first round starts. When the room directory has no
/// configuration for a room, the defaults below are used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub round_seconds: u64,
    pub transition_seconds: u64,
    pub total_rounds: u32,
    pub difficulty: Difficulty,
    pub language: SongLanguage,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            round_seconds: 90,
            transition_seconds: 5,
            total_rounds: 3,
            difficulty: Difficulty::Medium,
            language: SongLanguage::Any,
        }
    }
}

/// A song the drawer must depict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: u32,
    pub title: String,
    pub artist: String,
    pub genre: String,
}

/// The hint shown to the drawer when a round starts. Never sent to guessers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongHint {
    pub title: String,
    pub artist: String,
    pub genre: String,
}

impl From<&Song> for SongHint {
    fn from(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            artist: song.artist.clone(),
            genre: song.genre.clone(),
        }
    }
}

/// A drawing increment relayed verbatim from the drawer to the guessers.
///
/// The engine never interprets the geometry; `clear_all` wipes the canvas
/// and `erase` switches the tool semantics on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points_x: Vec<f32>,
    pub points_y: Vec<f32>,
    pub color_hex: String,
    pub thickness: f32,
    #[serde(default)]
    pub erase: bool,
    #[serde(default)]
    pub clear_all: bool,
}

/// Room lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    RoundActive,
    RoundTransition,
    Finished,
}

/// A roster entry tracked by the round state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub key: PlayerKey,
    pub name: PlayerName,
    pub host: bool,
    pub drawer: bool,
    pub score: u32,
    pub guessed_current_round: bool,
}

/// One row of the final classification, ranked by score, ties broken by
/// join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub key: PlayerKey,
    pub name: PlayerName,
    pub score: u32,
    pub winner: bool,
}

/// The payload delivered to each client when a round starts.
///
/// Built per recipient by the coordinator: only the drawer receives the
/// song hint and `you_draw = true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStartedNotice {
    pub round_index: u32,
    pub total_rounds: u32,
    pub round_seconds: u64,
    pub drawer_name: PlayerName,
    pub you_draw: bool,
    pub hint: Option<SongHint>,
}

/// Events emitted by the round state machine for the coordinator to
/// translate into notifications.
///
/// The `generation` fields on `RoundStarted` and `RoundEnded` are internal
/// scheduling tokens for the round and transition timers; they are never
/// put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted {
        round_index: u32,
        total_rounds: u32,
        round_seconds: u64,
        drawer: PlayerKey,
        drawer_name: PlayerName,
        song: Song,
        generation: u64,
    },
    PlayerGuessed {
        name: PlayerName,
        points: u32,
    },
    ChatMessage {
        name: PlayerName,
        text: String,
    },
    StrokeReceived {
        from: PlayerKey,
        stroke: Stroke,
    },
    RoundEnded {
        timed_out: bool,
        transition_seconds: u64,
        generation: u64,
    },
    ClearCanvas,
    GameEnded {
        classification: Vec<ScoreEntry>,
    },
    PlayerDisconnected {
        name: PlayerName,
    },
}

/// Public summary of a room for lobby listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub player_count: usize,
    pub phase: Phase,
    pub created_at_millis: i64,
}
