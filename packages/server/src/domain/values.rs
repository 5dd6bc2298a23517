//! Validated value objects for the game domain.
//!
//! Constructors reject blank or oversized input so the rest of the engine
//! can rely on well-formed identifiers without re-checking.

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

const MAX_ROOM_ID_LENGTH: usize = 64;
const MAX_PLAYER_NAME_LENGTH: usize = 32;
const MAX_MESSAGE_LENGTH: usize = 500;

/// Identifier of a game room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput(
                "room id must not be blank".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_ROOM_ID_LENGTH {
            return Err(DomainError::InvalidInput(format!(
                "room id must be at most {} characters",
                MAX_ROOM_ID_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque per-connection key identifying a player inside a room.
///
/// Keys are minted by the transport layer (one per connection), so a
/// reconnecting player arrives with a fresh key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey(String);

impl PlayerKey {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "player key must not be blank".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput(
                "player name must not be blank".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_PLAYER_NAME_LENGTH {
            return Err(DomainError::InvalidInput(format!(
                "player name must be at most {} characters",
                MAX_PLAYER_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-blank, length-bounded chat message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "message must not be blank".to_string(),
            ));
        }
        if value.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(DomainError::InvalidInput(format!(
                "message must be at most {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
