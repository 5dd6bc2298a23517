//! Usecase-level error types.

use thiserror::Error;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub enum ChatRelayError {
    #[error("chat room '{0}' has no members")]
    RoomNotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
