//! Domain-level error types.

use thiserror::Error;

/// Errors raised by domain value objects and the round state machine.
///
/// `InvalidInput` is the only variant that is surfaced to the calling client
/// as a client fault; everything else is converted to a generic operation
/// failure at the usecase boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The caller supplied a blank, missing, or malformed argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation is not allowed in the room's current phase.
    #[error("operation not allowed in the current game phase")]
    WrongPhase,

    /// The referenced player is not part of the room roster.
    #[error("player '{0}' is not part of the room")]
    UnknownPlayer(String),

    /// The room has finished and accepts no further operations.
    #[error("room '{0}' has already finished")]
    RoomFinished(String),

    /// Anything else. Logged at error level, never exposes internals.
    #[error("operation failed: {0}")]
    Internal(String),
}

/// Errors reported by the song catalog collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no song available for the requested difficulty/language")]
    NoSongAvailable,
}

/// Errors reported by the classification store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist results: {0}")]
    PersistFailed(String),
}

/// Failure raised by a remote notification handle.
///
/// The transport adapter classifies every delivery failure into one of these
/// two buckets; the dispatcher switches on them to pick log severity. Both
/// lead to the handle being pruned.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The peer's channel is closed, timed out, or otherwise gone.
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    /// Any other failure during delivery. Pruned fail-safe, logged louder.
    #[error("unexpected notification failure: {0}")]
    Unexpected(String),
}
