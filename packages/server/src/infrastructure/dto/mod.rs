//! Serde DTOs for the transport surfaces, kept apart from the domain model.

pub mod http;
pub mod websocket;

pub use http::{ExpelRequestDto, RoomSummaryDto};
pub use websocket::{ClientMessage, ServerMessage};
