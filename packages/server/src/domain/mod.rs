//! Domain layer: validated values, the game model, the round state machine,
//! the session registry, and the port traits the engine depends on.

pub mod error;
pub mod game;
pub mod ports;
pub mod round;
pub mod session;
pub mod values;

pub use error::{CatalogError, DomainError, NotifyError, StoreError};
pub use game::{
    Difficulty, GameEvent, Phase, PlayerState, RoomConfig, RoomSummary, RoundStartedNotice,
    ScoreEntry, Song, SongHint, SongLanguage, Stroke,
};
pub use round::RoundStateMachine;
pub use session::SessionRegistry;
pub use values::{MessageContent, PlayerKey, PlayerName, RoomId};
