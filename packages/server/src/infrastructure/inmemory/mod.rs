//! In-memory implementations of the collaborator ports, used by the
//! standalone binary and by the integration tests.

pub mod catalog;
pub mod directory;
pub mod results;

pub use catalog::{InMemorySongCatalog, SongRecord};
pub use directory::{InMemoryRoomDirectory, RoomLifecycle};
pub use results::InMemoryClassificationStore;
