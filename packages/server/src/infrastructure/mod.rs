//! Infrastructure layer: handle registry, notification fan-out, guess
//! normalization, transport adapters, DTOs, and in-memory collaborators.

pub mod dispatcher;
pub mod dto;
pub mod guess;
pub mod inmemory;
pub mod notifier;
pub mod registry;

pub use dispatcher::{dispatch_to_all, dispatch_to_one, FailureKind, PrunedHandle};
pub use guess::NormalizingGuessValidator;
pub use registry::HandleRegistry;
