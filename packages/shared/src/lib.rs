//! Cross-cutting utilities shared by the tratto binaries.
//!
//! Keeps logging setup and the clock abstraction out of the server crate so
//! that every binary initializes them the same way.

pub mod logger;
pub mod time;
