//! Real-time session and notification engine for tratto, a multiplayer
//! draw-and-guess game.
//!
//! Layering follows the dependency direction `ui -> usecase -> domain`,
//! with `infrastructure` implementing the domain's port traits.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
