//! Application layer for PostLab.
//!
//! This crate provides the orchestrators that coordinate between the domain
//! model and the infrastructure layer: the composer session and the
//! preference sync engine.

pub mod session;
pub mod sync_engine;

pub use session::{ComposerSession, DisplayedContent};
pub use sync_engine::PreferenceSyncEngine;
