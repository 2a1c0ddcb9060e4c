//! Composition and observability.
//!
//! # Main Components
//!
//! - [`CreationSystem`] - Wires the registry, the restaurant director and the singleton manager
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod creation_system;
pub mod tracing;

pub use self::creation_system::*;
pub use self::tracing::*;
