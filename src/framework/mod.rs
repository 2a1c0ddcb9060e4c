//! Generic creation toolkit.
//!
//! This module provides the three creation paths. They do not depend on each other;
//! pick whichever fits the object being made.
//!
//! # Main Components
//!
//! - [`FactoryRegistry`] - Keyed [`FamilyProducer`]s that create themed product families
//! - [`BuilderPipeline`] - Accumulates components, then finalizes exactly once
//! - [`SingletonManager`] - At most one lazily created instance per [`SlotId`]
//! - [`AsyncSingletonManager`] - The same guarantee for tokio tasks
//! - [`CreationError`] - Common error type
//!
//! # Testing
//!
//! See [`mock`] module for scripted producers and call counters.

pub mod async_singleton;
pub mod builder;
pub mod error;
pub mod mock;
pub mod registry;
pub mod singleton;

// Re-export core types for convenience
pub use async_singleton::AsyncSingletonManager;
pub use builder::{Assemble, Assembly, BuilderPipeline, BuilderState, Director};
pub use error::{CreationError, InitCause};
pub use registry::{
    create_family, FactoryRegistry, FamilyProducer, FamilySet, SharedProducer, Themed,
};
pub use singleton::{global, SingletonManager, SlotId};
