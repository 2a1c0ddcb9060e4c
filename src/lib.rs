#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Creation Recipe
//!
//! > **A Recipe for Object Creation and Lifecycle in Rust.**
//!
//! This crate packages the three creation-time concerns that keep showing up in
//! application code into one small toolkit:
//!
//! - **Families**: pick a concrete producer by key and create a consistent set of related products.
//! - **Builders**: accumulate parts over many calls, then finalize exactly once.
//! - **Singletons**: create one shared instance lazily, safely under concurrent first access.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Closed sets instead of class hierarchies
//! Concrete producers and products are enums (or trait impls) chosen at registration time.
//! `CardFactory::Platinum` can only ever produce Platinum things, and the registry checks it.
//!
//! ### One explicit initialization event
//! The singleton manager never exposes a mutable global. Callers ask for "the" instance and
//! the first one to arrive runs the factory; everyone else waits for that attempt's outcome.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Every path reports [`CreationError`](framework::CreationError). A failed singleton
//! initialization carries its cause in an `Arc`, so every waiter sees the same error.
//!
//! ### 2. Concurrency Model
//! - The registry is a `RwLock<HashMap>`; creation runs outside the lock.
//! - A builder is `&mut self` only: one construction per pipeline.
//! - Singleton slots are per-identity state machines guarded by a mutex and condvar
//!   (or a `watch` channel for the async manager).
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Key items**: [`FactoryRegistry`](framework::FactoryRegistry),
//!   [`BuilderPipeline`](framework::BuilderPipeline),
//!   [`SingletonManager`](framework::SingletonManager).
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`CreationSystem`](lifecycle::CreationSystem),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 3. The Domains ([`catalog`], [`kitchen`], [`services`])
//! Concrete products built with the recipe: credit cards and vehicles, meals, and the
//! process-wide operation log.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod catalog;
pub mod framework;
pub mod kitchen;
pub mod lifecycle;
pub mod services;
