//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! Verbosity is controlled by `RUST_LOG`. The output uses the compact format and hides
//! the crate/module prefix (`with_target(false)`), since every event already carries a
//! `family`, `slot` or `identity` field saying which creation path emitted it.
//!
//! ## What Gets Traced
//!
//! - **Registry**: registrations, replacements, resolutions, per-role creation
//! - **Builder**: each component added, finalization, rejected late mutations
//! - **Singletons**: initializer start, waiters, materialization, failed attempts
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle events only
//! RUST_LOG=info cargo run
//!
//! # Every component and every resolve
//! RUST_LOG=debug cargo run
//!
//! # Only the singleton manager
//! RUST_LOG=creation_recipe::framework::singleton=debug cargo run
//! ```
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Registered family="MoneyBack" size=1
//! INFO Registered family="Titanium" size=2
//! INFO Registered family="Platinum" size=3
//! INFO card_issuing: Issued family="MoneyBack" products=2
//! INFO meal_ordering:create_custom_meal: Finalized components=3
//! INFO Operation log created
//! INFO Instance materialized identity=creation_recipe::services::operation_log::OperationLog attempt=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
