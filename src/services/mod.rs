//! Process-wide services handed out through the singleton manager.

pub mod operation_log;

pub use operation_log::*;
