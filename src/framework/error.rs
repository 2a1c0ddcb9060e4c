//! # Toolkit Errors
//!
//! Every creation path (registry, builder, singleton) reports failures through the
//! single [`CreationError`] enum, so callers can match on one type no matter which
//! path they took.

use std::error::Error;
use std::sync::Arc;

/// Shared cause of a failed singleton initialization.
///
/// Wrapped in an `Arc` because every caller blocked on the same attempt receives
/// the same cause.
pub type InitCause = Arc<dyn Error + Send + Sync + 'static>;

/// Errors that can occur while creating objects through the toolkit.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CreationError {
    /// No producer is registered under the key, or the producer does not declare the role.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A producer is already registered under the key. Use `replace` to overwrite.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A producer or product carries a different theme than the family it was filed under.
    #[error("Theme mismatch: expected {expected}, found {found}")]
    ThemeMismatch { expected: String, found: String },

    /// The operation is not valid in the current lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A required builder slot was never filled.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A singleton slot already holds an instance of another type.
    #[error("Type mismatch for {identity}: requested {expected}")]
    TypeMismatch { identity: String, expected: &'static str },

    /// The singleton factory failed; the slot stays uninitialized.
    #[error("Initialization of {identity} failed: {source}")]
    Initialization {
        identity: String,
        #[source]
        source: InitCause,
    },
}

impl CreationError {
    /// Builds an [`CreationError::Initialization`] from any boxed cause.
    pub fn initialization(
        identity: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        CreationError::Initialization {
            identity: identity.into(),
            source: Arc::from(cause.into()),
        }
    }

    /// Returns true for errors produced by a failed singleton factory.
    pub fn is_initialization(&self) -> bool {
        matches!(self, CreationError::Initialization { .. })
    }
}

impl PartialEq for CreationError {
    fn eq(&self, other: &Self) -> bool {
        use CreationError::*;
        match (self, other) {
            (NotFound(a), NotFound(b)) => a == b,
            (DuplicateKey(a), DuplicateKey(b)) => a == b,
            (
                ThemeMismatch { expected: a, found: b },
                ThemeMismatch { expected: c, found: d },
            ) => a == c && b == d,
            (InvalidState(a), InvalidState(b)) => a == b,
            (MissingComponent(a), MissingComponent(b)) => a == b,
            (
                TypeMismatch { identity: a, expected: b },
                TypeMismatch { identity: c, expected: d },
            ) => a == c && b == d,
            // Two initialization errors are equal only when they share the same cause.
            (
                Initialization { identity: a, source: s1 },
                Initialization { identity: b, source: s2 },
            ) => a == b && Arc::ptr_eq(s1, s2),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_errors_share_cause() {
        let err = CreationError::initialization("Config", "disk unavailable");
        let copy = err.clone();
        assert_eq!(err, copy);
        assert!(err.is_initialization());
        assert_eq!(
            err.to_string(),
            "Initialization of Config failed: disk unavailable"
        );

        let other = CreationError::initialization("Config", "disk unavailable");
        assert_ne!(err, other);
    }

    #[test]
    fn test_source_is_exposed() {
        let err = CreationError::initialization("Config", "boom");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("boom"));
    }
}
