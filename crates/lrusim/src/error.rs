//! Error types for lrusim

use std::fmt;

/// Result type alias for lrusim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-input errors
///
/// A miss is never an error; it is reported through [`crate::Access`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be at least 1
    InvalidCapacity(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(n) => {
                write!(f, "Invalid capacity: {} (must be a positive integer)", n)
            }
        }
    }
}

impl std::error::Error for Error {}

/// A broken structural invariant, reported by `LruCache::check_invariants`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Create an error with the given description
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Description of the failed invariant
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violated: {}", self.0)
    }
}

impl std::error::Error for InvariantError {}
