//! Engine error types.

use thiserror::Error;

/// Errors raised by a lint engine invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected the invocation. Carries the engine's own
    /// message verbatim; callers match on it to detect recoverable
    /// configuration failures.
    #[error("{0}")]
    Invocation(String),

    /// The engine produced output that could not be decoded.
    #[error("Malformed engine response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl EngineError {
    /// Creates an invocation error.
    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation(message.into())
    }
}

/// Errors raised while loading an engine from a filesystem path.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The target could not be loaded.
    #[error("Failed to load engine: {0}")]
    Load(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Creates a load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }
}
