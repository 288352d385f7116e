//! Error taxonomy for resolution and execution.

use thiserror::Error;

use lintbridge_engine::{InvalidOptionWarning, LoadError};

/// Fatal resolution failures.
///
/// Only the explicit-path strategy produces these; every other strategy
/// degrades to a skipped attempt.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A user-supplied engine path could not be loaded. The user asked
    /// for this exact installation, so the failure must surface.
    #[error("Failed to load engine from \"engine_path\": {path}: {source}")]
    ExplicitPath {
        path: String,
        #[source]
        source: LoadError,
    },
}

/// Plug'n'Play setup or lookup failures. Never fatal to resolution.
#[derive(Debug, Error)]
pub enum PnpError {
    #[error("PnP setup failed: {0}")]
    Setup(String),

    #[error("PnP resolution failed: {0}")]
    Resolve(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised when the engine reports invalid rule options.
///
/// Never converted into ordinary diagnostics; the configuration is
/// wrong, not the code.
#[derive(Debug, Error)]
#[error("{}", .reasons.join("\n"))]
pub struct InvalidOptionError {
    /// One reason per invalid-option warning, in engine order.
    pub reasons: Vec<String>,
}

impl InvalidOptionError {
    /// Builds the error from the engine's invalid-option warnings.
    pub fn new(warnings: &[InvalidOptionWarning]) -> Self {
        Self {
            reasons: warnings.iter().map(|w| w.text.clone()).collect(),
        }
    }
}
