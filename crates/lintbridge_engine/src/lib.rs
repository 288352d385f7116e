//! # lintbridge_engine
//!
//! Engine capability contract for lintbridge.
//!
//! The editor-side core never links a CSS lint engine directly. It
//! resolves an installed engine package on disk and obtains a handle
//! through [`EngineLoader`]; the handle satisfies the fixed
//! [`LintEngine`] contract (`lint(options)` plus rule-metadata lookup).
//! How a filesystem path becomes a running engine is a loader detail —
//! this crate ships [`WasmEngineLoader`] for engines distributed as
//! Extism plugins (feature `native`, on by default).

mod error;
mod options;
mod result;

#[cfg(feature = "native")]
mod wasm;

pub use error::{EngineError, LoadError};
pub use options::{EngineConfig, LintOptions, OutputFormat};
pub use result::{
    FileResult, InvalidOptionWarning, LinterResult, RuleMetadata, Warning, WarningSeverity,
};
#[cfg(feature = "native")]
pub use wasm::{ENGINE_WASM_FILENAME, WasmEngineLoader};

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

/// A loaded lint engine.
#[async_trait]
pub trait LintEngine: Send + Sync {
    /// Lints the code described by `options` and returns the raw engine
    /// result.
    async fn lint(&self, options: &LintOptions) -> Result<LinterResult, EngineError>;

    /// Looks up metadata for a rule, if the engine publishes any.
    fn rule_metadata(&self, _rule: &str) -> Option<RuleMetadata> {
        None
    }
}

/// Loads engine instances from filesystem paths.
pub trait EngineLoader: Send + Sync {
    /// Attempts to load an engine from `path`.
    ///
    /// Returns `Ok(None)` when the target loads but does not expose a
    /// lint capability, and `Err` when the target cannot be loaded at
    /// all. Callers decide which of the two is fatal.
    fn load(&self, path: &Path) -> Result<Option<Arc<dyn LintEngine>>, LoadError>;
}
