//! # lintbridge_core
//!
//! Core resolution and execution engine for lintbridge.
//!
//! This crate locates an installed CSS lint engine at runtime (explicit
//! path override, Yarn Plug'n'Play, local `node_modules`, per-package-
//! manager global installs), merges layered invocation options, runs
//! the engine, and normalizes its raw warnings into LSP diagnostics.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lintbridge_core::{Document, LintRunner, RunnerOptions, pnp::NodePnpRuntime};
//! use lintbridge_engine::WasmEngineLoader;
//!
//! let runner = LintRunner::new(
//!     Arc::new(WasmEngineLoader::new()),
//!     Arc::new(NodePnpRuntime::new(false)),
//!     None,
//!     None,
//! );
//!
//! let diagnostics = runner
//!     .lint_document(&document, &Default::default(), &RunnerOptions::default())
//!     .await?;
//! ```

mod collaborators;
mod disable_rules;
mod document;
pub mod drive_letter;
mod error;
mod global_paths;
mod node_resolve;
mod normalize;
mod options;
mod package_root;
pub mod pnp;
mod resolver;
mod runner;

pub use collaborators::{ErrorSink, LazyWorkspace, WorkspaceResolver};
pub use disable_rules::DisableReportRule;
pub use document::Document;
pub use error::{InvalidOptionError, PnpError, ResolveError};
pub use global_paths::{GlobalPathResolver, PackageManager};
pub use node_resolve::resolve_package;
pub use normalize::{DIAGNOSTIC_SOURCE, LintDiagnostics, process_linter_result, warning_to_diagnostic};
pub use options::{IGNORE_FILENAME, build_lint_options};
pub use package_root::{PACKAGE_MANIFEST, find_package_root};
pub use resolver::{
    ENGINE_PACKAGE_NAME, EngineResolver, ResolutionResult, ResolveStrategy, ResolverOptions,
};
pub use runner::{LintRunner, RunnerError, RunnerOptions};

pub use lintbridge_engine::{EngineConfig, LintOptions, OutputFormat};
