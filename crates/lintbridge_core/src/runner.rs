//! Lint execution orchestration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{Level, debug, info};

use lintbridge_engine::{EngineConfig, EngineError, EngineLoader, LintOptions, OutputFormat};

use crate::collaborators::{ErrorSink, LazyWorkspace, WorkspaceResolver};
use crate::document::Document;
use crate::drive_letter::normalize_drive_letter;
use crate::error::{InvalidOptionError, ResolveError};
use crate::global_paths::PackageManager;
use crate::normalize::{LintDiagnostics, process_linter_result};
use crate::options::build_lint_options;
use crate::pnp::PnpRuntime;
use crate::resolver::{EngineResolver, ResolverOptions};

/// Per-request options supplied by the editor.
///
/// Deserializes from the editor's camelCase settings object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunnerOptions {
    pub config: Option<EngineConfig>,
    pub config_basedir: Option<PathBuf>,
    pub config_file: Option<String>,
    pub custom_syntax: Option<String>,
    pub ignore_disables: Option<bool>,
    pub package_manager: Option<PackageManager>,
    pub report_descriptionless_disables: Option<bool>,
    pub report_invalid_scope_disables: Option<bool>,
    pub report_needless_disables: Option<bool>,
    /// Explicit engine installation to use instead of the search chain.
    pub engine_path: Option<PathBuf>,
}

/// Failures surfaced by [`LintRunner::lint_document`].
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    InvalidOptions(#[from] InvalidOptionError),

    #[error("Engine invocation failed: {0}")]
    Engine(#[from] EngineError),
}

/// Runs the engine against editor documents.
pub struct LintRunner {
    resolver: EngineResolver,
    workspace: Option<Arc<dyn WorkspaceResolver>>,
}

impl LintRunner {
    pub fn new(
        loader: Arc<dyn EngineLoader>,
        pnp: Arc<dyn PnpRuntime>,
        workspace: Option<Arc<dyn WorkspaceResolver>>,
        sink: Option<Arc<dyn ErrorSink>>,
    ) -> Self {
        Self {
            resolver: EngineResolver::new(loader, pnp, sink),
            workspace,
        }
    }

    /// Lints `document` and returns normalized diagnostics.
    ///
    /// A missing engine is not an error: the request is logged and an
    /// empty diagnostic set returned.
    pub async fn lint_document(
        &self,
        document: &Document,
        linter_options: &LintOptions,
        runner_options: &RunnerOptions,
    ) -> Result<LintDiagnostics, RunnerError> {
        let workspace_folder = match &self.workspace {
            Some(resolver) => resolver.workspace_folder(document).await,
            None => None,
        };

        let resolver_options = ResolverOptions {
            engine_path: runner_options.engine_path.clone(),
            package_manager: runner_options.package_manager,
        };

        let lazy = LazyWorkspace::resolved(document, workspace_folder.clone());
        let Some(resolution) = self
            .resolver
            .resolve(&resolver_options, document, &lazy)
            .await?
        else {
            info!("No engine found with which to lint {}", document.uri());
            return Ok(LintDiagnostics::default());
        };

        debug!("Using engine at {}", resolution.resolved_path.display());

        let code_filename = document.fs_path().map(|path| {
            let path = path.to_string_lossy().into_owned();
            if cfg!(windows) {
                normalize_drive_letter(&path)
            } else {
                path
            }
        });

        let mut options = build_lint_options(
            document.uri(),
            workspace_folder.as_deref(),
            linter_options,
            runner_options,
        )
        .await;

        options.code = Some(document.text().to_string());
        options.formatter = Some(OutputFormat::Quiet);

        match code_filename {
            Some(filename) => options.code_filename = Some(filename),
            None => {
                if !linter_options.has_rules() {
                    // Untitled documents have no path for config
                    // discovery; an empty rule table keeps the engine
                    // from refusing the invocation outright.
                    options.config = Some(EngineConfig::empty_rules());
                }
            }
        }

        if tracing::enabled!(Level::DEBUG) {
            let mut dump = options.clone();
            dump.code = Some("...".to_string());
            debug!("Running the engine with {:?}", dump);
        }

        let result = match resolution.engine.lint(&options).await {
            Ok(result) => result,
            Err(error) if is_recoverable_config_error(&error) => {
                // Check only CSS syntax, without applying any rules.
                debug!("Retrying with an empty rule table: {}", error);
                let mut retry_options = options.clone();
                retry_options.config = Some(EngineConfig::empty_rules());
                resolution.engine.lint(&retry_options).await?
            }
            Err(error) => return Err(error.into()),
        };

        Ok(process_linter_result(resolution.engine.as_ref(), result)?)
    }
}

/// Engine failures that warrant one syntax-only retry.
fn is_recoverable_config_error(error: &EngineError) -> bool {
    let message = error.to_string();
    message.starts_with("No configuration provided")
        || message.contains("No rules found within configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("No configuration provided for /workspace/file.css", true)]
    #[case("No rules found within configuration. Have you provided a \"rules\" property?", true)]
    #[case("config must be an object", false)]
    #[case("ENOENT: no such file or directory", false)]
    fn test_recoverable_config_errors(#[case] message: &str, #[case] recoverable: bool) {
        let error = EngineError::invocation(message);
        assert_eq!(is_recoverable_config_error(&error), recoverable);
    }

    #[test]
    fn test_runner_options_deserialize_camel_case() {
        let json = r#"{
            "configFile": "${workspaceFolder}/csslint.config.json",
            "packageManager": "yarn",
            "reportNeedlessDisables": true,
            "enginePath": "./tools/csslint"
        }"#;

        let options: RunnerOptions = serde_json::from_str(json).unwrap();

        assert_eq!(
            options.config_file.as_deref(),
            Some("${workspaceFolder}/csslint.config.json")
        );
        assert_eq!(options.package_manager, Some(PackageManager::Yarn));
        assert_eq!(options.report_needless_disables, Some(true));
        assert_eq!(options.engine_path, Some(PathBuf::from("./tools/csslint")));
    }
}
