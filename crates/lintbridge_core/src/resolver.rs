//! Engine package resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, warn};

use lintbridge_engine::{EngineLoader, LintEngine};

use crate::Document;
use crate::collaborators::{ErrorSink, LazyWorkspace};
use crate::error::ResolveError;
use crate::global_paths::{GlobalPathResolver, PackageManager};
use crate::node_resolve::resolve_package;
use crate::package_root::{PACKAGE_MANIFEST, find_package_root};
use crate::pnp::{PnpRuntime, YARN_LOCKFILE, find_pnp_loader};

/// Name of the engine package the resolver looks for.
pub const ENGINE_PACKAGE_NAME: &str = "csslint";

/// Options steering a single resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Explicit engine installation to use instead of the search chain.
    /// Failures here are fatal to the request.
    pub engine_path: Option<PathBuf>,

    /// Package manager whose global installs should be searched.
    pub package_manager: Option<PackageManager>,
}

/// A successfully resolved engine.
#[derive(Clone)]
pub struct ResolutionResult {
    /// The loaded engine capability.
    pub engine: Arc<dyn LintEngine>,

    /// Where the engine was loaded from.
    pub resolved_path: PathBuf,
}

/// Resolution strategies, in attempt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    ExplicitPath,
    PlugAndPlay,
    NodeModules,
}

impl ResolveStrategy {
    /// The fixed attempt order.
    pub const CHAIN: [ResolveStrategy; 3] =
        [Self::ExplicitPath, Self::PlugAndPlay, Self::NodeModules];
}

/// Outcome of one strategy attempt.
enum StrategyOutcome {
    Resolved(ResolutionResult),
    /// The strategy produced nothing; try the next one.
    Skipped,
}

/// Locates and loads the engine package.
///
/// Strategies run in [`ResolveStrategy::CHAIN`] order and the first
/// success wins. Only the explicit-path strategy can fail the whole
/// resolution; every other failure degrades to the next strategy.
pub struct EngineResolver {
    loader: Arc<dyn EngineLoader>,
    pnp: Arc<dyn PnpRuntime>,
    sink: Option<Arc<dyn ErrorSink>>,
    global_paths: GlobalPathResolver,
}

impl EngineResolver {
    pub fn new(
        loader: Arc<dyn EngineLoader>,
        pnp: Arc<dyn PnpRuntime>,
        sink: Option<Arc<dyn ErrorSink>>,
    ) -> Self {
        Self {
            loader,
            pnp,
            sink,
            global_paths: GlobalPathResolver::new(),
        }
    }

    /// Resolves the engine for `document`.
    ///
    /// `Ok(None)` means no engine was found anywhere; the caller decides
    /// how to surface that (linting is normally just skipped).
    pub async fn resolve(
        &self,
        options: &ResolverOptions,
        document: &Document,
        workspace: &LazyWorkspace<'_>,
    ) -> Result<Option<ResolutionResult>, ResolveError> {
        for strategy in ResolveStrategy::CHAIN {
            let outcome = match strategy {
                ResolveStrategy::ExplicitPath => {
                    self.from_explicit_path(options.engine_path.as_deref(), workspace)
                        .await?
                }
                ResolveStrategy::PlugAndPlay => self.from_pnp(document, workspace).await,
                ResolveStrategy::NodeModules => {
                    self.from_node_modules(document, workspace, options.package_manager)
                        .await
                }
            };

            if let StrategyOutcome::Resolved(result) = outcome {
                return Ok(Some(result));
            }
        }

        warn!("Failed to load the engine either globally or from the current workspace");
        Ok(None)
    }

    /// Logs an error and mirrors it to the user-visible error sink.
    fn report_error(&self, message: &str) {
        error!("{}", message);

        if let Some(sink) = &self.sink {
            sink.display_error(&format!("CSSLint: {}", message));
        }
    }

    /// The working directory for module resolution: the document's own
    /// directory when it has one, otherwise the workspace folder.
    async fn working_directory(
        &self,
        document: &Document,
        workspace: &LazyWorkspace<'_>,
    ) -> Option<PathBuf> {
        match document.fs_path() {
            Some(path) => path.parent().map(Path::to_path_buf),
            None => workspace.get().await.map(Path::to_path_buf),
        }
    }

    /// Strategy 1: a user-supplied path.
    ///
    /// Relative paths are joined onto the workspace folder when one is
    /// known. Load failures are fatal; a module without a lint
    /// capability is reported and skipped.
    async fn from_explicit_path(
        &self,
        engine_path: Option<&Path>,
        workspace: &LazyWorkspace<'_>,
    ) -> Result<StrategyOutcome, ResolveError> {
        let Some(engine_path) = engine_path else {
            return Ok(StrategyOutcome::Skipped);
        };

        let load_path = if engine_path.is_absolute() {
            engine_path.to_path_buf()
        } else {
            match workspace.get().await {
                Some(folder) => folder.join(engine_path),
                None => engine_path.to_path_buf(),
            }
        };

        let failure_message = format!(
            "Failed to load engine from \"engine_path\": {}.",
            load_path.display()
        );

        match self.loader.load(&load_path) {
            Ok(Some(engine)) => Ok(StrategyOutcome::Resolved(ResolutionResult {
                engine,
                resolved_path: load_path,
            })),
            Ok(None) => {
                self.report_error(&failure_message);
                Ok(StrategyOutcome::Skipped)
            }
            Err(source) => {
                self.report_error(&failure_message);
                Err(ResolveError::ExplicitPath {
                    path: load_path.display().to_string(),
                    source,
                })
            }
        }
    }

    /// Strategy 2: Yarn Plug'n'Play.
    ///
    /// Opportunistic; any failure at any step falls through to the next
    /// strategy.
    async fn from_pnp(&self, document: &Document, workspace: &LazyWorkspace<'_>) -> StrategyOutcome {
        let Some(cwd) = self.working_directory(document, workspace).await else {
            return StrategyOutcome::Skipped;
        };

        let Some(project_root) = find_package_root(&cwd, YARN_LOCKFILE).await else {
            debug!("Could not find a Yarn lockfile above {}", cwd.display());
            return StrategyOutcome::Skipped;
        };

        let Some(loader_path) = find_pnp_loader(&project_root).await else {
            return StrategyOutcome::Skipped;
        };

        if !self.pnp.is_active() {
            if let Err(e) = self.pnp.setup(&loader_path).await {
                warn!("Could not set up PnP from {}: {}", loader_path.display(), e);
                return StrategyOutcome::Skipped;
            }
        }

        let entry = match self.pnp.resolve(&loader_path, ENGINE_PACKAGE_NAME).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    "Could not resolve the engine using PnP from {}: {}",
                    project_root.display(),
                    e
                );
                return StrategyOutcome::Skipped;
            }
        };

        let Some(package_root) = find_package_root(&entry, PACKAGE_MANIFEST).await else {
            warn!(
                "Failed to find the engine package root above {}",
                entry.display()
            );
            return StrategyOutcome::Skipped;
        };

        match self.loader.load(&package_root) {
            Ok(Some(engine)) => {
                debug!("Resolved the engine using PnP at {}", loader_path.display());
                StrategyOutcome::Resolved(ResolutionResult {
                    engine,
                    resolved_path: package_root,
                })
            }
            Ok(None) => {
                self.report_error("engine.lint is not callable.");
                StrategyOutcome::Skipped
            }
            Err(e) => {
                warn!(
                    "Could not load the engine using PnP from {}: {}",
                    package_root.display(),
                    e
                );
                StrategyOutcome::Skipped
            }
        }
    }

    /// Strategy 3: standard `node_modules` lookup, local then global.
    async fn from_node_modules(
        &self,
        document: &Document,
        workspace: &LazyWorkspace<'_>,
        package_manager: Option<PackageManager>,
    ) -> StrategyOutcome {
        let global_root = match package_manager {
            Some(manager) => self.global_paths.resolve(manager).await,
            None => None,
        };

        let cwd = self.working_directory(document, workspace).await;

        let mut trace = |message: String| debug!("{}", message);
        let Some(package_path) = resolve_package(
            ENGINE_PACKAGE_NAME,
            global_root.as_deref(),
            cwd.as_deref(),
            &mut trace,
        )
        .await
        else {
            debug!("Could not find the engine package in node_modules");
            return StrategyOutcome::Skipped;
        };

        match self.loader.load(&package_path) {
            Ok(Some(engine)) => {
                debug!(
                    "Resolved the engine from node_modules at {}",
                    package_path.display()
                );
                StrategyOutcome::Resolved(ResolutionResult {
                    engine,
                    resolved_path: package_path,
                })
            }
            Ok(None) => {
                self.report_error("engine.lint is not callable.");
                StrategyOutcome::Skipped
            }
            Err(e) => {
                warn!("Could not load the engine from node_modules: {}", e);
                StrategyOutcome::Skipped
            }
        }
    }
}
