//! Global `node_modules` resolution per package manager.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] = [Self::Npm, Self::Yarn, Self::Pnpm];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Npm => 0,
            Self::Yarn => 1,
            Self::Pnpm => 2,
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queries a package manager for its global installation root.
#[async_trait]
trait GlobalRootQuery: Send + Sync {
    async fn global_root(&self, manager: PackageManager) -> Option<PathBuf>;
}

/// Shells out to the package manager CLI.
struct CommandQuery;

#[async_trait]
impl GlobalRootQuery for CommandQuery {
    async fn global_root(&self, manager: PackageManager) -> Option<PathBuf> {
        match manager {
            PackageManager::Npm => {
                let prefix = run(manager, &["config", "get", "prefix"]).await?;
                let prefix = PathBuf::from(prefix);

                // npm keeps global packages under <prefix>/lib on every
                // platform except Windows.
                Some(if cfg!(windows) {
                    prefix.join("node_modules")
                } else {
                    prefix.join("lib").join("node_modules")
                })
            }
            PackageManager::Yarn => {
                let dir = run(manager, &["global", "dir"]).await?;
                Some(PathBuf::from(dir).join("node_modules"))
            }
            PackageManager::Pnpm => run(manager, &["root", "-g"]).await.map(PathBuf::from),
        }
    }
}

/// Runs the manager's query command, returning trimmed stdout.
async fn run(manager: PackageManager, args: &[&str]) -> Option<String> {
    let output = match Command::new(manager.as_str()).args(args).output().await {
        Ok(output) => output,
        Err(e) => {
            debug!("Failed to spawn {}: {}", manager, e);
            return None;
        }
    };

    if !output.status.success() {
        debug!("{} {} exited with {}", manager, args.join(" "), output.status);
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let trimmed = stdout.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Resolves and caches the global `node_modules` directory for each
/// package manager.
///
/// Each manager's lookup runs at most once per resolver instance,
/// including under concurrent load: callers racing on the same key
/// coalesce on the pending lookup instead of spawning duplicates.
/// Failed lookups are cached as absent.
pub struct GlobalPathResolver {
    cache: [OnceCell<Option<PathBuf>>; 3],
    query: Arc<dyn GlobalRootQuery>,
}

impl GlobalPathResolver {
    pub fn new() -> Self {
        Self::with_query(Arc::new(CommandQuery))
    }

    fn with_query(query: Arc<dyn GlobalRootQuery>) -> Self {
        Self {
            cache: [OnceCell::new(), OnceCell::new(), OnceCell::new()],
            query,
        }
    }

    /// The global `node_modules` path for `manager`, or `None` when the
    /// lookup failed or the manager is not installed.
    pub async fn resolve(&self, manager: PackageManager) -> Option<PathBuf> {
        self.cache[manager.index()]
            .get_or_init(|| async {
                match self.query.global_root(manager).await {
                    Some(path) => {
                        debug!(
                            "Resolved global node_modules for {}: {}",
                            manager,
                            path.display()
                        );
                        Some(path)
                    }
                    None => {
                        warn!("Could not determine global node_modules path for {}", manager);
                        None
                    }
                }
            })
            .await
            .clone()
    }
}

impl Default for GlobalPathResolver {
    fn default() -> Self {
        Self::new()
    }
}
