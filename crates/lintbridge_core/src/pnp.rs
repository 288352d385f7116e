//! Yarn Plug'n'Play support.
//!
//! PnP projects have no `node_modules` tree; dependency lookup goes
//! through a generated loader file at the project root. This module
//! discovers that loader. Executing it is a host capability injected
//! through [`PnpRuntime`], so resolution stays testable without a Node
//! installation and the core reads no ambient process state.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::PnpError;

/// Lockfile marking a Yarn project root.
pub const YARN_LOCKFILE: &str = "yarn.lock";

/// Loader filenames, in preference order.
pub const PNP_LOADER_FILENAMES: [&str; 2] = [".pnp.cjs", ".pnp.js"];

/// Host capability for running a PnP loader.
#[async_trait]
pub trait PnpRuntime: Send + Sync {
    /// Whether PnP resolution is already active in the host process.
    /// When it is, the resolver skips the loader's setup routine.
    fn is_active(&self) -> bool;

    /// Runs the loader's setup routine.
    async fn setup(&self, loader: &Path) -> Result<(), PnpError>;

    /// Resolves `specifier` to a module entry path through the loader.
    async fn resolve(&self, loader: &Path, specifier: &str) -> Result<PathBuf, PnpError>;
}

/// Finds a PnP loader in `directory`, trying [`PNP_LOADER_FILENAMES`]
/// in order.
pub async fn find_pnp_loader(directory: &Path) -> Option<PathBuf> {
    for filename in PNP_LOADER_FILENAMES {
        let candidate = directory.join(filename);
        match tokio::fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => return Some(candidate),
            _ => debug!("Did not find PnP loader at {}", candidate.display()),
        }
    }

    debug!("Could not find a PnP loader in {}", directory.display());
    None
}

/// Runs PnP loaders through a `node` child process.
pub struct NodePnpRuntime {
    active: bool,
}

impl NodePnpRuntime {
    /// `active` reports whether the host already runs under PnP.
    pub fn new(active: bool) -> Self {
        Self { active }
    }
}

#[async_trait]
impl PnpRuntime for NodePnpRuntime {
    fn is_active(&self) -> bool {
        self.active
    }

    async fn setup(&self, loader: &Path) -> Result<(), PnpError> {
        let status = Command::new("node")
            .arg("-e")
            .arg("require(process.argv[1]).setup()")
            .arg(loader)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(PnpError::Setup(format!("loader exited with {}", status)))
        }
    }

    async fn resolve(&self, loader: &Path, specifier: &str) -> Result<PathBuf, PnpError> {
        let output = Command::new("node")
            .arg("-r")
            .arg(loader)
            .arg("-p")
            .arg(format!("require.resolve('{}')", specifier))
            .output()
            .await?;

        if !output.status.success() {
            return Err(PnpError::Resolve(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = stdout.trim();

        if path.is_empty() {
            return Err(PnpError::Resolve(format!(
                "empty resolution for {}",
                specifier
            )));
        }

        Ok(PathBuf::from(path))
    }
}

/// A [`PnpRuntime`] for hosts without Node; every operation fails
/// softly, which the resolver treats as a skipped strategy.
#[derive(Debug, Default)]
pub struct InactivePnp;

#[async_trait]
impl PnpRuntime for InactivePnp {
    fn is_active(&self) -> bool {
        false
    }

    async fn setup(&self, _loader: &Path) -> Result<(), PnpError> {
        Err(PnpError::Setup("no PnP runtime available".to_string()))
    }

    async fn resolve(&self, _loader: &Path, specifier: &str) -> Result<PathBuf, PnpError> {
        Err(PnpError::Resolve(format!(
            "no PnP runtime available to resolve {}",
            specifier
        )))
    }
}
