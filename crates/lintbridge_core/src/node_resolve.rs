//! Node-style package resolution.

use std::path::{Path, PathBuf};

use crate::package_root::PACKAGE_MANIFEST;

/// Resolves `package` the way Node's module lookup would: probe
/// `node_modules/<package>` in the working directory and each of its
/// ancestors, then fall back to the global root.
///
/// Every probe is reported through `trace`.
pub async fn resolve_package(
    package: &str,
    global_root: Option<&Path>,
    cwd: Option<&Path>,
    trace: &mut (dyn FnMut(String) + Send),
) -> Option<PathBuf> {
    if let Some(cwd) = cwd {
        for dir in cwd.ancestors() {
            let candidate = dir.join("node_modules").join(package);
            trace(format!("Probing {}", candidate.display()));

            if is_package_dir(&candidate).await {
                trace(format!("Resolved {} to {}", package, candidate.display()));
                return Some(candidate);
            }
        }
    }

    if let Some(root) = global_root {
        let candidate = root.join(package);
        trace(format!("Probing global install {}", candidate.display()));

        if is_package_dir(&candidate).await {
            trace(format!("Resolved {} to {}", package, candidate.display()));
            return Some(candidate);
        }
    }

    None
}

async fn is_package_dir(path: &Path) -> bool {
    tokio::fs::metadata(path.join(PACKAGE_MANIFEST))
        .await
        .is_ok_and(|m| m.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn install_package(root: &Path, package: &str) -> PathBuf {
        let dir = root.join("node_modules").join(package);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PACKAGE_MANIFEST), "{}").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_resolves_from_ancestor_node_modules() {
        let dir = tempdir().unwrap();
        let installed = install_package(dir.path(), "csslint");
        let nested = dir.path().join("src").join("styles");
        fs::create_dir_all(&nested).unwrap();

        let mut traces = Vec::new();
        let resolved =
            resolve_package("csslint", None, Some(&nested), &mut |m| traces.push(m)).await;

        assert_eq!(resolved, Some(installed));
        assert!(!traces.is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_global_root() {
        let project = tempdir().unwrap();
        let global = tempdir().unwrap();
        let installed = global.path().join("csslint");
        fs::create_dir_all(&installed).unwrap();
        fs::write(installed.join(PACKAGE_MANIFEST), "{}").unwrap();

        let resolved = resolve_package(
            "csslint",
            Some(global.path()),
            Some(project.path()),
            &mut |_| {},
        )
        .await;

        assert_eq!(resolved, Some(installed));
    }

    #[tokio::test]
    async fn test_local_install_wins_over_global() {
        let project = tempdir().unwrap();
        let global = tempdir().unwrap();
        let local = install_package(project.path(), "csslint");
        let global_install = global.path().join("csslint");
        fs::create_dir_all(&global_install).unwrap();
        fs::write(global_install.join(PACKAGE_MANIFEST), "{}").unwrap();

        let resolved = resolve_package(
            "csslint",
            Some(global.path()),
            Some(project.path()),
            &mut |_| {},
        )
        .await;

        assert_eq!(resolved, Some(local));
    }

    #[tokio::test]
    async fn test_unresolved_package() {
        let project = tempdir().unwrap();

        let resolved = resolve_package("csslint", None, Some(project.path()), &mut |_| {}).await;
        assert_eq!(resolved, None);
    }
}
