//! Package root discovery.

use std::path::{Path, PathBuf};

/// Marker file identifying a package root.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Finds the nearest ancestor directory of `start` containing `marker`.
///
/// Returns `None` when the filesystem root is reached without a match.
/// `start` may be a file path; the walk begins at its directory.
pub async fn find_package_root(start: &Path, marker: &str) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(marker);
        if tokio::fs::metadata(&candidate)
            .await
            .is_ok_and(|m| m.is_file())
        {
            return Some(dir.to_path_buf());
        }
    }

    None
}
