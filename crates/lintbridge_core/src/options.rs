//! Invocation option construction.

use std::path::{Path, PathBuf};

use tower_lsp::lsp_types::Url;

use lintbridge_engine::LintOptions;

use crate::package_root::{PACKAGE_MANIFEST, find_package_root};
use crate::runner::RunnerOptions;

/// Project-level ignore file consulted by the engine.
pub const IGNORE_FILENAME: &str = ".csslintignore";

/// Placeholder replaced with the workspace folder in path-valued options.
const WORKSPACE_FOLDER_TOKEN: &str = "${workspaceFolder}";

/// Builds the final engine options for a document.
///
/// Override options supersede base options field by field; absent
/// override fields fall through to the base. Path-valued overrides
/// support the `${workspaceFolder}` placeholder when a workspace folder
/// is known, and a relative `config_basedir` is joined onto it. The
/// ignore path is derived from the document location independently of
/// the merge: documents inside the workspace always use the workspace
/// ignore file, documents outside it fall back to their package root
/// (or the filesystem root). Documents with no filesystem path are
/// returned merged but otherwise untouched.
pub async fn build_lint_options(
    uri: &Url,
    workspace_folder: Option<&Path>,
    base: &LintOptions,
    overrides: &RunnerOptions,
) -> LintOptions {
    let mut options = base.clone();

    if let Some(config) = &overrides.config {
        options.config = Some(config.clone());
    }

    if let Some(config_file) = &overrides.config_file {
        options.config_file = Some(substitute_workspace_folder(config_file, workspace_folder));
    }

    if let Some(config_basedir) = &overrides.config_basedir {
        options.config_basedir = Some(if config_basedir.is_absolute() {
            config_basedir.clone()
        } else {
            match workspace_folder {
                Some(folder) => folder.join(config_basedir),
                None => config_basedir.clone(),
            }
        });
    }

    if let Some(custom_syntax) = &overrides.custom_syntax {
        options.custom_syntax = Some(substitute_workspace_folder(custom_syntax, workspace_folder));
    }

    if let Some(ignore_disables) = overrides.ignore_disables {
        options.ignore_disables = Some(ignore_disables);
    }

    if let Some(report) = overrides.report_needless_disables {
        options.report_needless_disables = Some(report);
    }

    if let Some(report) = overrides.report_invalid_scope_disables {
        options.report_invalid_scope_disables = Some(report);
    }

    if let Some(report) = overrides.report_descriptionless_disables {
        options.report_descriptionless_disables = Some(report);
    }

    let Some(document_path) = file_path(uri) else {
        return options;
    };

    if let Some(folder) = workspace_folder {
        if document_path.starts_with(folder) {
            options.ignore_path = Some(folder.join(IGNORE_FILENAME));
        }
    }

    if options.ignore_path.is_none() {
        let root = find_package_root(&document_path, PACKAGE_MANIFEST)
            .await
            .unwrap_or_else(|| filesystem_root(&document_path));
        options.ignore_path = Some(root.join(IGNORE_FILENAME));
    }

    options
}

fn substitute_workspace_folder(value: &str, workspace_folder: Option<&Path>) -> String {
    match workspace_folder {
        Some(folder) => value.replace(WORKSPACE_FOLDER_TOKEN, &folder.to_string_lossy()),
        None => value.to_string(),
    }
}

fn file_path(uri: &Url) -> Option<PathBuf> {
    (uri.scheme() == "file")
        .then(|| uri.to_file_path().ok())
        .flatten()
}

/// The root component of a path (`/` on POSIX, the drive or UNC prefix
/// on Windows).
fn filesystem_root(path: &Path) -> PathBuf {
    path.ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintbridge_engine::EngineConfig;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;
    use tower_lsp::lsp_types::Url;

    fn base_options() -> LintOptions {
        LintOptions {
            config: Some(EngineConfig::default()),
            config_file: Some("/path/csslint.config.json".to_string()),
            config_basedir: Some(PathBuf::from("/path")),
            custom_syntax: Some("postcss-scss".to_string()),
            ignore_disables: Some(true),
            ignore_path: Some(PathBuf::from("/.csslintignore")),
            report_descriptionless_disables: Some(true),
            report_needless_disables: Some(true),
            report_invalid_scope_disables: Some(true),
            ..Default::default()
        }
    }

    fn override_options() -> RunnerOptions {
        RunnerOptions {
            config: Some(EngineConfig::empty_rules()),
            config_file: Some("/workspace/csslint.config.json".to_string()),
            config_basedir: Some(PathBuf::from("/workspace")),
            custom_syntax: Some("postcss-html".to_string()),
            ignore_disables: Some(false),
            report_descriptionless_disables: Some(false),
            report_needless_disables: Some(false),
            report_invalid_scope_disables: Some(false),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_options_sets_only_ignore_path() {
        let uri = Url::parse("file:///path/to/file.css").unwrap();
        let result = build_lint_options(
            &uri,
            Some(Path::new("/path")),
            &LintOptions::default(),
            &RunnerOptions::default(),
        )
        .await;

        assert_eq!(
            result,
            LintOptions {
                ignore_path: Some(PathBuf::from("/path/.csslintignore")),
                ..Default::default()
            }
        );
    }

    #[tokio::test]
    async fn test_workspace_ignore_path_overrides_existing() {
        let uri = Url::parse("file:///path/to/file.css").unwrap();
        let base = LintOptions {
            ignore_path: Some(PathBuf::from("/.csslintignore")),
            ..Default::default()
        };

        let result = build_lint_options(
            &uri,
            Some(Path::new("/path")),
            &base,
            &RunnerOptions::default(),
        )
        .await;

        assert_eq!(
            result.ignore_path,
            Some(PathBuf::from("/path/.csslintignore"))
        );
    }

    #[tokio::test]
    async fn test_preset_ignore_path_kept_when_document_outside_workspace() {
        let uri = Url::parse("file:///path/to/file.css").unwrap();
        let base = LintOptions {
            ignore_path: Some(PathBuf::from("/.csslintignore")),
            ..Default::default()
        };

        let result = build_lint_options(
            &uri,
            Some(Path::new("/workspace")),
            &base,
            &RunnerOptions::default(),
        )
        .await;

        assert_eq!(result.ignore_path, Some(PathBuf::from("/.csslintignore")));
    }

    #[tokio::test]
    async fn test_ignore_path_falls_back_to_package_root() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(PACKAGE_MANIFEST), "{}").unwrap();

        let uri = Url::from_file_path(nested.join("file.css")).unwrap();
        let result = build_lint_options(
            &uri,
            None,
            &LintOptions::default(),
            &RunnerOptions::default(),
        )
        .await;

        assert_eq!(
            result.ignore_path,
            Some(dir.path().join(IGNORE_FILENAME))
        );
    }

    #[tokio::test]
    async fn test_no_document_path_leaves_options_untouched() {
        let uri = Url::parse("untitled:Untitled-1").unwrap();
        let result = build_lint_options(
            &uri,
            Some(Path::new("/workspace")),
            &LintOptions::default(),
            &RunnerOptions::default(),
        )
        .await;

        assert_eq!(result, LintOptions::default());
    }

    #[tokio::test]
    async fn test_base_options_preserved_except_ignore_path() {
        let uri = Url::parse("file:///path/to/file.css").unwrap();
        let base = base_options();

        let result = build_lint_options(
            &uri,
            Some(Path::new("/path")),
            &base,
            &RunnerOptions::default(),
        )
        .await;

        assert_eq!(
            result,
            LintOptions {
                ignore_path: Some(PathBuf::from("/path/.csslintignore")),
                ..base
            }
        );
    }

    #[tokio::test]
    async fn test_override_options_supersede_base() {
        let uri = Url::parse("file:///workspace/file.css").unwrap();
        let base = base_options();
        let overrides = override_options();

        let result = build_lint_options(
            &uri,
            Some(Path::new("/workspace")),
            &base,
            &overrides,
        )
        .await;

        assert_eq!(result.config, overrides.config);
        assert_eq!(result.config_file, overrides.config_file);
        assert_eq!(result.config_basedir, overrides.config_basedir);
        assert_eq!(result.custom_syntax, overrides.custom_syntax);
        assert_eq!(result.ignore_disables, Some(false));
        assert_eq!(result.report_needless_disables, Some(false));
        assert_eq!(result.report_invalid_scope_disables, Some(false));
        assert_eq!(result.report_descriptionless_disables, Some(false));
    }

    #[tokio::test]
    async fn test_workspace_folder_token_replaced() {
        let uri = Url::parse("file:///workspace/file.css").unwrap();
        let overrides = RunnerOptions {
            config_file: Some("${workspaceFolder}/csslint.config.json".to_string()),
            custom_syntax: Some("${workspaceFolder}/postcss-html".to_string()),
            ..Default::default()
        };

        let result = build_lint_options(
            &uri,
            Some(Path::new("/workspace")),
            &LintOptions::default(),
            &overrides,
        )
        .await;

        assert_eq!(
            result.config_file,
            Some("/workspace/csslint.config.json".to_string())
        );
        assert_eq!(
            result.custom_syntax,
            Some("/workspace/postcss-html".to_string())
        );
    }

    #[tokio::test]
    async fn test_workspace_folder_token_kept_without_workspace() {
        let uri = Url::parse("file:///workspace/file.css").unwrap();
        let overrides = RunnerOptions {
            config_file: Some("${workspaceFolder}/csslint.config.json".to_string()),
            ..Default::default()
        };

        let result = build_lint_options(
            &uri,
            None,
            &LintOptions::default(),
            &overrides,
        )
        .await;

        assert_eq!(
            result.config_file,
            Some("${workspaceFolder}/csslint.config.json".to_string())
        );
    }

    #[tokio::test]
    async fn test_relative_config_basedir_joined_to_workspace() {
        let uri = Url::parse("file:///workspace/file.css").unwrap();
        let overrides = RunnerOptions {
            config_basedir: Some(PathBuf::from("./base")),
            ..Default::default()
        };

        let result = build_lint_options(
            &uri,
            Some(Path::new("/workspace")),
            &LintOptions::default(),
            &overrides,
        )
        .await;

        assert_eq!(result.config_basedir, Some(PathBuf::from("/workspace/./base")));
    }

    #[tokio::test]
    async fn test_relative_config_basedir_kept_without_workspace() {
        let uri = Url::parse("file:///workspace/file.css").unwrap();
        let overrides = RunnerOptions {
            config_basedir: Some(PathBuf::from("./base")),
            ..Default::default()
        };

        let result = build_lint_options(
            &uri,
            None,
            &LintOptions::default(),
            &overrides,
        )
        .await;

        assert_eq!(result.config_basedir, Some(PathBuf::from("./base")));
    }

    #[tokio::test]
    async fn test_absolute_config_basedir_untouched() {
        let uri = Url::parse("file:///workspace/file.css").unwrap();
        let overrides = RunnerOptions {
            config_basedir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        };

        let result = build_lint_options(
            &uri,
            Some(Path::new("/workspace")),
            &LintOptions::default(),
            &overrides,
        )
        .await;

        assert_eq!(result.config_basedir, Some(PathBuf::from("/elsewhere")));
    }

    #[test]
    fn test_filesystem_root() {
        assert_eq!(
            filesystem_root(Path::new("/path/to/file.css")),
            PathBuf::from("/")
        );
    }
}
