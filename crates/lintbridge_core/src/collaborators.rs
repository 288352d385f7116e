//! Editor collaborator capabilities.
//!
//! The core never talks to the editor directly. It consumes these
//! narrow capabilities; the transport layer implements them against a
//! live connection and tests stub them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::Document;

/// Resolves the workspace folder containing a document. This is an
/// editor round-trip and may suspend.
#[async_trait]
pub trait WorkspaceResolver: Send + Sync {
    async fn workspace_folder(&self, document: &Document) -> Option<PathBuf>;
}

/// User-visible error display.
pub trait ErrorSink: Send + Sync {
    fn display_error(&self, message: &str);
}

/// Memoizes the workspace-folder lookup for a single request.
///
/// However many resolution steps consult the workspace folder, the
/// round-trip happens at most once per request.
pub struct LazyWorkspace<'a> {
    resolver: Option<&'a dyn WorkspaceResolver>,
    document: &'a Document,
    cell: OnceCell<Option<PathBuf>>,
}

impl<'a> LazyWorkspace<'a> {
    /// A lazy lookup backed by `resolver`.
    pub fn new(resolver: Option<&'a dyn WorkspaceResolver>, document: &'a Document) -> Self {
        Self {
            resolver,
            document,
            cell: OnceCell::new(),
        }
    }

    /// A lookup whose answer is already known.
    pub fn resolved(document: &'a Document, folder: Option<PathBuf>) -> Self {
        Self {
            resolver: None,
            document,
            cell: OnceCell::new_with(Some(folder)),
        }
    }

    pub async fn get(&self) -> Option<&Path> {
        self.cell
            .get_or_init(|| async {
                match self.resolver {
                    Some(resolver) => resolver.workspace_folder(self.document).await,
                    None => None,
                }
            })
            .await
            .as_deref()
    }
}
