//! Lintable documents.

use std::path::PathBuf;

use tower_lsp::lsp_types::Url;

/// A document to lint: a URI plus its current text content.
#[derive(Debug, Clone)]
pub struct Document {
    uri: Url,
    text: String,
}

impl Document {
    /// Creates a new document.
    pub fn new(uri: Url, text: impl Into<String>) -> Self {
        Self {
            uri,
            text: text.into(),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The document's filesystem path. `None` for untitled and other
    /// non-`file:` documents.
    pub fn fs_path(&self) -> Option<PathBuf> {
        (self.uri.scheme() == "file")
            .then(|| self.uri.to_file_path().ok())
            .flatten()
    }
}
