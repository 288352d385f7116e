//! lintbridge LSP server
//!
//! Language Server Protocol surface for lintbridge. Synchronizes
//! documents with the editor, runs the lint runner on every change, and
//! publishes the normalized diagnostics.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info, warn};

use lintbridge_core::pnp::NodePnpRuntime;
use lintbridge_core::{
    Document, ErrorSink, LintOptions, LintRunner, RunnerError, RunnerOptions, WorkspaceResolver,
};
use lintbridge_engine::WasmEngineLoader;

struct DocumentData {
    text: String,
    version: i32,
}

/// Workspace-folder lookup backed by the LSP client.
struct ClientWorkspace {
    client: Client,
    /// Root captured at initialize, used when the client reports no
    /// workspace folders.
    root: RwLock<Option<PathBuf>>,
}

impl ClientWorkspace {
    fn new(client: Client) -> Self {
        Self {
            client,
            root: RwLock::new(None),
        }
    }

    fn set_root(&self, root: Option<PathBuf>) {
        *self.root.write() = root;
    }
}

#[async_trait]
impl WorkspaceResolver for ClientWorkspace {
    async fn workspace_folder(&self, document: &Document) -> Option<PathBuf> {
        if let Some(path) = document.fs_path() {
            if let Ok(Some(folders)) = self.client.workspace_folders().await {
                for folder in folders {
                    if let Ok(folder_path) = folder.uri.to_file_path() {
                        if path.starts_with(&folder_path) {
                            return Some(folder_path);
                        }
                    }
                }
            }
        }

        self.root.read().clone()
    }
}

/// Error display backed by `window/showMessage`.
struct ClientErrorSink {
    client: Client,
}

impl ErrorSink for ClientErrorSink {
    fn display_error(&self, message: &str) {
        let client = self.client.clone();
        let message = message.to_string();

        tokio::spawn(async move {
            client.show_message(MessageType::ERROR, message).await;
        });
    }
}

/// Extracts runner options from an editor settings payload.
///
/// Accepts either the bare option object or one nested under a
/// `csslint` section.
fn extract_settings(value: serde_json::Value) -> Option<RunnerOptions> {
    let section = match value {
        serde_json::Value::Object(mut map) => match map.remove("csslint") {
            Some(section) => section,
            None => serde_json::Value::Object(map),
        },
        other => other,
    };

    match serde_json::from_value(section) {
        Ok(options) => Some(options),
        Err(e) => {
            warn!("Ignoring malformed settings: {}", e);
            None
        }
    }
}

/// The LSP backend for lintbridge.
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Document contents cache.
    documents: RwLock<HashMap<Url, DocumentData>>,
    /// Current runner options from editor settings.
    settings: RwLock<RunnerOptions>,
    workspace: Arc<ClientWorkspace>,
    runner: LintRunner,
}

impl Backend {
    /// Creates a new backend with the given client.
    pub fn new(client: Client) -> Self {
        let workspace = Arc::new(ClientWorkspace::new(client.clone()));

        let runner = LintRunner::new(
            Arc::new(WasmEngineLoader::new()),
            Arc::new(NodePnpRuntime::new(false)),
            Some(workspace.clone()),
            Some(Arc::new(ClientErrorSink {
                client: client.clone(),
            })),
        );

        Self {
            client,
            documents: RwLock::new(HashMap::new()),
            settings: RwLock::new(RunnerOptions::default()),
            workspace,
            runner,
        }
    }

    /// Lints a document and publishes diagnostics.
    async fn validate_document(&self, uri: &Url, text: &str, version: Option<i32>) {
        debug!("Validating document: {}", uri);

        let document = Document::new(uri.clone(), text);
        let options = self.settings.read().clone();

        match self
            .runner
            .lint_document(&document, &LintOptions::default(), &options)
            .await
        {
            Ok(result) => {
                self.client
                    .publish_diagnostics(uri.clone(), result.diagnostics, version)
                    .await;
            }
            Err(RunnerError::InvalidOptions(e)) => {
                // Misconfiguration is the user's to fix; show it.
                self.client
                    .show_message(MessageType::ERROR, e.to_string())
                    .await;
            }
            Err(e) => {
                error!("Failed to lint {}: {}", uri, e);
            }
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("lintbridge LSP server initializing...");

        self.workspace
            .set_root(params.root_uri.and_then(|u| u.to_file_path().ok()));

        if let Some(options) = params.initialization_options.and_then(extract_settings) {
            *self.settings.write() = options;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "lintbridge-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "lintbridge LSP server initialized!")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("lintbridge LSP server shutting down...");
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        if let Some(options) = extract_settings(params.settings) {
            info!("Settings changed, revalidating open documents");
            *self.settings.write() = options;
        }

        // Re-lint everything under the new settings.
        let open: Vec<(Url, String, i32)> = {
            let docs = self.documents.read();
            docs.iter()
                .map(|(uri, data)| (uri.clone(), data.text.clone(), data.version))
                .collect()
        };

        for (uri, text, version) in open {
            self.validate_document(&uri, &text, Some(version)).await;
        }
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("Document opened: {}", params.text_document.uri);

        {
            let mut docs = self.documents.write();
            docs.insert(
                params.text_document.uri.clone(),
                DocumentData {
                    text: params.text_document.text.clone(),
                    version: params.text_document.version,
                },
            );
        }

        self.validate_document(
            &params.text_document.uri,
            &params.text_document.text,
            Some(params.text_document.version),
        )
        .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        debug!("Document changed: {}", params.text_document.uri);

        // Full sync: the last change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().next() {
            {
                let mut docs = self.documents.write();
                docs.insert(
                    params.text_document.uri.clone(),
                    DocumentData {
                        text: change.text.clone(),
                        version: params.text_document.version,
                    },
                );
            }

            self.validate_document(
                &params.text_document.uri,
                &change.text,
                Some(params.text_document.version),
            )
            .await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);

        if let Some(text) = params.text {
            self.validate_document(&params.text_document.uri, &text, None)
                .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);

        {
            let mut docs = self.documents.write();
            docs.remove(&params.text_document.uri);
        }

        // Clear diagnostics.
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }
}

/// Starts the LSP server over stdio.
///
/// Does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("lintbridge LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
