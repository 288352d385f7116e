//! Extism-based engine loading for native hosts.
//!
//! Engines distributed as Extism plugins ship an `engine.wasm` artifact
//! inside their package directory. The plugin must export `lint` (JSON
//! [`LintOptions`] in, JSON [`LinterResult`] out) and may export
//! `rule_metadata` (JSON table of rule identifier to [`RuleMetadata`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use extism::{Manifest, Plugin, Wasm};
use extism_manifest::MemoryOptions;
use tracing::{debug, info, warn};

use crate::{
    EngineError, EngineLoader, LintEngine, LintOptions, LinterResult, LoadError, RuleMetadata,
};

/// WASM artifact looked for inside a resolved engine package.
pub const ENGINE_WASM_FILENAME: &str = "engine.wasm";

/// Memory ceiling for engine instances (128 MB = 2048 pages).
/// Each WASM page is 64KB.
const MEMORY_MAX_PAGES: u32 = 2048;

/// Execution timeout for a single engine call.
const TIMEOUT_MS: u64 = 30_000;

/// Loads engines distributed as Extism plugins.
///
/// Accepts either a `.wasm` artifact path or a package directory
/// containing [`ENGINE_WASM_FILENAME`].
#[derive(Debug, Default)]
pub struct WasmEngineLoader;

impl WasmEngineLoader {
    /// Creates a new loader.
    pub fn new() -> Self {
        Self
    }

    fn wasm_path(path: &Path) -> PathBuf {
        if path.extension().is_some_and(|e| e == "wasm") {
            path.to_path_buf()
        } else {
            path.join(ENGINE_WASM_FILENAME)
        }
    }

    /// Configures the manifest with sandbox limits.
    fn configure_manifest(mut manifest: Manifest) -> Manifest {
        manifest.timeout_ms = Some(TIMEOUT_MS);
        manifest.memory = MemoryOptions {
            max_pages: Some(MEMORY_MAX_PAGES),
            max_http_response_bytes: None,
            max_var_bytes: None,
        };

        manifest
    }

    /// Fetches the engine's rule metadata table, if published.
    fn load_rule_metadata(plugin: &mut Plugin) -> HashMap<String, RuleMetadata> {
        if !plugin.function_exists("rule_metadata") {
            return HashMap::new();
        }

        match plugin.call::<&str, String>("rule_metadata", "") {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Engine published malformed rule metadata: {}", e);
                HashMap::new()
            }),
            Err(e) => {
                warn!("Failed to read engine rule metadata: {}", e);
                HashMap::new()
            }
        }
    }
}

impl EngineLoader for WasmEngineLoader {
    fn load(&self, path: &Path) -> Result<Option<Arc<dyn LintEngine>>, LoadError> {
        let wasm_path = Self::wasm_path(path);

        if !wasm_path.is_file() {
            return Err(LoadError::load(format!(
                "no engine artifact at {}",
                wasm_path.display()
            )));
        }

        info!("Loading engine from {}", wasm_path.display());

        let wasm = Wasm::file(&wasm_path);
        let manifest = Self::configure_manifest(Manifest::new([wasm]));

        let mut plugin = Plugin::new(&manifest, [], true)
            .map_err(|e| LoadError::load(format!("failed to instantiate engine: {}", e)))?;

        if !plugin.function_exists("lint") {
            debug!("Engine at {} has no lint export", wasm_path.display());
            return Ok(None);
        }

        // Metadata is static per engine build; fetch it once at load.
        let rules = Self::load_rule_metadata(&mut plugin);

        Ok(Some(Arc::new(WasmEngine {
            plugin: Mutex::new(plugin),
            rules,
        })))
    }
}

/// A running WASM engine instance.
struct WasmEngine {
    plugin: Mutex<Plugin>,
    rules: HashMap<String, RuleMetadata>,
}

#[async_trait]
impl LintEngine for WasmEngine {
    async fn lint(&self, options: &LintOptions) -> Result<LinterResult, EngineError> {
        let input = serde_json::to_string(options)?;

        let output: String = {
            let mut plugin = self
                .plugin
                .lock()
                .map_err(|_| EngineError::invocation("engine mutex poisoned"))?;
            plugin
                .call("lint", input.as_str())
                .map_err(|e| EngineError::invocation(e.to_string()))?
        };

        Ok(serde_json::from_str(&output)?)
    }

    fn rule_metadata(&self, rule: &str) -> Option<RuleMetadata> {
        self.rules.get(rule).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to compile WAT to WASM bytes.
    fn wat_to_wasm(wat: &str) -> Vec<u8> {
        wat::parse_str(wat).expect("Invalid WAT")
    }

    /// A loadable module that exports nothing lint-shaped.
    fn module_without_lint() -> Vec<u8> {
        wat_to_wasm(
            r#"
            (module
                (memory (export "memory") 1)
            )
            "#,
        )
    }

    #[test]
    fn test_load_nonexistent_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let loader = WasmEngineLoader::new();

        let result = loader.load(&dir.path().join("missing"));
        assert!(matches!(result, Err(LoadError::Load(_))));
    }

    #[test]
    fn test_load_module_without_lint_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let wasm_path = dir.path().join(ENGINE_WASM_FILENAME);
        std::fs::write(&wasm_path, module_without_lint()).unwrap();

        let loader = WasmEngineLoader::new();
        let result = loader.load(dir.path()).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_accepts_direct_wasm_path() {
        let dir = tempfile::tempdir().unwrap();
        let wasm_path = dir.path().join("custom-engine.wasm");
        std::fs::write(&wasm_path, module_without_lint()).unwrap();

        let loader = WasmEngineLoader::new();
        // Loads the artifact itself, not `<dir>/engine.wasm`.
        let result = loader.load(&wasm_path).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_garbage_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let wasm_path = dir.path().join(ENGINE_WASM_FILENAME);
        std::fs::write(&wasm_path, b"not a wasm module").unwrap();

        let loader = WasmEngineLoader::new();
        let result = loader.load(dir.path());

        assert!(result.is_err());
    }
}
