//! Engine invocation options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Engine configuration object.
///
/// Mirrors the engine's native config shape: a `rules` table plus any
/// engine-specific keys, which pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rule table: rule identifier to rule settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<serde_json::Map<String, serde_json::Value>>,

    /// Engine-specific keys forwarded as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EngineConfig {
    /// A config with an explicitly empty rule table. The engine then
    /// performs a syntax-only check.
    pub fn empty_rules() -> Self {
        Self {
            rules: Some(serde_json::Map::new()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Output formatter selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Suppress formatted output entirely; only the structured result
    /// channels are consumed.
    #[default]
    Quiet,
    Json,
    Compact,
}

/// The full option set for one engine invocation.
///
/// Field names serialize in camelCase so WASM engines receive the same
/// option object shape the engine's own tooling documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_basedir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_syntax: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_disables: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_needless_disables: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_invalid_scope_disables: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_descriptionless_disables: Option<bool>,

    /// Code to lint, in place of a file read by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Path the engine should attribute `code` to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<OutputFormat>,
}

impl LintOptions {
    /// Whether a rule table was explicitly configured.
    pub fn has_rules(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.rules.is_some())
    }
}
