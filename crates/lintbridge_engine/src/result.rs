//! Engine-native lint result types.

use serde::{Deserialize, Serialize};

/// Severity reported by the engine for a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    /// Must be fixed.
    #[default]
    Error,
    /// Should be reviewed.
    Warning,
}

/// One finding reported by the engine.
///
/// Positions are 1-based, as the engine reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// The rule that produced this warning.
    pub rule: String,

    /// Human-readable message.
    pub text: String,

    #[serde(default)]
    pub severity: WarningSeverity,

    pub line: u32,

    pub column: u32,
}

impl Warning {
    /// Creates a new warning with the default severity.
    pub fn new(rule: impl Into<String>, text: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            rule: rule.into(),
            text: text.into(),
            severity: WarningSeverity::default(),
            line,
            column,
        }
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: WarningSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// An engine-reported malformed rule option.
///
/// Distinct from an ordinary finding: the configuration is wrong, not
/// the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidOptionWarning {
    pub text: String,
}

impl InvalidOptionWarning {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Per-file lint outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileResult {
    pub warnings: Vec<Warning>,

    pub invalid_option_warnings: Vec<InvalidOptionWarning>,

    /// Set when the file was excluded by an ignore file.
    pub ignored: bool,
}

/// The complete result of one engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinterResult {
    pub results: Vec<FileResult>,

    /// Raw fixed output, present when the engine ran with `fix`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Metadata an engine publishes for a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    /// Documentation URL for the rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
