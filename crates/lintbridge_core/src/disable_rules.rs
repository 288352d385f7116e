//! Disable-report rule classification.

/// Synthetic rule identifiers the engine attaches to disable-comment
/// reports, as opposed to ordinary lint findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisableReportRule {
    /// A disable comment that suppresses nothing.
    Needless,
    /// A disable comment for a rule not active in its scope.
    InvalidScope,
    /// A disable comment without a description.
    Descriptionless,
    /// A disable comment forbidden by configuration.
    Illegal,
}

impl DisableReportRule {
    /// Classifies a diagnostic's rule identifier. Returns `None` for
    /// ordinary rules.
    pub fn from_rule_id(rule_id: &str) -> Option<Self> {
        match rule_id {
            "--report-needless-disables" => Some(Self::Needless),
            "--report-invalid-scope-disables" => Some(Self::InvalidScope),
            "--report-descriptionless-disables" => Some(Self::Descriptionless),
            "reportDisables" => Some(Self::Illegal),
            _ => None,
        }
    }

    /// The engine-side rule identifier.
    pub fn rule_id(self) -> &'static str {
        match self {
            Self::Needless => "--report-needless-disables",
            Self::InvalidScope => "--report-invalid-scope-disables",
            Self::Descriptionless => "--report-descriptionless-disables",
            Self::Illegal => "reportDisables",
        }
    }
}
