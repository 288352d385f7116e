//! Engine result normalization.

use tower_lsp::lsp_types::{
    CodeDescription, Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range, Url,
};

use lintbridge_engine::{LintEngine, LinterResult, Warning, WarningSeverity};

use crate::error::InvalidOptionError;

/// Source label attached to published diagnostics.
pub const DIAGNOSTIC_SOURCE: &str = "csslint";

/// Diagnostics produced by one lint run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LintDiagnostics {
    /// One diagnostic per warning the engine emitted.
    pub diagnostics: Vec<Diagnostic>,

    /// Raw fixed output, when the engine ran with `fix` enabled.
    pub output: Option<String>,
}

/// Converts a raw engine result into diagnostics.
///
/// The engine is always invoked with exactly one virtual file, so only
/// the first file result is consulted. Ignored files yield no
/// diagnostics regardless of any warnings attached to them.
/// Invalid-option warnings never mix with ordinary diagnostics; they
/// abort the run with [`InvalidOptionError`].
pub fn process_linter_result(
    engine: &dyn LintEngine,
    result: LinterResult,
) -> Result<LintDiagnostics, InvalidOptionError> {
    let Some(file_result) = result.results.into_iter().next() else {
        return Ok(LintDiagnostics::default());
    };

    if file_result.ignored {
        return Ok(LintDiagnostics::default());
    }

    if !file_result.invalid_option_warnings.is_empty() {
        return Err(InvalidOptionError::new(&file_result.invalid_option_warnings));
    }

    let diagnostics = file_result
        .warnings
        .iter()
        .map(|warning| {
            let url = engine.rule_metadata(&warning.rule).and_then(|m| m.url);
            warning_to_diagnostic(warning, url)
        })
        .collect();

    Ok(LintDiagnostics {
        diagnostics,
        output: result.output,
    })
}

/// Converts one engine warning into an LSP diagnostic.
///
/// The range is a single character anchored at the reported column; the
/// engine does not report token extents.
pub fn warning_to_diagnostic(warning: &Warning, rule_doc_url: Option<String>) -> Diagnostic {
    let line = warning.line.saturating_sub(1);
    let character = warning.column.saturating_sub(1);
    let range = Range::new(
        Position::new(line, character),
        Position::new(line, character + 1),
    );

    let severity = match warning.severity {
        WarningSeverity::Warning => DiagnosticSeverity::WARNING,
        WarningSeverity::Error => DiagnosticSeverity::ERROR,
    };

    let code_description = rule_doc_url
        .and_then(|url| Url::parse(&url).ok())
        .map(|href| CodeDescription { href });

    Diagnostic {
        range,
        severity: Some(severity),
        code: Some(NumberOrString::String(warning.rule.clone())),
        code_description,
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: warning.text.clone(),
        ..Default::default()
    }
}
