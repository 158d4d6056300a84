use abl_core::{Diagnostic as CoreDiagnostic, Severity};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};

use super::utils::LineIndex;

pub const DIAGNOSTIC_SOURCE: &str = "abl";

pub(crate) fn to_lsp_diagnostic(diagnostic: &CoreDiagnostic, index: &LineIndex) -> Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
    };
    Diagnostic {
        range: index.range(diagnostic.line, diagnostic.start_column, diagnostic.end_column),
        severity: Some(severity),
        code: Some(NumberOrString::String(diagnostic.kind.code().to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}
