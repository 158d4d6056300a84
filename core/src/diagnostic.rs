use std::fmt;

use serde::Serialize;

/// Block kinds that must be balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockKind {
    If,
    For,
    Function,
}

impl BlockKind {
    pub const ALL: [BlockKind; 3] = [BlockKind::If, BlockKind::For, BlockKind::Function];

    pub fn keyword(self) -> &'static str {
        match self {
            BlockKind::If => "If",
            BlockKind::For => "For",
            BlockKind::Function => "Function",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "If" => Some(BlockKind::If),
            "For" => Some(BlockKind::For),
            "Function" => Some(BlockKind::Function),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Only errors exist in this domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "code", content = "block", rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// An end marker with no open block of its kind.
    UnmatchedEnd(BlockKind),
    /// A block still open at end of document.
    MissingEnd(BlockKind),
    MissingThen,
    UnterminatedString,
    UndeclaredVariable,
}

impl DiagnosticKind {
    /// Stable code surfaced to editors.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnmatchedEnd(_) => "unmatched-end",
            DiagnosticKind::MissingEnd(_) => "missing-end",
            DiagnosticKind::MissingThen => "missing-then",
            DiagnosticKind::UnterminatedString => "unterminated-string",
            DiagnosticKind::UndeclaredVariable => "undeclared-variable",
        }
    }
}

/// One finding on a single line; columns are char based, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub message: String,
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, line: usize, start_column: usize, end_column: usize, message: String) -> Self {
        Self {
            line,
            start_column,
            end_column,
            message,
            severity: Severity::Error,
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}:{}: {}", self.line + 1, self.start_column + 1, self.message)
    }
}
