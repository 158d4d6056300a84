//! `@Then` presence for `@If` / `@Else If` lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::scan::strip_single_quoted;
use crate::source::{SourceLines, char_column};

static CONDITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(?:(If)|Else[ \t]+If)\b").expect("condition marker pattern"));

static THEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@Then\b").expect("then pattern"));

/// First condition-opening marker on a line, ignoring quoted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionMarker {
    pub is_else_if: bool,
    pub start_column: usize,
    pub end_column: usize,
}

impl ConditionMarker {
    pub fn keyword(&self) -> &'static str {
        if self.is_else_if { "@Else If" } else { "@If" }
    }
}

pub fn condition_marker(line: &str) -> Option<ConditionMarker> {
    let masked = strip_single_quoted(line);
    let caps = CONDITION_RE.captures(&masked)?;
    let whole = caps.get(0)?;
    Some(ConditionMarker {
        is_else_if: caps.get(1).is_none(),
        start_column: char_column(&masked, whole.start()),
        end_column: char_column(&masked, whole.end()),
    })
}

/// Matched on raw text, so a `@Then` after an unbalanced quote still counts.
fn has_then(line: &str) -> bool {
    THEN_RE.is_match(line)
}

/// Report every `@If` / `@Else If` whose `@Then` is neither on the same line
/// nor on one of the next `lookahead` significant lines.
pub fn check_then(lines: &SourceLines<'_>, lookahead: usize) -> Vec<Diagnostic> {
    let significant: Vec<(usize, &str)> = lines.significant().collect();
    let mut diagnostics = Vec::new();

    for (pos, (line_no, line)) in significant.iter().enumerate() {
        let Some(marker) = condition_marker(line) else {
            continue;
        };
        if has_then(line) {
            continue;
        }
        let found = significant
            .iter()
            .skip(pos + 1)
            .take(lookahead)
            .any(|(_, next)| has_then(next));
        if !found {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::MissingThen,
                *line_no,
                marker.start_column,
                marker.end_column,
                format!("Missing @Then after {}", marker.keyword()),
            ));
        }
    }
    diagnostics
}
