//! Quoted-operand checks for `@If` / `@Else If` conditions.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::scan::{and_or_ranges, find_outside_quotes, split_compare_top_level};
use crate::source::{SourceLines, byte_offset, char_column};
use crate::then::condition_marker;

const QUOTES: [char; 2] = ['\'', '"'];

/// Condition text of a line and its byte offset in the line: everything after
/// the `@If` / `@Else If` marker, up to a `@Then` outside quotes.
pub fn condition_text(line: &str) -> Option<(usize, &str)> {
    let marker = condition_marker(line)?;
    let start = byte_offset(line, marker.end_column);
    let rest = &line[start..];
    let end = find_outside_quotes(rest, "@Then").unwrap_or(rest.len());
    Some((start, &rest[..end]))
}

/// Trim and drop one layer of wrapping parens. Returns the byte range of the
/// remaining operand within `text`.
fn unwrap_operand(text: &str) -> (usize, usize) {
    let lead = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    let (mut start, mut end) = (lead, lead + trimmed.len());
    if trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')') {
        let inner = &trimmed[1..trimmed.len() - 1];
        let inner_lead = inner.len() - inner.trim_start().len();
        start = lead + 1 + inner_lead;
        end = start + inner.trim().len();
    }
    (start, end)
}

/// A quoted operand must close with a quote character; which one is not checked.
fn is_unterminated(operand: &str) -> bool {
    if !operand.starts_with(QUOTES) {
        return false;
    }
    operand.chars().count() < 2 || !operand.ends_with(QUOTES)
}

/// First unterminated quoted operand in a condition, as a byte range of `cond`.
fn first_unterminated(cond: &str) -> Option<(usize, usize)> {
    for range in and_or_ranges(cond) {
        let fragment = &cond[range.clone()];
        let Some(cmp) = split_compare_top_level(fragment) else {
            continue;
        };
        let sides = [(0usize, cmp.left), (cmp.right_offset(), cmp.right)];
        for (offset, side) in sides {
            let (s, e) = unwrap_operand(side);
            if is_unterminated(&side[s..e]) {
                let base = range.start + offset;
                return Some((base + s, base + e));
            }
        }
    }
    None
}

/// At most one diagnostic per line: the first offending operand.
pub fn check_literals(lines: &SourceLines<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (line_no, line) in lines.significant() {
        let Some((cond_start, cond)) = condition_text(line) else {
            continue;
        };
        if let Some((start, end)) = first_unterminated(cond) {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::UnterminatedString,
                line_no,
                char_column(line, cond_start + start),
                char_column(line, cond_start + end),
                "Unterminated string in comparison".to_string(),
            ));
        }
    }
    diagnostics
}
