//! Quote-aware line scanning primitives.
//!
//! ABL string literals are single-quoted. A doubled `''` is consumed as one
//! unit without toggling the quote state, so an escaped quote inside a literal
//! and an adjacent empty literal outside one are scanned identically.

use std::ops::Range;

#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Single-quote state machine for one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteState {
    inside: bool,
}

impl QuoteState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inside(&self) -> bool {
        self.inside
    }

    /// Feed the char at `i`. Returns how many chars were consumed as quote
    /// syntax: 0 for an ordinary char, 1 for a toggling `'`, 2 for a `''` pair.
    #[inline]
    pub fn step(&mut self, chars: &[char], i: usize) -> usize {
        if chars[i] != '\'' {
            return 0;
        }
        if chars.get(i + 1) == Some(&'\'') {
            return 2;
        }
        self.inside = !self.inside;
        1
    }
}

/// Blank out the contents of single-quoted literals, keeping the quote chars
/// and the line length (in chars). Applying it twice gives the same result.
pub fn strip_single_quoted(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut quote = QuoteState::new();
    let mut i = 0usize;
    while i < chars.len() {
        let was_inside = quote.inside();
        match quote.step(&chars, i) {
            0 => {
                out.push(if was_inside { ' ' } else { chars[i] });
                i += 1;
            }
            1 => {
                out.push('\'');
                i += 1;
            }
            _ => {
                if was_inside {
                    out.push_str("  ");
                } else {
                    out.push_str("''");
                }
                i += 2;
            }
        }
    }
    out
}

/// Walk `text` and call `visit(byte_offset, depth)` for every char
/// that sits outside quotes. `depth` is the parenthesis depth before the char.
fn walk_code<F>(text: &str, mut visit: F)
where
    F: FnMut(usize, i32) -> bool,
{
    let indexed: Vec<(usize, char)> = text.char_indices().collect();
    let chars: Vec<char> = indexed.iter().map(|(_, c)| *c).collect();
    let mut quote = QuoteState::new();
    let mut depth = 0i32;
    let mut i = 0usize;
    while i < chars.len() {
        let consumed = quote.step(&chars, i);
        if consumed > 0 {
            i += consumed;
            continue;
        }
        if quote.inside() {
            i += 1;
            continue;
        }
        if !visit(indexed[i].0, depth) {
            return;
        }
        match chars[i] {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
}

/// True when `word` occurs at byte offset `at` of `text` with identifier
/// boundaries on both sides.
pub fn word_at(text: &str, at: usize, word: &str) -> bool {
    if !text[at..].starts_with(word) {
        return false;
    }
    let before_ok = text[..at].chars().next_back().is_none_or(|c| !is_ident_char(c));
    let after_ok = text[at + word.len()..].chars().next().is_none_or(|c| !is_ident_char(c));
    before_ok && after_ok
}

/// Byte offset of the first `needle` outside quoted literals. The needle must
/// not continue into an identifier char.
pub fn find_outside_quotes(text: &str, needle: &str) -> Option<usize> {
    let mut found = None;
    walk_code(text, |offset, _| {
        if text[offset..].starts_with(needle)
            && text[offset + needle.len()..]
                .chars()
                .next()
                .is_none_or(|c| !is_ident_char(c))
        {
            found = Some(offset);
            return false;
        }
        true
    });
    found
}

/// Byte ranges of the fragments between top-level `And` / `Or` keywords.
pub fn and_or_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0usize;
    let mut skip_until = 0usize;
    walk_code(text, |offset, depth| {
        if offset < skip_until || depth != 0 {
            return true;
        }
        for keyword in ["And", "Or"] {
            if word_at(text, offset, keyword) {
                ranges.push(start..offset);
                start = offset + keyword.len();
                skip_until = start;
                break;
            }
        }
        true
    });
    ranges.push(start..text.len());
    ranges
}

/// Split on `And` / `Or` outside quotes, at paren depth 0, at word boundaries.
/// N splits give N + 1 fragments; empty fragments are kept.
pub fn split_by_and_or_top_level(text: &str) -> Vec<&str> {
    and_or_ranges(text).into_iter().map(|r| &text[r]).collect()
}

/// Comparison operators in match priority order.
pub const COMPARISON_OPERATORS: [&str; 6] = ["<>", ">=", "<=", "=", ">", "<"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison<'a> {
    pub left: &'a str,
    pub operator: &'static str,
    pub right: &'a str,
    /// Byte offset of the operator within the scanned expression.
    pub operator_offset: usize,
}

impl<'a> Comparison<'a> {
    /// Byte offset of the right operand within the scanned expression.
    pub fn right_offset(&self) -> usize {
        self.operator_offset + self.operator.len()
    }
}

/// First comparison operator outside quotes and parens, split into operands.
pub fn split_compare_top_level(expr: &str) -> Option<Comparison<'_>> {
    let mut hit: Option<(usize, &'static str)> = None;
    walk_code(expr, |offset, depth| {
        if depth != 0 {
            return true;
        }
        let rest = &expr[offset..];
        if let Some(op) = COMPARISON_OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            hit = Some((offset, *op));
            return false;
        }
        true
    });
    let (offset, operator) = hit?;
    Some(Comparison {
        left: &expr[..offset],
        operator,
        right: &expr[offset + operator.len()..],
        operator_offset: offset,
    })
}
