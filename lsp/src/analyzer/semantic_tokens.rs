use abl_core::{TokenCategory, TokenSpan};
use tower_lsp::lsp_types::{Range, SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

use super::utils::LineIndex;

// Ceiling for one response so huge rule files stay responsive.
pub(crate) const MAX_TOKENS_PER_DOC: usize = 8000;

const TYPE_MACRO: u32 = 0;
const TYPE_FUNCTION: u32 = 1;
const TYPE_OPERATOR: u32 = 2;
const TYPE_PROPERTY: u32 = 3;
const TYPE_KEYWORD: u32 = 4;
const TYPE_VARIABLE: u32 = 5;

const MOD_DECLARATION: u32 = 1 << 0;
const MOD_DEFAULT_LIBRARY: u32 = 1 << 1;
const MOD_READONLY: u32 = 1 << 2;

/// Legend advertised in `initialize`; indices match `token_type`.
pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: vec![
            SemanticTokenType::MACRO,
            SemanticTokenType::FUNCTION,
            SemanticTokenType::OPERATOR,
            SemanticTokenType::PROPERTY,
            SemanticTokenType::KEYWORD,
            SemanticTokenType::VARIABLE,
        ],
        token_modifiers: vec![
            SemanticTokenModifier::DECLARATION,
            SemanticTokenModifier::DEFAULT_LIBRARY,
            SemanticTokenModifier::READONLY,
        ],
    }
}

/// `(token type index, modifier bitset)` for a category.
pub fn token_type(category: TokenCategory) -> (u32, u32) {
    match category {
        TokenCategory::MapCall => (TYPE_MACRO, MOD_DEFAULT_LIBRARY),
        TokenCategory::BuiltinCall => (TYPE_FUNCTION, MOD_DEFAULT_LIBRARY),
        TokenCategory::LogicOperator => (TYPE_OPERATOR, 0),
        TokenCategory::MetaAccessor => (TYPE_PROPERTY, MOD_READONLY),
        TokenCategory::FunctionDecl => (TYPE_KEYWORD, MOD_DECLARATION),
        TokenCategory::FunctionEnd => (TYPE_KEYWORD, 0),
        TokenCategory::UserFunctionCall => (TYPE_FUNCTION, 0),
        TokenCategory::ReturnVariable => (TYPE_VARIABLE, 0),
    }
}

fn create_token(line: u32, start: u32, length: u32, category: TokenCategory) -> SemanticToken {
    let (token_type, modifiers) = token_type(category);
    SemanticToken {
        delta_line: line,  // absolute until encoded
        delta_start: start, // absolute until encoded
        length,
        token_type,
        token_modifiers_bitset: modifiers,
    }
}

/// Absolute UTF-16 tokens for the spans, in document order.
fn absolute_tokens<'a>(
    spans: impl Iterator<Item = &'a TokenSpan> + 'a,
    index: &'a LineIndex,
) -> impl Iterator<Item = SemanticToken> + 'a {
    spans.filter_map(move |span| {
        let start = index.utf16_column(span.line, span.start_column);
        let end = index.utf16_column(span.line, span.end_column());
        (end > start).then(|| create_token(span.line as u32, start, end - start, span.category))
    })
}

/// Convert absolute positions to the relative encoding LSP expects.
fn delta_encode(tokens: Vec<SemanticToken>) -> Vec<SemanticToken> {
    let mut result: Vec<SemanticToken> = Vec::with_capacity(tokens.len());
    let mut prev_line: u32 = 0;
    let mut prev_start: u32 = 0;
    let mut first = true;

    for t in tokens {
        let line = t.delta_line;
        let start = t.delta_start;
        let delta_line = if first { line } else { line.saturating_sub(prev_line) };
        let delta_start = if first || delta_line != 0 {
            start
        } else {
            start.saturating_sub(prev_start)
        };

        result.push(SemanticToken {
            delta_line,
            delta_start,
            length: t.length,
            token_type: t.token_type,
            token_modifiers_bitset: t.token_modifiers_bitset,
        });

        prev_line = line;
        prev_start = start;
        first = false;
    }
    result
}

/// Encoded tokens for a whole document, capped at `limit`.
pub fn encode_document(spans: &[TokenSpan], index: &LineIndex, limit: usize) -> Vec<SemanticToken> {
    let tokens: Vec<SemanticToken> = absolute_tokens(spans.iter(), index).take(limit).collect();
    delta_encode(tokens)
}

/// Encoded tokens overlapping `range`; the first token is relative to the document start.
pub fn encode_range(spans: &[TokenSpan], index: &LineIndex, range: Range, limit: usize) -> Vec<SemanticToken> {
    let first_line = range.start.line as usize;
    let last_line = range.end.line as usize;
    let in_lines = spans.iter().filter(|s| s.line >= first_line && s.line <= last_line);
    let tokens: Vec<SemanticToken> = absolute_tokens(in_lines, index)
        .filter(|t| {
            let end = t.delta_start + t.length;
            let after_start = t.delta_line > range.start.line || end > range.start.character;
            let before_end = t.delta_line < range.end.line || t.delta_start < range.end.character;
            after_start && before_end
        })
        .take(limit)
        .collect();
    delta_encode(tokens)
}
