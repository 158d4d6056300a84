use abl_core::registry::{builtin_doc, map_operation_doc, BuiltinDoc};
use abl_core::scan::{is_ident_char, strip_single_quoted};
use abl_core::source::is_blank_or_comment;
use abl_core::{Analysis, Declaration, DeclarationKind, KeywordClass, KeywordRegistry, ReferenceKind, Symbol};
use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};

use super::completions::META_ACCESSORS;
use super::utils::LineIndex;

fn control_doc(word: &str) -> Option<&'static str> {
    let doc = match word {
        "If" => "Opens a conditional block. The condition must be followed by `@Then` and the block closed by `@End If`.",
        "Then" => "Ends the condition of an `@If` or `@Else If`.",
        "Else" => "Alternative branch of an `@If` block; `@Else If` adds another condition.",
        "For" => "Opens a loop block closed by `@End For`.",
        "End" => "Closes the innermost open `@If`, `@For` or `@Function` block of the named kind.",
        "Break" => "Leaves the innermost `@For` loop.",
        "Continue" => "Skips to the next iteration of the innermost `@For` loop.",
        "Function" => "Declares a user function closed by `@End Function`. Its name is also its return variable.",
        _ => return None,
    };
    Some(doc)
}

fn declaration_keyword_doc(word: &str) -> Option<&'static str> {
    match word {
        "String" => Some("Declares a string variable: `@String name`."),
        "Int" => Some("Declares an integer variable: `@Int name`."),
        "Set" => Some("Assigns a declared variable: `@Set name = value`."),
        _ => None,
    }
}

fn markdown(value: String) -> HoverContents {
    HoverContents::Markup(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    })
}

fn code_block(code: &str, text: &str) -> String {
    format!("```abl\n{code}\n```\n{text}")
}

fn library_doc(doc: &BuiltinDoc) -> String {
    code_block(doc.signature, doc.summary)
}

fn describe_declaration(analysis: &Analysis, decl: &Declaration) -> String {
    let line = decl.line + 1;
    match decl.kind {
        DeclarationKind::Function => {
            let end = analysis
                .outline
                .function_index(decl)
                .and_then(|i| analysis.functions.function(i))
                .and_then(|f| f.end_line);
            let text = match end {
                Some(end) => format!("User function, lines {line}-{}.", end + 1),
                None => format!("User function declared on line {line}, missing `@End Function`."),
            };
            code_block(&format!("@Function {}", decl.name), &text)
        }
        _ => {
            let owner = decl
                .function
                .and_then(|i| analysis.functions.function(i))
                .and_then(|f| f.name.as_deref());
            let scope = match (decl.function, owner) {
                (Some(_), Some(name)) => format!("Local variable of `{name}`"),
                (Some(_), None) => "Local variable".to_string(),
                (None, _) => "Global variable".to_string(),
            };
            code_block(
                &format!("@{} {}", decl.kind.label(), decl.name),
                &format!("{scope}, declared on line {line}."),
            )
        }
    }
}

/// Identifier under or just before `column` in the masked line: `(start, end)` char columns.
fn word_bounds(chars: &[char], column: usize) -> Option<(usize, usize)> {
    let at = if chars.get(column).copied().is_some_and(is_ident_char) {
        column
    } else if column > 0 && chars.get(column - 1).copied().is_some_and(is_ident_char) {
        column - 1
    } else {
        return None;
    };
    let mut start = at;
    while start > 0 && is_ident_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = at;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    Some((start, end))
}

fn keyword_doc(registry: &KeywordRegistry, chars: &[char], start: usize, word: &str) -> Option<String> {
    let before = |n: usize| -> String { chars[start.saturating_sub(n)..start].iter().collect() };

    if before(5) == "@Map." {
        return map_operation_doc(word).map(library_doc);
    }
    if before(1) == "^" {
        return META_ACCESSORS
            .iter()
            .find(|(name, _)| *name == word)
            .map(|(name, doc)| code_block(&format!("^{name}"), doc));
    }
    if before(1) != "@" {
        return None;
    }
    if word == "Map" {
        return Some(code_block("@Map.Get / @Map.Set / @Map.Clear", "Key-value map shared by the rules of a file."));
    }
    if let Some(doc) = declaration_keyword_doc(word) {
        return Some(code_block(&format!("@{word}"), doc));
    }
    match registry.classify(word) {
        KeywordClass::Control => control_doc(word).map(|doc| code_block(&format!("@{word}"), doc)),
        KeywordClass::Writer => Some(code_block(&format!("@{word}(...)"), "Writes to the transformation output.")),
        KeywordClass::Builtin => Some(match builtin_doc(word) {
            Some(doc) => library_doc(doc),
            None => code_block(&format!("@{word}(...)"), "Configured builtin."),
        }),
        KeywordClass::Unregistered => None,
    }
}

pub(crate) fn hover(
    analysis: &Analysis,
    registry: &KeywordRegistry,
    index: &LineIndex,
    line: usize,
    column: usize,
) -> Option<Hover> {
    let text = index.line(line)?;
    if is_blank_or_comment(text) {
        return None;
    }

    if let Some(symbol) = analysis.outline.symbol_at(line, column) {
        let (value, start, end) = match symbol {
            Symbol::Declaration(d) => (describe_declaration(analysis, d), d.start_column, d.end_column),
            Symbol::Reference(r) => {
                let value = match analysis.outline.resolve(&r.name, r.kind, r.function) {
                    Some(decl) => describe_declaration(analysis, decl),
                    None if r.kind == ReferenceKind::Call => format!("`{}`: no such function in this document.", r.name),
                    None => format!("`{}`: not declared in this scope.", r.name),
                };
                (value, r.start_column, r.end_column)
            }
        };
        return Some(Hover {
            contents: markdown(value),
            range: Some(index.range(line, start, end)),
        });
    }

    let chars: Vec<char> = strip_single_quoted(text).chars().collect();
    let (start, end) = word_bounds(&chars, column)?;
    let word: String = chars[start..end].iter().collect();
    let value = keyword_doc(registry, &chars, start, &word)?;
    Some(Hover {
        contents: markdown(value),
        range: Some(index.range(line, start, end)),
    })
}
