use abl_core::{Analysis, BlockRange, Declaration, DeclarationKind};
use tower_lsp::lsp_types::{DocumentSymbol, FoldingRange, FoldingRangeKind, Range, SymbolKind};

use super::utils::LineIndex;

#[allow(deprecated)]
fn symbol(name: String, detail: &str, kind: SymbolKind, range: Range, selection_range: Range) -> DocumentSymbol {
    DocumentSymbol {
        name,
        detail: Some(detail.to_string()),
        kind,
        tags: None,
        deprecated: None,
        range,
        selection_range,
        children: None,
    }
}

fn variable_symbol(decl: &Declaration, index: &LineIndex) -> DocumentSymbol {
    let selection = index.range(decl.line, decl.start_column, decl.end_column);
    let whole_line = Range::new(index.position(decl.line, 0), index.line_end(decl.line));
    symbol(decl.name.clone(), decl.kind.label(), SymbolKind::VARIABLE, whole_line, selection)
}

/// Outline tree: functions (locals as children) and global variables, in line order.
pub(crate) fn document_symbols(analysis: &Analysis, index: &LineIndex) -> Vec<DocumentSymbol> {
    let outline = &analysis.outline;
    let mut symbols = Vec::new();

    for decl in outline.declarations() {
        match decl.kind {
            DeclarationKind::Function => {
                let Some(function) = outline.function_index(decl) else {
                    continue;
                };
                let end_line = analysis
                    .functions
                    .function(function)
                    .and_then(|f| f.end_line)
                    .unwrap_or(decl.line);
                let selection = index.range(decl.line, decl.start_column, decl.end_column);
                let range = Range::new(index.position(decl.line, 0), index.line_end(end_line));
                let mut item = symbol(decl.name.clone(), "Function", SymbolKind::FUNCTION, range, selection);
                let children: Vec<DocumentSymbol> =
                    outline.locals_of(function).map(|local| variable_symbol(local, index)).collect();
                if !children.is_empty() {
                    item.children = Some(children);
                }
                symbols.push(item);
            }
            _ if decl.function.is_none() => symbols.push(variable_symbol(decl, index)),
            _ => {}
        }
    }
    symbols
}

/// One region per matched block spanning more than a line.
pub(crate) fn folding_ranges(blocks: &[BlockRange]) -> Vec<FoldingRange> {
    let mut ranges: Vec<FoldingRange> = blocks
        .iter()
        .filter(|b| b.end_line > b.start_line)
        .map(|b| FoldingRange {
            start_line: b.start_line as u32,
            start_character: None,
            end_line: b.end_line as u32,
            end_character: None,
            kind: Some(FoldingRangeKind::Region),
            collapsed_text: Some(format!("@{} ...", b.kind)),
        })
        .collect();
    ranges.sort_by_key(|r| (r.start_line, r.end_line));
    ranges
}
