use abl_core::{AblAnalyzer, Analysis, AnalyzerConfig};
use tower_lsp::lsp_types::*;
use tracing::debug;

mod completions;
mod diagnostics;
mod hover;
mod semantic_tokens;
mod symbols;
#[cfg(test)]
mod tests;
mod utils;

pub use diagnostics::DIAGNOSTIC_SOURCE;
pub use semantic_tokens::{legend, token_type};
pub use utils::LineIndex;

use semantic_tokens::MAX_TOKENS_PER_DOC;

/// Everything the server needs from one pass over a document.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: Vec<DocumentSymbol>,
    pub folding_ranges: Vec<FoldingRange>,
    pub semantic_tokens: Vec<SemanticToken>,
    pub core: Analysis,
    pub line_index: LineIndex,
}

/// LSP-facing wrapper around the core analyzer.
#[derive(Debug, Clone, Default)]
pub struct AblLspAnalyzer {
    core: AblAnalyzer,
}

impl AblLspAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            core: AblAnalyzer::new(config),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.core.config()
    }

    pub fn analyze(&self, content: &str) -> AnalysisResult {
        let core = self.core.analyze(content);
        let line_index = LineIndex::new(content);
        let diagnostics = core
            .diagnostics
            .iter()
            .map(|d| diagnostics::to_lsp_diagnostic(d, &line_index))
            .collect();
        let symbols = symbols::document_symbols(&core, &line_index);
        let folding_ranges = symbols::folding_ranges(&core.blocks);
        let semantic_tokens = semantic_tokens::encode_document(&core.tokens, &line_index, MAX_TOKENS_PER_DOC);
        debug!(
            lines = line_index.line_count(),
            symbols = symbols.len(),
            tokens = semantic_tokens.len(),
            "lsp analysis"
        );
        AnalysisResult {
            diagnostics,
            symbols,
            folding_ranges,
            semantic_tokens,
            core,
            line_index,
        }
    }

    /// Full-document semantic tokens without the rest of the analysis.
    pub fn generate_semantic_tokens(&self, content: &str) -> Vec<SemanticToken> {
        let spans = self.core.classify(content);
        semantic_tokens::encode_document(&spans, &LineIndex::new(content), MAX_TOKENS_PER_DOC)
    }

    /// Completions at `position`, driven by the text before the cursor.
    pub fn completions(&self, result: &AnalysisResult, position: Position) -> Vec<CompletionItem> {
        let (line, column) = result.line_index.to_core(position);
        let Some(text) = result.line_index.line(line) else {
            return Vec::new();
        };
        let prefix: String = text.chars().take(column).collect();
        completions::completions(&result.core, &self.config().registry, line, &prefix)
    }

    pub fn hover(&self, result: &AnalysisResult, position: Position) -> Option<Hover> {
        let (line, column) = result.line_index.to_core(position);
        hover::hover(&result.core, &self.config().registry, &result.line_index, line, column)
    }
}

impl AnalysisResult {
    /// Tokens overlapping `range`, delta-encoded from the document start.
    pub fn semantic_tokens_in_range(&self, range: Range) -> Vec<SemanticToken> {
        semantic_tokens::encode_range(&self.core.tokens, &self.line_index, range, MAX_TOKENS_PER_DOC)
    }

    /// Range of the declaration the symbol at `position` resolves to.
    pub fn definition(&self, position: Position) -> Option<Range> {
        let (line, column) = self.line_index.to_core(position);
        let decl = self.core.outline.definition_at(line, column)?;
        Some(self.line_index.range(decl.line, decl.start_column, decl.end_column))
    }

    pub fn references(&self, position: Position, include_declaration: bool) -> Vec<Range> {
        let (line, column) = self.line_index.to_core(position);
        self.core
            .outline
            .occurrences_at(line, column, include_declaration)
            .into_iter()
            .map(|s| self.line_index.range(s.line, s.start_column, s.end_column))
            .collect()
    }

    /// Occurrences of the symbol at `position`; declarations are writes.
    pub fn highlights(&self, position: Position) -> Vec<DocumentHighlight> {
        let (line, column) = self.line_index.to_core(position);
        let outline = &self.core.outline;
        outline
            .occurrences_at(line, column, true)
            .into_iter()
            .map(|s| {
                let is_declaration = outline
                    .declarations()
                    .iter()
                    .any(|d| d.line == s.line && d.start_column == s.start_column);
                DocumentHighlight {
                    range: self.line_index.range(s.line, s.start_column, s.end_column),
                    kind: Some(if is_declaration {
                        DocumentHighlightKind::WRITE
                    } else {
                        DocumentHighlightKind::READ
                    }),
                }
            })
            .collect()
    }
}
