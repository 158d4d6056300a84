use serde::Serialize;
use tracing::debug;

use crate::blocks::{BlockRange, scan_blocks};
use crate::classify::{TokenSpan, classify_document, classify_line};
use crate::config::AnalyzerConfig;
use crate::diagnostic::Diagnostic;
use crate::functions::FunctionMap;
use crate::literals::check_literals;
use crate::outline::Outline;
use crate::scope::check_scopes;
use crate::source::SourceLines;
use crate::then::check_then;

/// Everything one full pass over a document produces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    pub tokens: Vec<TokenSpan>,
    pub functions: FunctionMap,
    pub blocks: Vec<BlockRange>,
    pub outline: Outline,
}

/// Entry point for the classifier and validators. Every method rescans the
/// whole text; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct AblAnalyzer {
    config: AnalyzerConfig,
}

impl AblAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        let lines = SourceLines::new(text);
        let functions = FunctionMap::build(&lines);
        let block_scan = scan_blocks(&lines);
        let diagnostics = self.collect(&lines, &functions, block_scan.diagnostics);
        let tokens = classify_document(&lines, &functions, &self.config.registry);
        let outline = Outline::build(&lines, &functions, &self.config.registry);
        debug!(
            lines = lines.len(),
            diagnostics = diagnostics.len(),
            tokens = tokens.len(),
            functions = functions.functions().len(),
            "analyzed document"
        );
        Analysis {
            diagnostics,
            tokens,
            functions,
            blocks: block_scan.ranges,
            outline,
        }
    }

    /// Validators only.
    pub fn validate(&self, text: &str) -> Vec<Diagnostic> {
        let lines = SourceLines::new(text);
        let functions = FunctionMap::build(&lines);
        let block_diagnostics = scan_blocks(&lines).diagnostics;
        self.collect(&lines, &functions, block_diagnostics)
    }

    /// Classifier only.
    pub fn classify(&self, text: &str) -> Vec<TokenSpan> {
        let lines = SourceLines::new(text);
        let functions = FunctionMap::build(&lines);
        classify_document(&lines, &functions, &self.config.registry)
    }

    /// Classify a single line given the name of its enclosing function.
    pub fn classify_line(&self, line: &str, line_no: usize, enclosing_function: Option<&str>) -> Vec<TokenSpan> {
        classify_line(line, line_no, enclosing_function, &self.config.registry)
    }

    pub fn block_ranges(&self, text: &str) -> Vec<BlockRange> {
        scan_blocks(&SourceLines::new(text)).ranges
    }

    pub fn outline(&self, text: &str) -> Outline {
        let lines = SourceLines::new(text);
        let functions = FunctionMap::build(&lines);
        Outline::build(&lines, &functions, &self.config.registry)
    }

    fn collect(&self, lines: &SourceLines<'_>, functions: &FunctionMap, mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        diagnostics.extend(check_then(lines, self.config.then_lookahead));
        diagnostics.extend(check_literals(lines));
        diagnostics.extend(check_scopes(lines, functions));
        // Stable sort keeps validator order for equal positions.
        diagnostics.sort_by_key(|d| (d.line, d.start_column));
        if diagnostics.len() > self.config.max_diagnostics {
            debug!(
                total = diagnostics.len(),
                kept = self.config.max_diagnostics,
                "truncating diagnostics"
            );
            diagnostics.truncate(self.config.max_diagnostics);
        }
        diagnostics
    }
}
