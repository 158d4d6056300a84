use abl_core::SourceLines;
use tower_lsp::lsp_types::{Position, Range};

/// Maps the core's char columns onto LSP UTF-16 positions for one document.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    lines: Vec<String>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let lines = SourceLines::new(content).iter().map(|(_, l)| l.to_string()).collect();
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// UTF-16 offset of a char column; columns past the end are kept as is on ASCII lines.
    pub fn utf16_column(&self, line: usize, column: usize) -> u32 {
        match self.lines.get(line) {
            Some(text) if !text.is_ascii() => {
                let units: usize = text.chars().take(column).map(char::len_utf16).sum();
                units as u32
            }
            _ => column as u32,
        }
    }

    /// Char column of a UTF-16 offset, clamped to the line length.
    pub fn char_column(&self, line: usize, utf16: u32) -> usize {
        let Some(text) = self.lines.get(line) else {
            return 0;
        };
        let target = utf16 as usize;
        if text.is_ascii() {
            return target.min(text.len());
        }
        let mut seen = 0usize;
        let mut column = 0usize;
        for ch in text.chars() {
            let width = ch.len_utf16();
            if seen + width > target {
                break;
            }
            seen += width;
            column += 1;
        }
        column
    }

    pub fn position(&self, line: usize, column: usize) -> Position {
        Position::new(line as u32, self.utf16_column(line, column))
    }

    pub fn range(&self, line: usize, start_column: usize, end_column: usize) -> Range {
        Range::new(self.position(line, start_column), self.position(line, end_column))
    }

    /// Position just past the last char of `line`.
    pub fn line_end(&self, line: usize) -> Position {
        let chars = self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0);
        self.position(line, chars)
    }

    /// `(line, char column)` of an LSP position.
    pub fn to_core(&self, position: Position) -> (usize, usize) {
        let line = position.line as usize;
        (line, self.char_column(line, position.character))
    }
}
