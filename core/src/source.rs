/// Line-indexed view over a document. Columns in this crate count chars.
#[derive(Debug, Clone, Default)]
pub struct SourceLines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> SourceLines<'a> {
    pub fn new(text: &'a str) -> Self {
        let lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, line: usize) -> Option<&'a str> {
        self.lines.get(line).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines.iter().copied().enumerate()
    }

    /// Lines that are neither blank nor `#` comments.
    pub fn significant(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.iter().filter(|(_, l)| !is_blank_or_comment(l))
    }
}

/// Blank, or the first non-whitespace char is `#`.
pub fn is_blank_or_comment(line: &str) -> bool {
    match line.trim_start().chars().next() {
        None => true,
        Some(c) => c == '#',
    }
}

/// Char column of a byte offset.
pub fn char_column(line: &str, byte: usize) -> usize {
    line[..byte.min(line.len())].chars().count()
}

/// Byte offset of a char column, clamped to the end of the line.
pub fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices().nth(column).map(|(b, _)| b).unwrap_or(line.len())
}
