//! Balanced-block matching for `@If`, `@For` and `@Function`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::diagnostic::{BlockKind, Diagnostic, DiagnosticKind};
use crate::scan::strip_single_quoted;
use crate::source::{SourceLines, char_column};

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(If|For|Function)\b|@End[ \t]+(If|For|Function)\b").expect("block marker pattern")
});

/// A start or end marker found on a quote-masked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMarker {
    pub kind: BlockKind,
    pub is_end: bool,
    pub start_column: usize,
    pub end_column: usize,
}

/// Block markers of a line in column order. Quoted text never matches.
pub fn block_markers(line: &str) -> Vec<BlockMarker> {
    let masked = strip_single_quoted(line);
    MARKER_RE
        .captures_iter(&masked)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (word, is_end) = match (caps.get(1), caps.get(2)) {
                (Some(start), _) => (start.as_str(), false),
                (None, Some(end)) => (end.as_str(), true),
                (None, None) => return None,
            };
            Some(BlockMarker {
                kind: BlockKind::from_keyword(word)?,
                is_end,
                start_column: char_column(&masked, whole.start()),
                end_column: char_column(&masked, whole.end()),
            })
        })
        .collect()
}

/// A matched start/end pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRange {
    pub kind: BlockKind,
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    line: usize,
    start_column: usize,
    end_column: usize,
}

#[derive(Debug, Default)]
pub struct BlockScan {
    pub diagnostics: Vec<Diagnostic>,
    pub ranges: Vec<BlockRange>,
}

/// Stack-match every block kind over the significant lines. Each kind has its
/// own stack; unmatched ends are reported where they occur and leftover
/// starts are reported at their own line.
pub fn scan_blocks(lines: &SourceLines<'_>) -> BlockScan {
    let mut stacks: [Vec<OpenBlock>; 3] = Default::default();
    let mut scan = BlockScan::default();

    for (line_no, line) in lines.significant() {
        for marker in block_markers(line) {
            let stack = &mut stacks[slot(marker.kind)];
            if !marker.is_end {
                stack.push(OpenBlock {
                    line: line_no,
                    start_column: marker.start_column,
                    end_column: marker.end_column,
                });
                continue;
            }
            match stack.pop() {
                Some(open) => scan.ranges.push(BlockRange {
                    kind: marker.kind,
                    start_line: open.line,
                    end_line: line_no,
                }),
                None => scan.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::UnmatchedEnd(marker.kind),
                    line_no,
                    marker.start_column,
                    marker.end_column,
                    format!("Unmatched @End {0}: no open @{0} block", marker.kind),
                )),
            }
        }
    }

    for kind in BlockKind::ALL {
        for open in &stacks[slot(kind)] {
            scan.diagnostics.push(Diagnostic::error(
                DiagnosticKind::MissingEnd(kind),
                open.line,
                open.start_column,
                open.end_column,
                format!("@{0} block is missing a matching @End {0}", kind),
            ));
        }
    }

    scan.ranges.sort_by_key(|r| (r.start_line, r.end_line));
    scan
}

fn slot(kind: BlockKind) -> usize {
    match kind {
        BlockKind::If => 0,
        BlockKind::For => 1,
        BlockKind::Function => 2,
    }
}
