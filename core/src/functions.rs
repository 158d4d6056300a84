//! Per-line function membership.

use serde::Serialize;

use crate::blocks::block_markers;
use crate::diagnostic::BlockKind;
use crate::scan::{is_ident_char, is_ident_start};
use crate::source::{SourceLines, is_blank_or_comment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    pub index: usize,
    /// Declared name; it doubles as the function's return variable.
    pub name: Option<String>,
    pub decl_line: usize,
    /// Char columns of the name on the declaration line.
    pub name_columns: Option<(usize, usize)>,
    /// Line of the matching `@End Function`, if any.
    pub end_line: Option<usize>,
}

/// Which function (if any) every line belongs to. A line belongs to function
/// `k` from its `@Function` line up to, not including, its `@End Function`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FunctionMap {
    owners: Vec<Option<usize>>,
    functions: Vec<FunctionInfo>,
}

impl FunctionMap {
    pub fn build(lines: &SourceLines<'_>) -> Self {
        let mut owners = Vec::with_capacity(lines.len());
        let mut functions: Vec<FunctionInfo> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        for (line_no, line) in lines.iter() {
            if is_blank_or_comment(line) {
                owners.push(open.last().copied());
                continue;
            }
            let mut owner = None;
            for marker in block_markers(line).into_iter().filter(|m| m.kind == BlockKind::Function) {
                if marker.is_end {
                    if let Some(idx) = open.pop() {
                        functions[idx].end_line = Some(line_no);
                    }
                } else {
                    let index = functions.len();
                    let (name, name_columns) = match declared_name(line, marker.end_column) {
                        Some((name, start, end)) => (Some(name), Some((start, end))),
                        None => (None, None),
                    };
                    functions.push(FunctionInfo {
                        index,
                        name,
                        decl_line: line_no,
                        name_columns,
                        end_line: None,
                    });
                    open.push(index);
                    owner.get_or_insert(index);
                }
            }
            owners.push(owner.or_else(|| open.last().copied()));
        }

        Self { owners, functions }
    }

    /// Owning function index of a line; `None` at top level.
    pub fn owner(&self, line: usize) -> Option<usize> {
        self.owners.get(line).copied().flatten()
    }

    pub fn function(&self, index: usize) -> Option<&FunctionInfo> {
        self.functions.get(index)
    }

    pub fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    /// Name of the function enclosing `line`.
    pub fn enclosing_name(&self, line: usize) -> Option<&str> {
        self.owner(line)
            .and_then(|idx| self.functions.get(idx))
            .and_then(|f| f.name.as_deref())
    }

    /// Function declared on `line`, if any.
    pub fn declared_at(&self, line: usize) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.decl_line == line)
    }

    pub fn by_name(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.name.as_deref() == Some(name))
    }
}

/// Identifier following `@Function` after at least one blank.
fn declared_name(line: &str, after: usize) -> Option<(String, usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = after;
    while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
        i += 1;
    }
    if i == after || i >= chars.len() || !is_ident_start(chars[i]) {
        return None;
    }
    let start = i;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    Some((chars[start..i].iter().collect(), start, i))
}
