//! Declaration-before-use checking over global and function-local scopes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::functions::FunctionMap;
use crate::scan::strip_single_quoted;
use crate::source::{SourceLines, char_column};
use crate::util::{FastHashMap, FastHashSet, fast_hash_map_new, fast_hash_set_new};

pub(crate) static DECLARATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(String|Int)[ \t]+([A-Za-z_][A-Za-z0-9_]*)").expect("declaration pattern"));

pub(crate) static USE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@Set[ \t]+([A-Za-z_][A-Za-z0-9_]*)|@Get[ \t]*\([ \t]*([A-Za-z_][A-Za-z0-9_]*)").expect("use pattern")
});

/// A variable use (`@Set name` or `@Get(name)`) on a masked line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableUse {
    pub name: String,
    pub start_column: usize,
    pub end_column: usize,
}

pub fn variable_uses(masked: &str) -> Vec<VariableUse> {
    USE_RE
        .captures_iter(masked)
        .filter_map(|caps| {
            let name = caps.get(1).or_else(|| caps.get(2))?;
            Some(VariableUse {
                name: name.as_str().to_string(),
                start_column: char_column(masked, name.start()),
                end_column: char_column(masked, name.end()),
            })
        })
        .collect()
}

/// Names declared so far in the walk.
#[derive(Debug, Default)]
pub struct DeclaredNames {
    global: FastHashSet<String>,
    local: FastHashMap<usize, FastHashSet<String>>,
}

impl DeclaredNames {
    pub fn new() -> Self {
        Self {
            global: fast_hash_set_new(),
            local: fast_hash_map_new(),
        }
    }

    pub fn declare(&mut self, owner: Option<usize>, name: &str) {
        let set = match owner {
            None => &mut self.global,
            Some(idx) => self.local.entry(idx).or_insert_with(fast_hash_set_new),
        };
        set.insert(name.to_string());
    }

    /// Global names are visible everywhere; local names only in their owner.
    pub fn is_visible(&self, owner: Option<usize>, name: &str) -> bool {
        self.global.contains(name)
            || owner
                .and_then(|idx| self.local.get(&idx))
                .is_some_and(|set| set.contains(name))
    }
}

/// Walk the document top-down, accumulating declarations and flagging every
/// use that is not yet visible from its line.
pub fn check_scopes(lines: &SourceLines<'_>, functions: &FunctionMap) -> Vec<Diagnostic> {
    let mut declared = DeclaredNames::new();
    let mut diagnostics = Vec::new();

    for (line_no, line) in lines.significant() {
        let owner = functions.owner(line_no);

        if let Some(function) = functions.declared_at(line_no) {
            if let Some(name) = function.name.as_deref() {
                declared.declare(Some(function.index), name);
            }
            continue;
        }

        let masked = strip_single_quoted(line);
        let mut is_declaration = false;
        for caps in DECLARATION_RE.captures_iter(&masked) {
            if let Some(name) = caps.get(2) {
                declared.declare(owner, name.as_str());
                is_declaration = true;
            }
        }
        if is_declaration {
            continue;
        }

        for usage in variable_uses(&masked) {
            if declared.is_visible(owner, &usage.name) {
                continue;
            }
            let message = match owner {
                None => format!("Variable '{}' is not declared globally", usage.name),
                Some(idx) => match functions.function(idx).and_then(|f| f.name.as_deref()) {
                    Some(function) => format!(
                        "Variable '{}' is not declared in function '{}' or globally",
                        usage.name, function
                    ),
                    None => format!("Variable '{}' is not declared in function or globally", usage.name),
                },
            };
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::UndeclaredVariable,
                line_no,
                usage.start_column,
                usage.end_column,
                message,
            ));
        }
    }
    diagnostics
}
