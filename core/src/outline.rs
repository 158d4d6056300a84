//! Declarations and references of a document, for navigation features.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::functions::FunctionMap;
use crate::registry::KeywordRegistry;
use crate::scan::strip_single_quoted;
use crate::scope::{DECLARATION_RE, variable_uses};
use crate::source::{SourceLines, char_column};

static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z_][A-Za-z0-9_]*)[ \t]*@?\(").expect("call pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    Function,
    StringVar,
    IntVar,
}

impl DeclarationKind {
    pub fn is_variable(self) -> bool {
        !matches!(self, DeclarationKind::Function)
    }

    pub fn label(self) -> &'static str {
        match self {
            DeclarationKind::Function => "Function",
            DeclarationKind::StringVar => "String",
            DeclarationKind::IntVar => "Int",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
    /// Owning function for variables; `None` for globals and functions.
    pub function: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceKind {
    Variable,
    Call,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub name: String,
    pub kind: ReferenceKind,
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub function: Option<usize>,
}

/// What sits under a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol<'a> {
    Declaration(&'a Declaration),
    Reference(&'a Reference),
}

impl Symbol<'_> {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Declaration(d) => &d.name,
            Symbol::Reference(r) => &r.name,
        }
    }
}

/// A plain location, returned by occurrence queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Outline {
    declarations: Vec<Declaration>,
    references: Vec<Reference>,
    /// Function index to declared name, for return-variable resolution.
    function_names: Vec<Option<String>>,
}

impl Outline {
    pub fn build(lines: &SourceLines<'_>, functions: &FunctionMap, registry: &KeywordRegistry) -> Self {
        let mut outline = Outline {
            function_names: functions.functions().iter().map(|f| f.name.clone()).collect(),
            ..Default::default()
        };

        for (line_no, line) in lines.significant() {
            let owner = functions.owner(line_no);
            let masked = strip_single_quoted(line);

            if let Some(function) = functions.declared_at(line_no) {
                if let (Some(name), Some((start, end))) = (function.name.as_ref(), function.name_columns) {
                    outline.declarations.push(Declaration {
                        name: name.clone(),
                        kind: DeclarationKind::Function,
                        line: line_no,
                        start_column: start,
                        end_column: end,
                        function: None,
                    });
                }
            }

            for caps in DECLARATION_RE.captures_iter(&masked) {
                let (Some(keyword), Some(name)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let kind = if keyword.as_str() == "Int" {
                    DeclarationKind::IntVar
                } else {
                    DeclarationKind::StringVar
                };
                outline.declarations.push(Declaration {
                    name: name.as_str().to_string(),
                    kind,
                    line: line_no,
                    start_column: char_column(&masked, name.start()),
                    end_column: char_column(&masked, name.end()),
                    function: owner,
                });
            }

            for usage in variable_uses(&masked) {
                outline.references.push(Reference {
                    name: usage.name,
                    kind: ReferenceKind::Variable,
                    line: line_no,
                    start_column: usage.start_column,
                    end_column: usage.end_column,
                    function: owner,
                });
            }

            for caps in CALL_RE.captures_iter(&masked) {
                let Some(name) = caps.get(1) else { continue };
                if registry.is_reserved(name.as_str()) {
                    continue;
                }
                outline.references.push(Reference {
                    name: name.as_str().to_string(),
                    kind: ReferenceKind::Call,
                    line: line_no,
                    start_column: char_column(&masked, name.start()),
                    end_column: char_column(&masked, name.end()),
                    function: owner,
                });
            }
        }

        outline.references.sort_by_key(|r| (r.line, r.start_column));
        outline
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn function_declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.kind == DeclarationKind::Function)
    }

    /// Index of the function a function declaration introduces.
    pub fn function_index(&self, decl: &Declaration) -> Option<usize> {
        if decl.kind != DeclarationKind::Function {
            return None;
        }
        self.function_names
            .iter()
            .position(|n| n.as_deref() == Some(decl.name.as_str()))
    }

    pub fn symbol_at(&self, line: usize, column: usize) -> Option<Symbol<'_>> {
        let hit = |l: usize, s: usize, e: usize| l == line && s <= column && column <= e;
        if let Some(d) = self
            .declarations
            .iter()
            .find(|d| hit(d.line, d.start_column, d.end_column))
        {
            return Some(Symbol::Declaration(d));
        }
        self.references
            .iter()
            .find(|r| hit(r.line, r.start_column, r.end_column))
            .map(Symbol::Reference)
    }

    /// Declaration a name resolves to from inside `function` (or top level).
    /// Variables look in the local scope first, then the function's own
    /// return variable, then globals. Calls resolve to functions by name.
    pub fn resolve(&self, name: &str, kind: ReferenceKind, function: Option<usize>) -> Option<&Declaration> {
        match kind {
            ReferenceKind::Call => self.function_declarations().find(|d| d.name == name),
            ReferenceKind::Variable => {
                if let Some(local) = function.and_then(|f| self.variables_named(name).find(|d| d.function == Some(f))) {
                    return Some(local);
                }
                let is_return_variable = function
                    .and_then(|f| self.function_names.get(f))
                    .and_then(|n| n.as_deref())
                    == Some(name);
                if is_return_variable {
                    if let Some(decl) = self.function_declarations().find(|d| d.name == name) {
                        return Some(decl);
                    }
                }
                self.variables_named(name).find(|d| d.function.is_none())
            }
        }
    }

    fn variables_named<'s, 'n>(
        &'s self,
        name: &'n str,
    ) -> impl Iterator<Item = &'s Declaration> + use<'s, 'n> {
        self.declarations
            .iter()
            .filter(move |d| d.kind.is_variable() && d.name == name)
    }

    /// Declaration for the symbol at a position; a declaration resolves to itself.
    pub fn definition_at(&self, line: usize, column: usize) -> Option<&Declaration> {
        match self.symbol_at(line, column)? {
            Symbol::Declaration(d) => Some(d),
            Symbol::Reference(r) => self.resolve(&r.name, r.kind, r.function),
        }
    }

    /// Every occurrence of the symbol at a position that resolves to the same
    /// declaration. Unresolved names match by name and kind.
    pub fn occurrences_at(&self, line: usize, column: usize, include_declaration: bool) -> Vec<Span> {
        let Some(symbol) = self.symbol_at(line, column) else {
            return Vec::new();
        };
        let target = self.definition_at(line, column);
        let mut spans = Vec::new();

        match target {
            Some(decl) => {
                if include_declaration {
                    spans.push(Span {
                        line: decl.line,
                        start_column: decl.start_column,
                        end_column: decl.end_column,
                    });
                }
                for r in &self.references {
                    if r.name == decl.name && self.resolve(&r.name, r.kind, r.function) == Some(decl) {
                        spans.push(reference_span(r));
                    }
                }
            }
            None => {
                let Symbol::Reference(origin) = symbol else {
                    return spans;
                };
                spans.extend(
                    self.references
                        .iter()
                        .filter(|r| r.name == origin.name && r.kind == origin.kind)
                        .map(reference_span),
                );
            }
        }
        spans.sort_by_key(|s| (s.line, s.start_column));
        spans
    }

    /// Variables visible at a line owned by `function`: its locals and the globals.
    pub fn visible_variables(&self, function: Option<usize>) -> Vec<&Declaration> {
        self.declarations
            .iter()
            .filter(|d| d.kind.is_variable() && (d.function.is_none() || d.function == function))
            .collect()
    }

    /// Variables declared inside function `index`.
    pub fn locals_of(&self, index: usize) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(move |d| d.kind.is_variable() && d.function == Some(index))
    }
}

fn reference_span(r: &Reference) -> Span {
    Span {
        line: r.line,
        start_column: r.start_column,
        end_column: r.end_column,
    }
}
