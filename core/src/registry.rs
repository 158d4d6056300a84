use serde::Serialize;

use crate::util::{FastHashSet, fast_hash_set_new};

/// How a name following `@` is treated by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeywordClass {
    Builtin,
    Writer,
    Control,
    Unregistered,
}

/// Reserved control-flow words. Never classified semantically.
pub const CONTROL_WORDS: &[&str] = &["If", "Then", "Else", "For", "End", "Break", "Continue", "Function"];

/// Output keywords left to the static grammar's coloring.
pub const WRITER_KEYWORDS: &[&str] = &["Write", "WriteLine", "InsertLine", "AppendLine", "DeleteLine"];

/// Declaration and assignment keywords (`@String name`, `@Int name`, `@Set name`).
pub const DECLARATION_KEYWORDS: &[&str] = &["String", "Int", "Set"];

/// Catalog entry for a library operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuiltinDoc {
    pub name: &'static str,
    pub signature: &'static str,
    pub summary: &'static str,
}

const fn doc(name: &'static str, signature: &'static str, summary: &'static str) -> BuiltinDoc {
    BuiltinDoc { name, signature, summary }
}

pub const BUILTINS: &[BuiltinDoc] = &[
    doc("Get", "@Get(name)", "Value of a declared variable."),
    doc("Length", "@Length(text)", "Number of characters in text."),
    doc("Substr", "@Substr(text, start, length)", "Part of text starting at a 1-based position."),
    doc("Index", "@Index(text, search)", "1-based position of search in text, 0 when absent."),
    doc("Contains", "@Contains(text, search)", "True when text contains search."),
    doc("StartsWith", "@StartsWith(text, prefix)", "True when text begins with prefix."),
    doc("EndsWith", "@EndsWith(text, suffix)", "True when text ends with suffix."),
    doc("Upper", "@Upper(text)", "Text converted to upper case."),
    doc("Lower", "@Lower(text)", "Text converted to lower case."),
    doc("Trim", "@Trim(text)", "Text without leading and trailing blanks."),
    doc("Replace", "@Replace(text, from, to)", "Text with every occurrence of from replaced by to."),
    doc("Concat", "@Concat(a, b, ...)", "All arguments joined into one string."),
    doc("Pad", "@Pad(text, width)", "Text right-padded with blanks to width."),
    doc("Format", "@Format(pattern, args...)", "Pattern with {n} placeholders replaced by arguments."),
    doc("ToInt", "@ToInt(text)", "Integer value of text."),
    doc("ToString", "@ToString(value)", "String form of a value."),
    doc("Match", "@Match(text, pattern)", "True when text matches the regular expression pattern."),
    doc("Token", "@Token(n)", "Text of the n-th token on the current line."),
    doc("TokenCount", "@TokenCount()", "Number of tokens on the current line."),
    doc("NextToken", "@NextToken()", "Token following the current one."),
    doc("PrevToken", "@PrevToken()", "Token preceding the current one."),
    doc("Line", "@Line(n)", "Text of line n of the current file."),
    doc("LineCount", "@LineCount()", "Number of lines in the current file."),
    doc("CurrentLine", "@CurrentLine()", "Line number being transformed."),
];

/// `@Map.<op>` operations.
pub const MAP_OPERATIONS: &[BuiltinDoc] = &[
    doc("Get", "@Map.Get(key)", "Value stored under key in the rule map."),
    doc("Set", "@Map.Set(key, value)", "Store value under key in the rule map."),
    doc("Clear", "@Map.Clear()", "Remove every entry from the rule map."),
];

pub fn builtin_doc(name: &str) -> Option<&'static BuiltinDoc> {
    BUILTINS.iter().find(|b| b.name == name)
}

pub fn map_operation_doc(name: &str) -> Option<&'static BuiltinDoc> {
    MAP_OPERATIONS.iter().find(|b| b.name == name)
}

/// Read-only name tables consulted by the classifier and outline scan.
#[derive(Debug, Clone)]
pub struct KeywordRegistry {
    builtins: FastHashSet<String>,
    writers: FastHashSet<String>,
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl KeywordRegistry {
    /// The builtin catalog and writer keywords shipped with the language.
    pub fn standard() -> Self {
        let mut builtins = fast_hash_set_new();
        builtins.extend(BUILTINS.iter().map(|b| b.name.to_string()));
        let mut writers = fast_hash_set_new();
        writers.extend(WRITER_KEYWORDS.iter().map(|w| w.to_string()));
        Self { builtins, writers }
    }

    pub fn with_builtins<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builtins.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_writers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.writers.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn classify(&self, name: &str) -> KeywordClass {
        if CONTROL_WORDS.contains(&name) {
            KeywordClass::Control
        } else if self.writers.contains(name) {
            KeywordClass::Writer
        } else if self.builtins.contains(name) {
            KeywordClass::Builtin
        } else {
            KeywordClass::Unregistered
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.classify(name) == KeywordClass::Builtin
    }

    /// Names that can never be user functions: every registered keyword,
    /// the declaration keywords and `Map`.
    pub fn is_reserved(&self, name: &str) -> bool {
        name == "Map" || DECLARATION_KEYWORDS.contains(&name) || self.classify(name) != KeywordClass::Unregistered
    }

    /// Builtin names, sorted.
    pub fn builtin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Writer names, sorted.
    pub fn writer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.writers.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
