//! Per-line semantic token classifier.
//!
//! State never crosses a line boundary: quote state, the If-condition region
//! and the stack of open call frames all start fresh on every line. The only
//! outside input is the name of the enclosing function, used to highlight its
//! return variable.

use serde::Serialize;

use crate::functions::FunctionMap;
use crate::registry::{DECLARATION_KEYWORDS, KeywordClass, KeywordRegistry};
use crate::scan::{QuoteState, is_ident_char, is_ident_start};
use crate::source::{SourceLines, is_blank_or_comment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenCategory {
    MapCall,
    BuiltinCall,
    LogicOperator,
    MetaAccessor,
    FunctionDecl,
    FunctionEnd,
    UserFunctionCall,
    ReturnVariable,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 8] = [
        TokenCategory::MapCall,
        TokenCategory::BuiltinCall,
        TokenCategory::LogicOperator,
        TokenCategory::MetaAccessor,
        TokenCategory::FunctionDecl,
        TokenCategory::FunctionEnd,
        TokenCategory::UserFunctionCall,
        TokenCategory::ReturnVariable,
    ];
}

/// A classified span; columns count chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenSpan {
    pub line: usize,
    pub start_column: usize,
    pub length: usize,
    pub category: TokenCategory,
}

impl TokenSpan {
    pub fn end_column(&self) -> usize {
        self.start_column + self.length
    }
}

/// An open call on the current line. `depth` is 0 until its `(` is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CallFrame {
    category: TokenCategory,
    depth: u32,
}

#[derive(Debug, Default)]
struct IfMode {
    active: bool,
    paren_depth: Option<u32>,
}

impl IfMode {
    fn at_top(&self) -> bool {
        self.paren_depth.is_none_or(|d| d == 0)
    }
}

/// Punctuation that ties a bare `@` to the argument syntax of an open call.
const ARGUMENT_PUNCTUATION: &[char] = &['(', ')', ',', ']', '|', '\'', '"', '!'];

const META_ROOTS: &[&str] = &["Data", "Class"];

const MAP_OPERATION_NAMES: &[&str] = &["Get", "Set", "Clear"];

struct LineClassifier<'a> {
    chars: Vec<char>,
    line: usize,
    enclosing: Option<&'a str>,
    registry: &'a KeywordRegistry,
    spans: Vec<TokenSpan>,
    frames: Vec<CallFrame>,
    quote: QuoteState,
    if_mode: IfMode,
}

/// Classify one line. Spans come back ordered by column and never overlap.
pub fn classify_line(
    text: &str,
    line: usize,
    enclosing: Option<&str>,
    registry: &KeywordRegistry,
) -> Vec<TokenSpan> {
    if is_blank_or_comment(text) {
        return Vec::new();
    }
    LineClassifier {
        chars: text.chars().collect(),
        line,
        enclosing,
        registry,
        spans: Vec::new(),
        frames: Vec::new(),
        quote: QuoteState::new(),
        if_mode: IfMode::default(),
    }
    .run()
}

/// Classify every line, taking the enclosing function from `functions`.
pub fn classify_document(
    lines: &SourceLines<'_>,
    functions: &FunctionMap,
    registry: &KeywordRegistry,
) -> Vec<TokenSpan> {
    let mut spans = Vec::new();
    for (line_no, text) in lines.iter() {
        spans.extend(classify_line(text, line_no, functions.enclosing_name(line_no), registry));
    }
    spans
}

impl<'a> LineClassifier<'a> {
    fn run(mut self) -> Vec<TokenSpan> {
        let mut i = 0usize;
        while i < self.chars.len() {
            let consumed = self.quote.step(&self.chars, i);
            if consumed > 0 {
                i += consumed;
                continue;
            }
            if self.quote.inside() {
                i += 1;
                continue;
            }
            i = match self.chars[i] {
                '@' => self.at_marker(i),
                '^' => self.meta_accessor(i),
                '(' => {
                    self.open_paren();
                    i + 1
                }
                ')' => {
                    self.close_paren();
                    i + 1
                }
                '<' | '>' | '=' => self.comparison_operator(i),
                c if is_ident_start(c) => self.word(i),
                _ => i + 1,
            };
        }
        self.spans
    }

    fn emit(&mut self, start: usize, end: usize, category: TokenCategory) {
        if end > start {
            self.spans.push(TokenSpan {
                line: self.line,
                start_column: start,
                length: end - start,
                category,
            });
        }
    }

    fn ident_end(&self, start: usize) -> usize {
        let mut end = start;
        while end < self.chars.len() && is_ident_char(self.chars[end]) {
            end += 1;
        }
        end
    }

    fn skip_blanks(&self, mut i: usize) -> usize {
        while i < self.chars.len() && self.chars[i].is_whitespace() {
            i += 1;
        }
        i
    }

    fn word_is(&self, start: usize, word: &str) -> bool {
        let end = self.ident_end(start);
        end - start == word.len() && self.chars[start..end].iter().copied().eq(word.chars())
    }

    fn ends_with_at_word(&self, end: usize, word: &str) -> bool {
        let len = word.chars().count();
        if end < len {
            return false;
        }
        let start = end - len;
        self.chars[start..end].iter().copied().eq(word.chars())
            && (start == 0 || !is_ident_char(self.chars[start - 1]))
    }

    /// A call opens at `pos` when `(` follows, after optional blanks and one
    /// optional `@`.
    fn call_opens_at(&self, pos: usize) -> bool {
        let mut k = self.skip_blanks(pos);
        if self.chars.get(k) == Some(&'@') {
            k += 1;
        }
        self.chars.get(k) == Some(&'(')
    }

    fn at_marker(&mut self, i: usize) -> usize {
        let name_start = i + 1;
        if !self.chars.get(name_start).is_some_and(|c| is_ident_start(*c)) {
            return self.bare_marker(i);
        }
        let name_end = self.ident_end(name_start);
        let name: String = self.chars[name_start..name_end].iter().collect();

        if name == "Map" && self.chars.get(name_end) == Some(&'.') {
            if let Some(next) = self.map_call(i, name_end + 1) {
                return next;
            }
        }

        if DECLARATION_KEYWORDS.contains(&name.as_str()) {
            return name_end;
        }
        match self.registry.classify(&name) {
            KeywordClass::Control => return self.control_word(i, &name, name_end),
            KeywordClass::Writer => return name_end,
            KeywordClass::Builtin | KeywordClass::Unregistered => {}
        }

        if self.call_opens_at(name_end) {
            let category = if self.registry.is_builtin(&name) {
                TokenCategory::BuiltinCall
            } else {
                TokenCategory::UserFunctionCall
            };
            let span_end = if self.chars.get(name_end) == Some(&'@') {
                name_end + 1
            } else {
                name_end
            };
            self.emit(i, span_end, category);
            self.frames.push(CallFrame { category, depth: 0 });
            return span_end;
        }

        if self.frames.is_empty() {
            name_end
        } else {
            self.bare_marker(i)
        }
    }

    /// `@` that does not start a call. Inside an open call it takes the
    /// call's category when it touches argument syntax.
    fn bare_marker(&mut self, i: usize) -> usize {
        let Some(frame) = self.frames.last().copied() else {
            return i + 1;
        };
        let touches = |c: Option<&char>| c.is_some_and(|c| is_ident_char(*c) || ARGUMENT_PUNCTUATION.contains(c));
        let before = if i > 0 { self.chars.get(i - 1) } else { None };
        if touches(before) || touches(self.chars.get(i + 1)) {
            self.emit(i, i + 1, frame.category);
        }
        i + 1
    }

    /// `@Map.Get`, `@Map.Set`, `@Map.Clear`, optionally followed by `@`.
    fn map_call(&mut self, i: usize, op_start: usize) -> Option<usize> {
        if !self.chars.get(op_start).is_some_and(|c| is_ident_start(*c)) {
            return None;
        }
        let op_end = self.ident_end(op_start);
        let op: String = self.chars[op_start..op_end].iter().collect();
        if !MAP_OPERATION_NAMES.contains(&op.as_str()) {
            return None;
        }
        let end = if self.chars.get(op_end) == Some(&'@') {
            op_end + 1
        } else {
            op_end
        };
        self.emit(i, end, TokenCategory::MapCall);
        if self.call_opens_at(op_end) {
            self.frames.push(CallFrame {
                category: TokenCategory::MapCall,
                depth: 0,
            });
        }
        Some(end)
    }

    fn control_word(&mut self, i: usize, name: &str, name_end: usize) -> usize {
        match name {
            "If" => {
                self.enter_if(name_end);
                name_end
            }
            "Else" => {
                let k = self.skip_blanks(name_end);
                if k > name_end && self.word_is(k, "If") {
                    self.enter_if(k + 2);
                    return k + 2;
                }
                if self.if_mode.active && self.if_mode.at_top() {
                    self.if_mode = IfMode::default();
                }
                name_end
            }
            "Then" => {
                if self.if_mode.active && self.if_mode.at_top() {
                    self.if_mode = IfMode::default();
                }
                name_end
            }
            "Function" if self.chars[..i].iter().all(|c| c.is_whitespace()) => {
                self.emit(i, name_end, TokenCategory::FunctionDecl);
                let k = self.skip_blanks(name_end);
                if k > name_end && self.chars.get(k).is_some_and(|c| is_ident_start(*c)) {
                    let end = self.ident_end(k);
                    self.emit(k, end, TokenCategory::ReturnVariable);
                    return end;
                }
                name_end
            }
            "End" => {
                let k = self.skip_blanks(name_end);
                if k > name_end && self.word_is(k, "Function") {
                    let end = k + "Function".len();
                    self.emit(i, end, TokenCategory::FunctionEnd);
                    return end;
                }
                name_end
            }
            _ => name_end,
        }
    }

    fn enter_if(&mut self, after: usize) {
        let k = self.skip_blanks(after);
        self.if_mode = IfMode {
            active: true,
            paren_depth: (self.chars.get(k) == Some(&'(')).then_some(0),
        };
    }

    fn open_paren(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.depth += 1;
        }
        if self.if_mode.active {
            if let Some(depth) = self.if_mode.paren_depth.as_mut() {
                *depth += 1;
            }
        }
    }

    fn close_paren(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.depth > 0 {
                frame.depth -= 1;
                if frame.depth == 0 {
                    self.frames.pop();
                }
            }
        }
        if self.if_mode.active {
            if let Some(depth) = self.if_mode.paren_depth.as_mut() {
                if *depth > 0 {
                    *depth -= 1;
                    if *depth == 0 {
                        self.if_mode = IfMode::default();
                    }
                }
            }
        }
    }

    fn comparison_operator(&mut self, i: usize) -> usize {
        if !self.if_mode.active {
            return i + 1;
        }
        let len = match (self.chars[i], self.chars.get(i + 1)) {
            ('<', Some('>')) | ('<', Some('=')) | ('>', Some('=')) => 2,
            _ => 1,
        };
        self.emit(i, i + len, TokenCategory::LogicOperator);
        i + len
    }

    fn word(&mut self, i: usize) -> usize {
        let end = self.ident_end(i);
        let boundary = i == 0 || !is_ident_char(self.chars[i - 1]);
        if !boundary {
            return end;
        }
        if self.if_mode.active && (self.word_is(i, "And") || self.word_is(i, "Or")) {
            self.emit(i, end, TokenCategory::LogicOperator);
            return end;
        }
        if let Some(function) = self.enclosing {
            if self.word_is(i, function) && self.is_return_slot(i) {
                self.emit(i, end, TokenCategory::ReturnVariable);
            }
        }
        end
    }

    /// `@Set <name>` or `@Get(<name>`, with `name` starting at `i`.
    fn is_return_slot(&self, i: usize) -> bool {
        let mut k = i;
        while k > 0 && self.chars[k - 1].is_whitespace() {
            k -= 1;
        }
        let had_blank = k < i;
        if k > 0 && self.chars[k - 1] == '(' {
            k -= 1;
            if k > 0 && self.chars[k - 1] == '@' {
                k -= 1;
            }
            while k > 0 && self.chars[k - 1].is_whitespace() {
                k -= 1;
            }
            return self.ends_with_at_word(k, "@Get");
        }
        had_blank && self.ends_with_at_word(k, "@Set")
    }

    /// `^Data` / `^Class` extended through `.ident`, `[...]` and `!`.
    fn meta_accessor(&mut self, i: usize) -> usize {
        let root_start = i + 1;
        if !self.chars.get(root_start).is_some_and(|c| is_ident_start(*c)) {
            return i + 1;
        }
        let root_end = self.ident_end(root_start);
        let root: String = self.chars[root_start..root_end].iter().collect();
        if !META_ROOTS.contains(&root.as_str()) {
            return root_end;
        }
        let mut j = root_end;
        loop {
            match self.chars.get(j) {
                Some('.') if self.chars.get(j + 1).is_some_and(|c| is_ident_start(*c)) => {
                    j = self.ident_end(j + 1);
                }
                Some('[') => {
                    j = match self.chars[j + 1..].iter().position(|c| *c == ']') {
                        Some(offset) => j + 1 + offset + 1,
                        None => self.chars.len(),
                    };
                }
                Some('!') => j += 1,
                _ => break,
            }
        }
        self.emit(i, j, TokenCategory::MetaAccessor);
        j
    }
}
