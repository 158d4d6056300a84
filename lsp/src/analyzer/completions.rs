use abl_core::registry::{builtin_doc, MAP_OPERATIONS};
use abl_core::{Analysis, DeclarationKind, KeywordRegistry};
use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent, MarkupKind,
};

static VARIABLE_CONTEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:@Get[ \t]*\([ \t]*|@Set[ \t]+)([A-Za-z0-9_]*)$").expect("variable context pattern")
});
static MAP_CONTEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@Map\.([A-Za-z]*)$").expect("map context pattern"));
static META_CONTEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\^([A-Za-z]*)$").expect("meta context pattern"));
static MARKER_CONTEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z0-9_]*)$").expect("marker context pattern"));

/// `(label, snippet)` for control-flow words.
const CONTROL_SNIPPETS: &[(&str, &str)] = &[
    ("If", "If ${1:condition} @Then\n\t$0\n@End If"),
    ("Else If", "Else If ${1:condition} @Then"),
    ("Else", "Else"),
    ("Then", "Then"),
    ("For", "For ${1:item}\n\t$0\n@End For"),
    ("Function", "Function ${1:Name}\n\t$0\n@End Function"),
    ("End If", "End If"),
    ("End For", "End For"),
    ("End Function", "End Function"),
    ("Break", "Break"),
    ("Continue", "Continue"),
];

const DECLARATION_SNIPPETS: &[(&str, &str)] = &[
    ("String", "String ${1:name}"),
    ("Int", "Int ${1:name}"),
    ("Set", "Set ${1:name} = $0"),
];

/// Meta accessors offered after `^`.
pub(crate) const META_ACCESSORS: &[(&str, &str)] = &[
    ("Data", "Fields of the token being transformed, e.g. `^Data.Token[1].Name!`."),
    ("Class", "Class information of the token being transformed."),
];

fn markdown(value: String) -> Documentation {
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    })
}

fn snippet(label: &str, insert: &str, kind: CompletionItemKind, detail: &str) -> CompletionItem {
    CompletionItem {
        label: label.to_string(),
        kind: Some(kind),
        detail: Some(detail.to_string()),
        insert_text: Some(insert.to_string()),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        ..Default::default()
    }
}

fn matches_prefix(label: &str, typed: &str) -> bool {
    typed.is_empty() || label.to_ascii_lowercase().starts_with(&typed.to_ascii_lowercase())
}

/// Completions for the text before the cursor on `line`.
pub(crate) fn completions(
    analysis: &Analysis,
    registry: &KeywordRegistry,
    line: usize,
    line_prefix: &str,
) -> Vec<CompletionItem> {
    let mut items = if let Some(caps) = VARIABLE_CONTEXT_RE.captures(line_prefix) {
        variable_items(analysis, line)
            .into_iter()
            .filter(|i| matches_prefix(&i.label, &caps[1]))
            .collect()
    } else if let Some(caps) = MAP_CONTEXT_RE.captures(line_prefix) {
        map_items(false)
            .into_iter()
            .filter(|i| matches_prefix(&i.label, &caps[1]))
            .collect()
    } else if let Some(caps) = META_CONTEXT_RE.captures(line_prefix) {
        META_ACCESSORS
            .iter()
            .filter(|(name, _)| matches_prefix(name, &caps[1]))
            .map(|(name, doc)| CompletionItem {
                label: name.to_string(),
                kind: Some(CompletionItemKind::PROPERTY),
                detail: Some(format!("^{name}")),
                documentation: Some(markdown(doc.to_string())),
                ..Default::default()
            })
            .collect()
    } else if let Some(caps) = MARKER_CONTEXT_RE.captures(line_prefix) {
        marker_items(analysis, registry)
            .into_iter()
            .filter(|i| matches_prefix(&i.label, &caps[1]))
            .collect()
    } else {
        Vec::new()
    };
    items.sort_by(|a, b| a.label.cmp(&b.label));
    items.dedup_by(|a, b| a.label == b.label);
    items
}

fn marker_items(analysis: &Analysis, registry: &KeywordRegistry) -> Vec<CompletionItem> {
    let mut items = Vec::new();

    for (label, insert) in CONTROL_SNIPPETS {
        items.push(snippet(label, insert, CompletionItemKind::KEYWORD, "ABL control"));
    }
    for (label, insert) in DECLARATION_SNIPPETS {
        items.push(snippet(label, insert, CompletionItemKind::KEYWORD, "ABL declaration"));
    }
    for name in registry.writer_names() {
        items.push(CompletionItem {
            label: name.to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some("ABL output".to_string()),
            ..Default::default()
        });
    }
    for name in registry.builtin_names() {
        let mut item = snippet(name, &format!("{name}($0)"), CompletionItemKind::FUNCTION, "builtin");
        if let Some(doc) = builtin_doc(name) {
            item.detail = Some(doc.signature.to_string());
            item.documentation = Some(markdown(doc.summary.to_string()));
        }
        items.push(item);
    }
    items.extend(map_items(true));
    for decl in analysis.outline.function_declarations() {
        items.push(snippet(
            &decl.name,
            &format!("{}($0)", decl.name),
            CompletionItemKind::FUNCTION,
            &format!("Function (line {})", decl.line + 1),
        ));
    }
    items
}

fn map_items(qualified: bool) -> Vec<CompletionItem> {
    MAP_OPERATIONS
        .iter()
        .map(|op| {
            let label = if qualified {
                format!("Map.{}", op.name)
            } else {
                op.name.to_string()
            };
            let mut item = snippet(&label, &format!("{label}($0)"), CompletionItemKind::METHOD, op.signature);
            item.documentation = Some(markdown(op.summary.to_string()));
            item
        })
        .collect()
}

/// Locals first, then globals they do not shadow, then the enclosing function's return variable.
fn variable_items(analysis: &Analysis, line: usize) -> Vec<CompletionItem> {
    let owner = analysis.functions.owner(line);
    let mut visible = analysis.outline.visible_variables(owner);
    visible.sort_by_key(|d| d.function.is_none());

    let mut items: Vec<CompletionItem> = Vec::new();
    for decl in visible {
        if items.iter().any(|i| i.label == decl.name) {
            continue;
        }
        let scope = if decl.function.is_some() { "local" } else { "global" };
        items.push(CompletionItem {
            label: decl.name.clone(),
            kind: Some(CompletionItemKind::VARIABLE),
            detail: Some(format!("{} ({scope})", decl.kind.label())),
            ..Default::default()
        });
    }
    if let Some(name) = analysis.functions.enclosing_name(line) {
        if !items.iter().any(|i| i.label == name) {
            items.push(CompletionItem {
                label: name.to_string(),
                kind: Some(CompletionItemKind::VARIABLE),
                detail: Some(format!("{} return value", DeclarationKind::Function.label())),
                ..Default::default()
            });
        }
    }
    items
}
