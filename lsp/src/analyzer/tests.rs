use super::*;
use abl_core::{AnalyzerConfig, TokenCategory};

const DOC: &str = "@String g
@Function Calc
  @Int n
  @If @Get(n) > 1 @Then
    @Set Calc = @Upper(@Get(g))
  @End If
@End Function
@Write @Calc(1)";

fn create_analyzer() -> AblLspAnalyzer {
    AblLspAnalyzer::new(AnalyzerConfig::default())
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_str()).collect()
}

fn hover_text(hover: Option<Hover>) -> String {
    match hover.map(|h| h.contents) {
        Some(HoverContents::Markup(markup)) => markup.value,
        other => panic!("expected markup hover, got {other:?}"),
    }
}

#[test]
fn test_analyze_clean_document() {
    let result = create_analyzer().analyze(DOC);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let names: Vec<(&str, SymbolKind)> = result.symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();
    assert_eq!(names, vec![("g", SymbolKind::VARIABLE), ("Calc", SymbolKind::FUNCTION)]);

    let calc = &result.symbols[1];
    assert_eq!(calc.range.start.line, 1);
    assert_eq!(calc.range.end.line, 6);
    assert_eq!(calc.selection_range, Range::new(Position::new(1, 10), Position::new(1, 14)));
    let children = calc.children.as_ref().expect("function locals");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "n");
    assert_eq!(children[0].detail.as_deref(), Some("Int"));
}

#[test]
fn test_folding_ranges_follow_blocks() {
    let result = create_analyzer().analyze(DOC);
    let folds: Vec<(u32, u32)> = result.folding_ranges.iter().map(|f| (f.start_line, f.end_line)).collect();
    assert_eq!(folds, vec![(1, 6), (3, 5)]);
    assert_eq!(result.folding_ranges[0].kind, Some(FoldingRangeKind::Region));
    assert_eq!(result.folding_ranges[0].collapsed_text.as_deref(), Some("@Function ..."));
}

#[test]
fn test_diagnostic_conversion() {
    let result = create_analyzer().analyze("@End If");
    assert_eq!(result.diagnostics.len(), 1);
    let d = &result.diagnostics[0];
    assert_eq!(d.severity, Some(DiagnosticSeverity::ERROR));
    assert_eq!(d.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
    assert_eq!(d.code, Some(NumberOrString::String("unmatched-end".to_string())));
    assert_eq!(d.range.start, Position::new(0, 0));
}

#[test]
fn test_diagnostic_columns_are_utf16() {
    let result = create_analyzer().analyze("'😀' @Set v");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].range,
        Range::new(Position::new(0, 10), Position::new(0, 11))
    );
}

#[test]
fn test_semantic_tokens_are_delta_encoded() {
    let analyzer = create_analyzer();
    let (builtin_type, builtin_mods) = token_type(TokenCategory::BuiltinCall);
    let tokens = analyzer.generate_semantic_tokens("@Length(x)\n@Length(y)");
    assert_eq!(
        tokens,
        vec![
            SemanticToken {
                delta_line: 0,
                delta_start: 0,
                length: 7,
                token_type: builtin_type,
                token_modifiers_bitset: builtin_mods,
            },
            SemanticToken {
                delta_line: 1,
                delta_start: 0,
                length: 7,
                token_type: builtin_type,
                token_modifiers_bitset: builtin_mods,
            },
        ]
    );
    assert_eq!(analyzer.analyze("@Length(x)\n@Length(y)").semantic_tokens, tokens);
}

#[test]
fn test_semantic_tokens_same_line_and_utf16() {
    let analyzer = create_analyzer();
    let tokens = analyzer.generate_semantic_tokens("@If a = b And c <> d @Then");
    let positions: Vec<(u32, u32, u32)> = tokens.iter().map(|t| (t.delta_line, t.delta_start, t.length)).collect();
    assert_eq!(positions, vec![(0, 6, 1), (0, 4, 3), (0, 6, 2)]);

    let tokens = analyzer.generate_semantic_tokens("'😀' @Length(x)");
    assert_eq!(tokens.len(), 1);
    assert_eq!((tokens[0].delta_start, tokens[0].length), (5, 7));
}

#[test]
fn test_semantic_tokens_in_range() {
    let result = create_analyzer().analyze("@Length(x)\n@Length(y)\n@Length(z)");
    let tokens = result.semantic_tokens_in_range(Range::new(Position::new(1, 0), Position::new(1, 10)));
    assert_eq!(tokens.len(), 1);
    assert_eq!((tokens[0].delta_line, tokens[0].delta_start, tokens[0].length), (1, 0, 7));

    let tokens = result.semantic_tokens_in_range(Range::new(Position::new(1, 8), Position::new(2, 0)));
    assert!(tokens.is_empty());
}

#[test]
fn test_semantic_tokens_are_capped() {
    let content = "@Length(x)\n".repeat(MAX_TOKENS_PER_DOC + 10);
    let result = create_analyzer().analyze(&content);
    assert_eq!(result.core.tokens.len(), MAX_TOKENS_PER_DOC + 10);
    assert_eq!(result.semantic_tokens.len(), MAX_TOKENS_PER_DOC);

    let whole = Range::new(Position::new(0, 0), Position::new(MAX_TOKENS_PER_DOC as u32 + 20, 0));
    assert_eq!(result.semantic_tokens_in_range(whole).len(), MAX_TOKENS_PER_DOC);
}

#[test]
fn test_legend_covers_every_category() {
    let legend = legend();
    for category in TokenCategory::ALL {
        let (ty, mods) = token_type(category);
        assert!((ty as usize) < legend.token_types.len());
        assert!(mods < (1 << legend.token_modifiers.len()));
    }
}

#[test]
fn test_variable_completions_are_scope_aware() {
    let analyzer = create_analyzer();
    let result = analyzer.analyze(DOC);
    let items = analyzer.completions(&result, Position::new(4, 9));
    assert_eq!(labels(&items), vec!["Calc", "g", "n"]);

    let top_level = analyzer.analyze("@String g\n@Function F\n@Int n\n@End Function\n@Get(");
    let items = analyzer.completions(&top_level, Position::new(4, 5));
    assert_eq!(labels(&items), vec!["g"]);
}

#[test]
fn test_marker_completions() {
    let analyzer = create_analyzer();
    let result = analyzer.analyze(DOC);
    let items = analyzer.completions(&result, Position::new(7, 8));
    let names = labels(&items);
    for expected in ["Calc", "If", "End If", "Length", "Map.Get", "Write", "String"] {
        assert!(names.contains(&expected), "missing {expected} in {names:?}");
    }
    let if_item = items.iter().find(|i| i.label == "If").expect("If snippet");
    assert_eq!(if_item.insert_text_format, Some(InsertTextFormat::SNIPPET));
    let length = items.iter().find(|i| i.label == "Length").expect("Length builtin");
    assert_eq!(length.detail.as_deref(), Some("@Length(text)"));

    let filtered = analyzer.analyze("@Le");
    assert_eq!(labels(&analyzer.completions(&filtered, Position::new(0, 3))), vec!["Length"]);
}

#[test]
fn test_map_meta_and_plain_completions() {
    let analyzer = create_analyzer();
    let result = analyzer.analyze("@Map.\n^\nplain");
    assert_eq!(
        labels(&analyzer.completions(&result, Position::new(0, 5))),
        vec!["Clear", "Get", "Set"]
    );
    assert_eq!(labels(&analyzer.completions(&result, Position::new(1, 1))), vec!["Class", "Data"]);
    assert!(analyzer.completions(&result, Position::new(2, 5)).is_empty());
}

#[test]
fn test_configured_names_are_completed() {
    let config = AnalyzerConfig::default().extend_keywords(vec!["Lookup".to_string()], vec!["Emit".to_string()]);
    let analyzer = AblLspAnalyzer::new(config);
    let result = analyzer.analyze("@");
    let items = analyzer.completions(&result, Position::new(0, 1));
    let names = labels(&items);
    assert!(names.contains(&"Lookup"));
    assert!(names.contains(&"Emit"));
}

#[test]
fn test_hover_on_symbols() {
    let analyzer = create_analyzer();
    let result = analyzer.analyze(DOC);

    let text = hover_text(analyzer.hover(&result, Position::new(7, 9)));
    assert!(text.contains("@Function Calc"), "{text}");
    assert!(text.contains("lines 2-7"), "{text}");

    let text = hover_text(analyzer.hover(&result, Position::new(4, 28)));
    assert!(text.contains("Global variable, declared on line 1."), "{text}");

    let text = hover_text(analyzer.hover(&result, Position::new(2, 7)));
    assert!(text.contains("Local variable of `Calc`"), "{text}");
}

#[test]
fn test_hover_on_keywords() {
    let analyzer = create_analyzer();
    let result = analyzer.analyze(DOC);

    let hover = analyzer.hover(&result, Position::new(4, 18));
    assert_eq!(
        hover.as_ref().and_then(|h| h.range),
        Some(Range::new(Position::new(4, 17), Position::new(4, 22)))
    );
    assert!(hover_text(hover).contains("@Upper(text)"));

    let text = hover_text(analyzer.hover(&result, Position::new(3, 3)));
    assert!(text.contains("@Then"), "{text}");

    let other = analyzer.analyze("# @Length(x)\n@Map.Clear()\n@Write ^Data.Name!");
    assert!(analyzer.hover(&other, Position::new(0, 4)).is_none());
    assert!(hover_text(analyzer.hover(&other, Position::new(1, 7))).contains("@Map.Clear()"));
    assert!(hover_text(analyzer.hover(&other, Position::new(2, 9))).contains("^Data"));
}

#[test]
fn test_navigation() {
    let result = create_analyzer().analyze(DOC);
    assert_eq!(
        result.definition(Position::new(7, 9)),
        Some(Range::new(Position::new(1, 10), Position::new(1, 14)))
    );
    assert_eq!(result.definition(Position::new(6, 2)), None);

    let refs = result.references(Position::new(0, 8), true);
    assert_eq!(
        refs,
        vec![
            Range::new(Position::new(0, 8), Position::new(0, 9)),
            Range::new(Position::new(4, 28), Position::new(4, 29)),
        ]
    );
    assert_eq!(result.references(Position::new(0, 8), false).len(), 1);

    let kinds: Vec<Option<DocumentHighlightKind>> =
        result.highlights(Position::new(0, 8)).into_iter().map(|h| h.kind).collect();
    assert_eq!(
        kinds,
        vec![Some(DocumentHighlightKind::WRITE), Some(DocumentHighlightKind::READ)]
    );
}
