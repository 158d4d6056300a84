use abl_core::{AblAnalyzer, AnalyzerConfig, BlockKind, DiagnosticKind, TokenCategory};

fn analyzer() -> AblAnalyzer {
    AblAnalyzer::new(AnalyzerConfig::default())
}

#[test]
fn test_well_formed_if_block() {
    let analysis = analyzer().analyze("@If a = b @Then\nstatement\n@End If");
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    assert_eq!(analysis.tokens.len(), 1);
    let token = analysis.tokens[0];
    assert_eq!(token.category, TokenCategory::LogicOperator);
    assert_eq!((token.line, token.start_column, token.length), (0, 6, 1));
    assert_eq!(analysis.blocks.len(), 1);
}

#[test]
fn test_if_without_then() {
    let diagnostics = analyzer().validate("@If a = b\nstatement\nmore\n@End If");
    let missing: Vec<_> = diagnostics.iter().filter(|d| d.kind == DiagnosticKind::MissingThen).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].line, 0);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_lone_end_if() {
    let diagnostics = analyzer().validate("@End If");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnmatchedEnd(BlockKind::If));
    assert_eq!(diagnostics[0].line, 0);
    assert_eq!(diagnostics[0].to_string(), "Line 1:1: Unmatched @End If: no open @If block");
}

#[test]
fn test_undeclared_variable_in_function() {
    let diagnostics = analyzer().validate("@Function F\n@Get(x)\n@End Function");
    assert_eq!(diagnostics.len(), 1);
    let d = &diagnostics[0];
    assert_eq!(d.kind, DiagnosticKind::UndeclaredVariable);
    assert_eq!((d.line, d.start_column, d.end_column), (1, 5, 6));
}

#[test]
fn test_unterminated_string_in_condition() {
    let diagnostics = analyzer().validate("@If a = 'open @Then\n@End If");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnterminatedString);
    assert_eq!(diagnostics[0].line, 0);
}

#[test]
fn test_map_call_tokens() {
    let tokens = analyzer().classify("@Map.Get@(Key@)");
    let found: Vec<(usize, usize, TokenCategory)> =
        tokens.iter().map(|t| (t.start_column, t.length, t.category)).collect();
    assert_eq!(
        found,
        vec![(0, 9, TokenCategory::MapCall), (13, 1, TokenCategory::MapCall)]
    );
}

#[test]
fn test_diagnostics_sorted_and_capped() {
    let text = "@Set b\n@End If\n@Set a @Set c\n@End For";
    let diagnostics = analyzer().validate(text);
    let positions: Vec<(usize, usize)> = diagnostics.iter().map(|d| (d.line, d.start_column)).collect();
    assert_eq!(positions, vec![(0, 5), (1, 0), (2, 5), (2, 12), (3, 0)]);

    let capped = AblAnalyzer::new(AnalyzerConfig::default().with_max_diagnostics(2)).validate(text);
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[1].line, 1);
}

#[test]
fn test_configured_lookahead() {
    let text = "@If a\nb\nc\nd\n@Then\n@End If";
    assert_eq!(analyzer().validate(text).len(), 1);
    let relaxed = AblAnalyzer::new(AnalyzerConfig::default().with_then_lookahead(4));
    assert!(relaxed.validate(text).is_empty());
}

#[test]
fn test_full_rule_file() {
    let text = "\
# header comment
@String current
@Function Describe
  @String label
  @Set label = @Token(1)
  @If @Length(@Get(label)) > 3 And @Get(current) <> ''
  @Then
    @Set Describe = @Upper(@Get(label))
  @Else If ^Data.Token[1].Kind! = 'word'
  @Then
    @For x
      @WriteLine('@Get(x)')
    @End For
  @End If
@End Function
@Write @Describe(1)
";
    let analysis = analyzer().analyze(text);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    assert_eq!(analysis.functions.functions().len(), 1);
    assert_eq!(analysis.blocks.len(), 3);
    let categories: Vec<TokenCategory> = analysis.tokens.iter().map(|t| t.category).collect();
    assert!(categories.contains(&TokenCategory::FunctionDecl));
    assert!(categories.contains(&TokenCategory::FunctionEnd));
    assert!(categories.contains(&TokenCategory::ReturnVariable));
    assert!(categories.contains(&TokenCategory::MetaAccessor));
    assert!(categories.contains(&TokenCategory::UserFunctionCall));
    assert!(categories.contains(&TokenCategory::BuiltinCall));
    assert!(categories.contains(&TokenCategory::LogicOperator));
}

#[test]
fn test_classify_line_facade() {
    let tokens = analyzer().classify_line("@Set F", 3, Some("F"));
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].line, 3);
    assert_eq!(tokens[0].category, TokenCategory::ReturnVariable);
}
