use abl_core::AnalyzerConfig;
use abl_lsp::analyzer::AblLspAnalyzer;
use tower_lsp::lsp_types::{NumberOrString, Position};

const DOC: &str = "@Function F
@If x = 'open @Then
@Get(y)
@End Function
@End For";

fn codes_and_starts(content: &str, config: AnalyzerConfig) -> Vec<(String, Position)> {
    AblLspAnalyzer::new(config)
        .analyze(content)
        .diagnostics
        .into_iter()
        .map(|d| {
            let code = match d.code {
                Some(NumberOrString::String(code)) => code,
                other => panic!("unexpected code {other:?}"),
            };
            (code, d.range.start)
        })
        .collect()
}

#[test]
fn test_diagnostics_sorted_with_positions() {
    let found = codes_and_starts(DOC, AnalyzerConfig::default());
    assert_eq!(
        found,
        vec![
            ("missing-end".to_string(), Position::new(1, 0)),
            ("unterminated-string".to_string(), Position::new(1, 8)),
            ("undeclared-variable".to_string(), Position::new(2, 5)),
            ("unmatched-end".to_string(), Position::new(4, 0)),
        ]
    );
}

#[test]
fn test_messages_name_the_scope() {
    let result = AblLspAnalyzer::new(AnalyzerConfig::default()).analyze(DOC);
    let undeclared = result
        .diagnostics
        .iter()
        .find(|d| d.range.start.line == 2)
        .expect("undeclared variable diagnostic");
    assert_eq!(undeclared.message, "Variable 'y' is not declared in function 'F' or globally");
}

#[test]
fn test_cap_applies_to_lsp_diagnostics() {
    let found = codes_and_starts(DOC, AnalyzerConfig::default().with_max_diagnostics(2));
    assert_eq!(found.len(), 2);
    assert_eq!(found[1].0, "unterminated-string");
}

#[test]
fn test_crlf_documents() {
    let found = codes_and_starts("@If a @Then\r\n@End If\r\n@End If\r\n", AnalyzerConfig::default());
    assert_eq!(found, vec![("unmatched-end".to_string(), Position::new(2, 0))]);
}
