#[cfg(test)]
mod tests {
    use crate::diagnostic::DiagnosticKind;
    use crate::source::SourceLines;
    use crate::then::{check_then, condition_marker};

    fn check(text: &str) -> Vec<(usize, String)> {
        check_then(&SourceLines::new(text), 2)
            .into_iter()
            .map(|d| (d.line, d.message))
            .collect()
    }

    #[test]
    fn test_then_on_same_line() {
        assert!(check("@If a = b @Then\n@End If").is_empty());
    }

    #[test]
    fn test_missing_then() {
        let found = check_then(&SourceLines::new("@If a = b\nstatement\nother\n@End If"), 2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DiagnosticKind::MissingThen);
        assert_eq!((found[0].line, found[0].start_column, found[0].end_column), (0, 0, 3));
        assert_eq!(found[0].message, "Missing @Then after @If");
    }

    #[test]
    fn test_then_within_lookahead_skips_blank_and_comment_lines() {
        assert!(check("@If a = b\n\n# comment\n  And c = d\n@Then").is_empty());
        assert!(check("@If a = b\n@Then").is_empty());
    }

    #[test]
    fn test_then_beyond_lookahead() {
        assert_eq!(check("@If a\nb\nc\n@Then").len(), 1);
        assert!(check_then(&SourceLines::new("@If a\nb\nc\n@Then"), 3).is_empty());
    }

    #[test]
    fn test_else_if_message() {
        assert_eq!(
            check("@If a @Then\n@Else If b\nx\ny\n@End If"),
            vec![(1, "Missing @Then after @Else If".to_string())]
        );
    }

    #[test]
    fn test_quoted_if_is_not_a_condition() {
        assert!(check("@Write '@If x'").is_empty());
        assert!(condition_marker("@Write '@If x'").is_none());
        let marker = condition_marker("  @Else  If x").unwrap();
        assert!(marker.is_else_if);
        assert_eq!((marker.start_column, marker.end_column), (2, 11));
    }
}
