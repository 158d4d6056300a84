#[cfg(test)]
mod tests {
    use crate::diagnostic::DiagnosticKind;
    use crate::literals::{check_literals, condition_text};
    use crate::source::SourceLines;

    fn check(text: &str) -> Vec<(usize, usize, usize)> {
        check_literals(&SourceLines::new(text))
            .into_iter()
            .map(|d| (d.line, d.start_column, d.end_column))
            .collect()
    }

    #[test]
    fn test_unterminated_right_operand() {
        let found = check_literals(&SourceLines::new("@If a = 'open @Then"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DiagnosticKind::UnterminatedString);
        assert_eq!(found[0].message, "Unterminated string in comparison");
        assert_eq!((found[0].start_column, found[0].end_column), (8, 19));
    }

    #[test]
    fn test_terminated_operands_pass() {
        assert!(check("@If a = 'ok' @Then").is_empty());
        assert!(check("@If a = '' @Then").is_empty());
        assert!(check("@If 'x''y' <> b @Then").is_empty());
        assert!(check("@If @Length(a) > 3 @Then").is_empty());
    }

    #[test]
    fn test_one_report_per_line() {
        assert_eq!(check("@If a = 'x' And b = 'y @Then"), vec![(0, 20, 28)]);
        assert_eq!(check("@If a = 'x\n@Else If b = 'y").len(), 2);
    }

    #[test]
    fn test_parens_are_unwrapped() {
        assert_eq!(check("@If (a) = ('x)"), vec![(0, 11, 13)]);
        assert!(check("@If (a) = ('x') @Then").is_empty());
    }

    #[test]
    fn test_parenthesized_comparison_is_not_split() {
        assert!(check("@If (a = 'x)").is_empty());
        assert!(check("@If (a = 'x') @Then").is_empty());
    }

    #[test]
    fn test_paren_inside_literal_is_kept() {
        assert!(check("@If a = ('x)') @Then").is_empty());
    }

    #[test]
    fn test_double_quoted_operand() {
        assert_eq!(check("@If a = \"x @Then").len(), 1);
        assert!(check("@If a = \"x\" @Then").is_empty());
    }

    #[test]
    fn test_either_quote_closes_an_operand() {
        assert!(check("@If a = 'x\"").is_empty());
        assert!(check("@If a = \"x'").is_empty());
        assert_eq!(check("@If a = '"), vec![(0, 8, 9)]);
    }

    #[test]
    fn test_only_condition_lines_are_checked() {
        assert!(check("@Write a = 'x").is_empty());
        assert!(check("# @If a = 'x").is_empty());
    }

    #[test]
    fn test_condition_text_stops_at_then() {
        assert_eq!(condition_text("@If a = 'x' @Then y"), Some((3, " a = 'x' ")));
        assert_eq!(condition_text("@Else If b"), Some((8, " b")));
        assert_eq!(condition_text("@Write x"), None);
    }
}
