#[cfg(test)]
mod tests {
    use crate::diagnostic::DiagnosticKind;
    use crate::functions::FunctionMap;
    use crate::scope::{DeclaredNames, check_scopes, variable_uses};
    use crate::source::SourceLines;

    fn check(text: &str) -> Vec<crate::diagnostic::Diagnostic> {
        let lines = SourceLines::new(text);
        let functions = FunctionMap::build(&lines);
        check_scopes(&lines, &functions)
    }

    fn lines_of(text: &str) -> Vec<usize> {
        check(text).into_iter().map(|d| d.line).collect()
    }

    #[test]
    fn test_undeclared_in_function() {
        let found = check("@Function F\n  @Get(x)\n@End Function");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DiagnosticKind::UndeclaredVariable);
        assert_eq!((found[0].line, found[0].start_column, found[0].end_column), (1, 7, 8));
        assert_eq!(found[0].message, "Variable 'x' is not declared in function 'F' or globally");
    }

    #[test]
    fn test_undeclared_at_top_level() {
        let found = check("@Set y");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start_column, found[0].end_column), (5, 6));
        assert_eq!(found[0].message, "Variable 'y' is not declared globally");
    }

    #[test]
    fn test_global_visible_in_function() {
        assert!(check("@String g\n@Function F\n@Set g\n@End Function").is_empty());
    }

    #[test]
    fn test_local_invisible_outside_owner() {
        assert_eq!(lines_of("@Function F\n@Int i\n@Set i\n@End Function\n@Set i"), vec![4]);
        assert_eq!(
            lines_of("@Function A\n@String s\n@End Function\n@Function B\n@Get(s)\n@End Function"),
            vec![4]
        );
    }

    #[test]
    fn test_function_name_is_return_variable() {
        assert!(check("@Function F\n@Set F\n@Get(F)\n@End Function").is_empty());
        assert_eq!(lines_of("@Function F\n@End Function\n@Set F"), vec![2]);
    }

    #[test]
    fn test_declarations_accumulate_top_down() {
        assert_eq!(lines_of("@Function F\n@Set v\n@String v\n@Set v\n@End Function"), vec![1]);
    }

    #[test]
    fn test_every_use_on_a_line_is_checked() {
        let spans: Vec<(usize, usize)> = check("@Set a @Get(b) @Get( c )")
            .into_iter()
            .map(|d| (d.start_column, d.end_column))
            .collect();
        assert_eq!(spans, vec![(5, 6), (12, 13), (21, 22)]);
    }

    #[test]
    fn test_quoted_uses_are_ignored() {
        assert!(check("@Write '@Get(z) @Set q'").is_empty());
        assert!(check("# @Set z").is_empty());
    }

    #[test]
    fn test_unnamed_function_message() {
        let found = check("@Function\n@Get(q)\n@End Function");
        assert_eq!(found[0].message, "Variable 'q' is not declared in function or globally");
    }

    #[test]
    fn test_variable_uses_and_declared_names() {
        let uses = variable_uses("@Set  total @Get(count)");
        let names: Vec<&str> = uses.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["total", "count"]);

        let mut declared = DeclaredNames::new();
        declared.declare(None, "g");
        declared.declare(Some(0), "l");
        assert!(declared.is_visible(None, "g"));
        assert!(declared.is_visible(Some(3), "g"));
        assert!(declared.is_visible(Some(0), "l"));
        assert!(!declared.is_visible(None, "l"));
        assert!(!declared.is_visible(Some(1), "l"));
    }
}
