#[cfg(test)]
mod tests {
    use crate::blocks::{BlockRange, block_markers, scan_blocks};
    use crate::diagnostic::{BlockKind, DiagnosticKind};
    use crate::source::SourceLines;

    fn scan(text: &str) -> crate::blocks::BlockScan {
        scan_blocks(&SourceLines::new(text))
    }

    #[test]
    fn test_balanced_if() {
        let result = scan("@If a @Then\n  @Write x\n@End If");
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            result.ranges,
            vec![BlockRange {
                kind: BlockKind::If,
                start_line: 0,
                end_line: 2
            }]
        );
    }

    #[test]
    fn test_unmatched_end_if() {
        let result = scan("@End If");
        assert_eq!(result.diagnostics.len(), 1);
        let d = &result.diagnostics[0];
        assert_eq!(d.kind, DiagnosticKind::UnmatchedEnd(BlockKind::If));
        assert_eq!((d.line, d.start_column, d.end_column), (0, 0, 7));
        assert_eq!(d.message, "Unmatched @End If: no open @If block");
    }

    #[test]
    fn test_missing_end_reported_at_open_line() {
        let result = scan("@For x\n@If a @Then");
        let mut found: Vec<(DiagnosticKind, usize)> = result.diagnostics.iter().map(|d| (d.kind, d.line)).collect();
        found.sort_by_key(|(_, line)| *line);
        assert_eq!(
            found,
            vec![
                (DiagnosticKind::MissingEnd(BlockKind::For), 0),
                (DiagnosticKind::MissingEnd(BlockKind::If), 1),
            ]
        );
    }

    #[test]
    fn test_kinds_are_matched_independently() {
        let result = scan("@If a @Then\n@End For\n@End If");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnmatchedEnd(BlockKind::For));
        assert_eq!(result.diagnostics[0].line, 1);
    }

    #[test]
    fn test_else_if_does_not_open_a_block() {
        let result = scan("@If a @Then\n@Else If b @Then\n@Else\n@End If");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.ranges.len(), 1);
    }

    #[test]
    fn test_comments_and_quotes_are_ignored() {
        assert_eq!(scan("# @If a\n@End If").diagnostics.len(), 1);
        assert!(scan("@Write '@If @For'").diagnostics.is_empty());
    }

    #[test]
    fn test_nested_ranges_sorted() {
        let result = scan("@If a @Then\n@For x\n@End For\n@End If");
        let ranges: Vec<(BlockKind, usize, usize)> =
            result.ranges.iter().map(|r| (r.kind, r.start_line, r.end_line)).collect();
        assert_eq!(ranges, vec![(BlockKind::If, 0, 3), (BlockKind::For, 1, 2)]);
    }

    #[test]
    fn test_markers_on_one_line_in_column_order() {
        let result = scan("@If a @Then @Write x @End If");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.ranges[0].start_line, 0);
        assert_eq!(result.ranges[0].end_line, 0);

        let markers = block_markers("@End   Function @Function");
        assert_eq!(markers.len(), 2);
        assert!(markers[0].is_end);
        assert_eq!(markers[0].kind, BlockKind::Function);
        assert_eq!((markers[0].start_column, markers[0].end_column), (0, 15));
        assert!(!markers[1].is_end);
        assert_eq!(markers[1].start_column, 16);
    }

    #[test]
    fn test_word_boundary() {
        assert!(block_markers("@Iffy @Format @Endif").is_empty());
    }
}
