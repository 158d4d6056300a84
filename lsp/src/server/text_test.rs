#[cfg(test)]
mod tests {
    use ropey::Rope;
    use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent};

    use crate::server::text::{apply_incremental_change_rope, position_to_char_idx};

    fn change(range: Option<Range>, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range,
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_position_mapping_counts_utf16() {
        let rope = Rope::from_str("'😀' @Set v\n@End If");
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 3)), 2);
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 10)), 9);
        assert_eq!(position_to_char_idx(&rope, Position::new(1, 0)), 12);
    }

    #[test]
    fn test_position_mapping_clamps() {
        let rope = Rope::from_str("@If\n@End If");
        assert_eq!(position_to_char_idx(&rope, Position::new(0, 40)), 3);
        assert_eq!(position_to_char_idx(&rope, Position::new(9, 0)), rope.len_chars());
    }

    #[test]
    fn test_incremental_edits() {
        let mut rope = Rope::from_str("@If a @Then\n@End If");
        let range = Range::new(Position::new(0, 4), Position::new(0, 5));
        apply_incremental_change_rope(&mut rope, &change(Some(range), "x = 1"));
        assert_eq!(rope.to_string(), "@If x = 1 @Then\n@End If");

        let insert_at = Range::new(Position::new(1, 0), Position::new(1, 0));
        apply_incremental_change_rope(&mut rope, &change(Some(insert_at), "body\n"));
        assert_eq!(rope.to_string(), "@If x = 1 @Then\nbody\n@End If");

        apply_incremental_change_rope(&mut rope, &change(None, "@End For"));
        assert_eq!(rope.to_string(), "@End For");
    }
}
