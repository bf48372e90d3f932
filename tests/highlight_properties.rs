// Property-based tests for the span coordinate machinery.
// Random inputs mix ASCII, multibyte codepoints, and both newline
// conventions, because that is exactly where off-by-one span bugs hide.

use parsescope::highlight::HighlightController;
use parsescope::position::{locate_offset, SpanWalker};
use parsescope::protocol::{AstNode, ParseResponse, Position};
use parsescope::unicode::{byte_offset, codepoint_len, codepoint_slice};
use parsescope::view::source::SourcePanel;
use parsescope::view::tree::TreePanel;
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            5 => proptest::char::range('a', 'z').prop_map(|c| c.to_string()),
            1 => Just("é".to_string()),
            1 => Just("𝄞".to_string()),
            1 => Just(" ".to_string()),
            1 => Just("\n".to_string()),
            1 => Just("\r\n".to_string()),
        ],
        0..40,
    )
    .prop_map(|pieces| pieces.concat())
}

/// A single node covering the entire input.
fn full_span_response(text: &str) -> ParseResponse {
    let len = codepoint_len(text);
    ParseResponse {
        input: text.to_string(),
        tree: Some(AstNode {
            name: "all".to_string(),
            position: Position {
                start_line: 1,
                end_line: locate_offset(text, len).line,
                start_character: 1,
                end_character: len + 1,
            },
            children: Vec::new(),
        }),
        lists: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    /// Slicing by codepoint index never panics and never grows the text.
    #[test]
    fn prop_codepoint_slice_is_total(text in text_strategy(), a in 0usize..50, b in 0usize..50) {
        let slice = codepoint_slice(&text, a, b);
        prop_assert!(codepoint_len(slice) <= codepoint_len(&text));
        if a >= b {
            prop_assert_eq!(slice, "");
        }
    }

    /// Byte offsets derived from codepoint counts always land on a
    /// character boundary, whatever the index.
    #[test]
    fn prop_byte_offset_lands_on_char_boundary(text in text_strategy(), n in 0usize..60) {
        prop_assert!(text.is_char_boundary(byte_offset(&text, n)));
    }

    /// Walking a span one codepoint at a time visits exactly the
    /// positions that locating each offset from scratch would produce.
    #[test]
    fn prop_walker_matches_locate_offset(text in text_strategy()) {
        let len = codepoint_len(&text);
        let mut walker = SpanWalker::seed(&text, 0);
        for (offset, c) in text.chars().enumerate() {
            prop_assert_eq!(walker.position(), locate_offset(&text, offset), "offset {}", offset);
            walker.advance(c);
        }
        prop_assert_eq!(walker.position(), locate_offset(&text, len));
    }

    /// The source panel has one line per terminator plus the final piece,
    /// and terminators never show up as character cells.
    #[test]
    fn prop_source_panel_matches_line_structure(text in text_strategy()) {
        let panel = SourcePanel::build(&text);
        let newlines = text.chars().filter(|&c| c == '\n').count();
        prop_assert_eq!(panel.line_count(), newlines + 1);
        for line in panel.lines() {
            prop_assert!(line.cells.iter().all(|cell| cell.glyph != '\n'));
        }
    }

    /// A node spanning the whole input marks every character cell and the
    /// terminator slot of every line but the last; clearing removes it all.
    #[test]
    fn prop_full_span_marks_everything_and_clears(text in text_strategy()) {
        prop_assume!(!text.is_empty());
        let response = full_span_response(&text);
        let mut source = SourcePanel::build(&text);
        let mut tree = TreePanel::build(&response);
        let mut controller = HighlightController::new();

        prop_assert!(controller.activate(0, &text, &mut source, &mut tree).is_some());
        for line in source.lines() {
            prop_assert!(line.cells.iter().all(|cell| cell.marked));
        }
        let last = source.line_count() - 1;
        for line in &source.lines()[..last] {
            prop_assert!(line.terminator_marked);
        }

        controller.clear_active(&mut source, &mut tree);
        for line in source.lines() {
            prop_assert!(!line.line_marked);
            prop_assert!(!line.terminator_marked);
            prop_assert!(line.cells.iter().all(|cell| !cell.marked));
        }
        prop_assert_eq!(tree.active_row(), None);
    }

    /// Labels are display-safe: escaping leaves no raw control characters.
    #[test]
    fn prop_tree_labels_never_contain_raw_control_chars(text in text_strategy()) {
        prop_assume!(!text.is_empty());
        let response = full_span_response(&text);
        let tree = TreePanel::build(&response);
        prop_assert!(tree.rows()[0].label.chars().all(|c| !c.is_control()));
    }
}
