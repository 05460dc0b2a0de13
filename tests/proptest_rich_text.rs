//! Property-based tests for segmentation, layout coordinates, the style
//! codec and editing history.

use std::rc::Rc;

use proptest::prelude::*;
use richtext_canvas::text::{
    MonospaceMeasurer, RichTextBuffer, StyleStore, diff_graphemes, segment::export_ranges,
    segment::import_ranges,
};
use richtext_canvas::unicode::segment;
use richtext_canvas::{
    CharStyle, EditorConfig, FontWeight, ParagraphStyle, ResolvedStyle, Rgba, TextNode,
    TextNodeOptions,
};

// ============================================================================
// Strategies
// ============================================================================

/// Generate arbitrary UTF-8 strings (proptest default).
fn utf8_string() -> impl Strategy<Value = String> {
    "\\PC{0,80}"
}

/// Generate prose: words, spaces, newlines and a few clusters.
fn prose() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "lorem", "ipsum", " ", " ", "\n", "dolor", "中文", "é", "👍", "\u{200B}", "a",
        ]),
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

fn patch_strategy() -> impl Strategy<Value = CharStyle> {
    prop::sample::select(vec![
        CharStyle::new().with_font_weight(FontWeight::BOLD),
        CharStyle::new().with_fill(Rgba::RED),
        CharStyle::new().with_font_size(24.0),
        CharStyle::new().with_italic(true),
    ])
}

fn wrapped_buffer(text: &str, width: f32) -> RichTextBuffer {
    let paragraph = ParagraphStyle {
        auto_width: false,
        width: Some(width),
        ..ParagraphStyle::default()
    };
    RichTextBuffer::new(
        text,
        ResolvedStyle::default(),
        paragraph,
        Rc::new(MonospaceMeasurer::default()),
        &EditorConfig::default(),
    )
}

#[derive(Clone, Debug)]
enum Op {
    Insert(String),
    Select(usize, usize),
    Style(CharStyle),
    FullStyle(CharStyle),
    DeleteBackward,
    ClearStyles,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::sample::select(vec!["x", "yz", " ", "\n", "é"]).prop_map(|s| Op::Insert(s.to_string())),
        (0usize..30, 0usize..30).prop_map(|(a, b)| Op::Select(a, b)),
        patch_strategy().prop_map(Op::Style),
        patch_strategy().prop_map(Op::FullStyle),
        Just(Op::DeleteBackward),
        Just(Op::ClearStyles),
    ]
}

fn apply(node: &mut TextNode, op: &Op) {
    match op {
        Op::Insert(text) => node.insert_text(text),
        Op::Select(a, b) => node.set_selection(*a, *b),
        Op::Style(patch) => node.set_selection_styles(patch),
        Op::FullStyle(patch) => node.set_full_text_styles(patch),
        Op::DeleteBackward => node.delete_backward(false),
        Op::ClearStyles => node.clear_selection_styles(),
    }
}

// ============================================================================
// Segmentation
// ============================================================================

proptest! {
    /// Graphemes are lossless: joining them back produces the original string.
    #[test]
    fn segmentation_is_lossless(s in utf8_string()) {
        let joined: String = segment(&s).concat();
        prop_assert_eq!(&joined, &s);
    }

    #[test]
    fn graphemes_are_nonempty(s in utf8_string()) {
        for g in segment(&s) {
            prop_assert!(!g.is_empty());
        }
    }
}

// ============================================================================
// Layout coordinates
// ============================================================================

proptest! {
    /// Every linear offset survives a trip through (line, column).
    #[test]
    fn offset_location_round_trip(text in prose(), width in 20.0f32..300.0) {
        let buffer = wrapped_buffer(&text, width);
        for offset in 0..=buffer.len() {
            let location = buffer.location_of(offset);
            prop_assert_eq!(buffer.offset_of(location), offset, "location {:?}", location);
        }
    }

    /// Lines tile the text; only newlines fall between them.
    #[test]
    fn lines_cover_every_grapheme(text in prose(), width in 20.0f32..300.0) {
        let buffer = wrapped_buffer(&text, width);
        let lines = buffer.lines();
        prop_assert!(!lines.is_empty());
        prop_assert_eq!(lines[0].start, 0);
        for pair in lines.windows(2) {
            let gap = pair[1].start - pair[0].end();
            if pair[0].hard_break {
                prop_assert_eq!(gap, 1);
                prop_assert_eq!(buffer.graphemes()[pair[0].end()].as_str(), "\n");
            } else {
                prop_assert_eq!(gap, 0);
            }
        }
        let last = lines[lines.len() - 1];
        prop_assert_eq!(last.end(), buffer.len());
    }

    /// Pointer hits always land inside the text.
    #[test]
    fn pointer_hits_are_in_bounds(text in prose(), x in -50.0f32..400.0, y in -50.0f32..400.0) {
        let buffer = wrapped_buffer(&text, 120.0);
        prop_assert!(buffer.offset_at_point(x, y) <= buffer.len());
    }
}

// ============================================================================
// Style codec
// ============================================================================

proptest! {
    /// Exporting and re-importing reproduces every resolved style.
    #[test]
    fn style_ranges_round_trip(
        len in 1usize..40,
        edits in prop::collection::vec((0usize..45, 0usize..45, patch_strategy()), 0..8),
    ) {
        let mut store = StyleStore::new(ResolvedStyle::default());
        for (a, b, patch) in &edits {
            store.set_range(*a, *b, len, patch);
        }
        let ranges = export_ranges(&store);

        for range in &ranges {
            prop_assert!(range.start < range.end && range.end <= len);
        }
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }

        let mut restored = StyleStore::new(ResolvedStyle::default());
        import_ranges(&mut restored, &ranges, len);
        for offset in 0..len {
            prop_assert_eq!(restored.resolve(offset), store.resolve(offset));
        }
        prop_assert_eq!(export_ranges(&restored), ranges);
    }

    /// The diff touches exactly the changed middle.
    #[test]
    fn diff_reconstructs_new_text(old in prose(), new in prose()) {
        let old_g = segment(&old);
        let new_g = segment(&new);
        let change = diff_graphemes(&old_g, &new_g);

        let mut rebuilt = old_g[..change.start].to_vec();
        rebuilt.extend_from_slice(&new_g[change.start..change.start + change.inserted]);
        rebuilt.extend_from_slice(&old_g[change.start + change.removed..]);
        prop_assert_eq!(rebuilt.concat(), new);

        let common = old_g.iter().zip(&new_g).take_while(|(a, b)| a == b).count();
        prop_assert_eq!(change.start, common);
    }
}

// ============================================================================
// Editing
// ============================================================================

proptest! {
    /// Undoing everything restores the initial document; redoing
    /// everything restores the final one.
    #[test]
    fn undo_redo_symmetry(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut node = TextNode::new(TextNodeOptions::with_text("seed text"));
        node.enter_editing(None);
        let initial = (node.text().to_string(), node.style_ranges(), node.default_style().clone());

        for op in &ops {
            apply(&mut node, op);
        }
        let last = (node.text().to_string(), node.style_ranges(), node.default_style().clone());

        while node.undo() {}
        prop_assert_eq!(
            (node.text().to_string(), node.style_ranges(), node.default_style().clone()),
            initial
        );

        while node.redo() {}
        prop_assert_eq!(
            (node.text().to_string(), node.style_ranges(), node.default_style().clone()),
            last
        );
    }

    /// The selection stays ordered and inside the text after any edit.
    #[test]
    fn selection_stays_ordered(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut node = TextNode::new(TextNodeOptions::with_text("alpha beta\ngamma"));
        node.enter_editing(Some(3));
        for op in &ops {
            apply(&mut node, op);
            let selection = node.selection();
            prop_assert!(selection.start <= selection.end);
            prop_assert!(selection.end <= node.len());
        }
    }

    /// Overrides never outlive the text they style.
    #[test]
    fn overrides_stay_in_bounds(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut node = TextNode::new(TextNodeOptions::with_text("styled"));
        node.enter_editing(None);
        for op in &ops {
            apply(&mut node, op);
            for range in node.style_ranges() {
                prop_assert!(range.end <= node.len());
            }
        }
    }
}
