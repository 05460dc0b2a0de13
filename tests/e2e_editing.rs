//! End-to-end scenarios: layout, styling, serialization and the editing
//! lifecycle driven through the public node API.

use std::time::Duration;

use richtext_canvas::input::BlurTarget;
use richtext_canvas::text::StyleRange;
use richtext_canvas::{
    CharStyle, EditingCoordinator, EditorEvent, EventResponse, FontWeight, KeyCode, KeyEvent,
    KeyModifiers, ParagraphStyle, PointerEvent, Rgba, TextAlign, TextNode, TextNodeOptions,
    TextOverflow,
};
use tracing::{Level, info};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

fn fixed(text: &str, width: f32) -> TextNodeOptions {
    TextNodeOptions::with_text(text).with_fixed_width(width)
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn mixed_sizes_share_one_baseline() {
    init_logging();
    let options = TextNodeOptions::with_text("Ab").with_style_ranges(vec![StyleRange::new(
        0..1,
        CharStyle::new().with_font_size(48.0),
    )]);
    let node = TextNode::new(options);

    let line = &node.buffer().metrics().lines[0];
    assert!(close(line.max_font_size, 48.0));
    assert!(close(line.height, 72.0));
    assert!(close(line.baseline, 50.4));

    let list = node.render();
    let baselines: Vec<f32> = list.glyphs().map(|g| g.baseline).collect();
    assert_eq!(baselines.len(), 2);
    assert!(baselines.iter().all(|b| close(*b, 50.4)));
}

#[test]
fn wraps_within_fixed_width() {
    init_logging();
    let node = TextNode::new(fixed("The quick brown fox jumps over the lazy dog", 300.0));
    let metrics = node.buffer().metrics();
    info!(lines = metrics.lines.len(), "wrapped");
    assert!(metrics.lines.len() >= 2);
    assert!(close(metrics.width, 300.0));

    for line in &metrics.lines {
        for glyph in line.glyphs.iter().filter(|g| g.display != " ") {
            assert!(glyph.right() <= 300.0 + 0.01, "glyph {} overflows", glyph.offset);
        }
    }
    // No grapheme is lost to wrapping.
    let total: usize = metrics.lines.iter().map(|l| l.line.len).sum();
    assert_eq!(total, node.len());
}

#[test]
fn justify_fills_all_but_the_last_line() {
    let options = fixed("aa bb cc dd", 100.0).with_paragraph(ParagraphStyle {
        text_align: TextAlign::Justify,
        auto_width: false,
        width: Some(100.0),
        ..ParagraphStyle::default()
    });
    let node = TextNode::new(options);
    let lines = &node.buffer().metrics().lines;
    assert_eq!(lines.len(), 2);

    // "aa bb cc" with the trailing space hanging past the edge.
    let last_counted = &lines[0].glyphs[7];
    assert!(close(last_counted.right(), 100.0));
    assert!(close(lines[1].glyphs[0].x, 0.0));
    assert!(close(lines[1].glyphs[1].x, 9.6));
}

#[test]
fn ellipsis_marks_hidden_lines() {
    let options = TextNodeOptions::with_text("aa bb cc dd ee ff").with_paragraph(ParagraphStyle {
        auto_width: false,
        auto_height: false,
        width: Some(100.0),
        height: Some(30.0),
        text_overflow: TextOverflow::Ellipsis("…".to_string()),
        ..ParagraphStyle::default()
    });
    let node = TextNode::new(options);
    let metrics = node.buffer().metrics();
    assert!(metrics.lines[0].visible);
    assert!(metrics.lines[1..].iter().all(|l| !l.visible));

    let list = node.render();
    assert!(list.glyphs().any(|g| g.text == "…"));
    let hidden_start = metrics.lines[1].line.start;
    assert!(
        list.glyphs()
            .filter(|g| g.text != "…")
            .all(|g| g.offset < hidden_start)
    );
}

#[test]
fn full_text_style_keeps_local_colors() {
    let mut node = TextNode::new(TextNodeOptions::with_text("red black"));
    node.enter_editing(None);
    node.set_selection(0, 3);
    node.set_selection_styles(&CharStyle::new().with_fill(Rgba::RED));

    node.set_full_text_styles(&CharStyle::new().with_font_weight(FontWeight::BOLD));
    for offset in 0..node.len() {
        assert!(node.get_style_at(offset).font_weight.is_bold());
    }
    assert_eq!(node.get_style_at(1).fill_color(), Rgba::RED);
    assert_eq!(node.get_style_at(5).fill_color(), Rgba::BLACK);
}

#[test]
fn json_export_import_is_equivalent() {
    init_logging();
    let mut node = TextNode::new(TextNodeOptions::with_text("Hello brave\nnew world"));
    node.enter_editing(None);
    node.set_selection(0, 5);
    node.set_selection_styles(&CharStyle::new().with_font_weight(FontWeight::BOLD));
    node.set_selection(12, 15);
    node.set_selection_styles(&CharStyle::new().with_fill(Rgba::BLUE).with_italic(true));

    let json = node.to_json();
    let text = serde_json::to_string(&json).unwrap();
    let restored = TextNode::from_json(serde_json::from_str(&text).unwrap()).unwrap();

    assert_eq!(restored.text(), node.text());
    assert_eq!(restored.style_ranges(), node.style_ranges());
    for offset in 0..node.len() {
        assert_eq!(restored.get_style_at(offset), node.get_style_at(offset));
    }
    assert_eq!(restored.legacy_styles(), node.legacy_styles());
}

#[test]
fn bold_range_survives_reconstruction() {
    let options = TextNodeOptions::from_json(serde_json::json!({
        "text": "Hello",
        "styleRanges": [{"start": 0, "end": 3, "fontWeight": "bold"}]
    }))
    .unwrap();
    let node = TextNode::new(options);
    let restored = TextNode::from_json(node.to_json()).unwrap();

    for offset in 0..3 {
        assert_eq!(restored.get_style_at(offset), node.get_style_at(offset));
        assert!(restored.get_style_at(offset).font_weight.is_bold());
    }
    for offset in 3..5 {
        assert_eq!(&restored.get_style_at(offset), restored.default_style());
    }
}

#[test]
fn partial_update_keeps_existing_fields() {
    let mut node = TextNode::new(TextNodeOptions::with_text("abc"));
    node.enter_editing(None);
    node.set_selection(0, 2);
    node.set_selection_styles(&CharStyle::new().with_fill(Rgba::RED));
    node.set_selection_styles(&CharStyle::new().with_font_size(32.0));

    for style in node.get_selection_styles() {
        assert_eq!(style.fill_color(), Rgba::RED);
        assert!(close(style.font_size, 32.0));
    }
}

#[test]
fn editing_migrates_styles_minimally() {
    let mut node = TextNode::new(TextNodeOptions::with_text("hello world"));
    node.enter_editing(None);
    node.set_selection(6, 11);
    node.set_selection_styles(&CharStyle::new().with_fill(Rgba::RED));

    node.set_text("hello brave world");
    let ranges = node.style_ranges();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].range(), 12..17);
}

#[test]
fn malformed_payloads_are_rejected() {
    assert!(TextNode::from_json(serde_json::json!([1, 2])).is_err());
    assert!(TextNode::from_json(serde_json::json!({"text": "a", "styleRanges": 3})).is_err());
    assert!(TextNode::from_json(serde_json::json!({"text": 5})).is_err());
}

#[test]
fn only_one_node_edits_at_a_time() {
    init_logging();
    let coordinator = EditingCoordinator::new();
    let nodes: Vec<_> = ["one", "two", "three"]
        .into_iter()
        .map(|t| TextNode::new(TextNodeOptions::with_text(t)).shared(&coordinator))
        .collect();

    for (i, node) in nodes.iter().enumerate() {
        node.borrow_mut().enter_editing(None);
        let editing: Vec<bool> = nodes.iter().map(|n| n.borrow().is_editing()).collect();
        assert_eq!(editing.iter().filter(|e| **e).count(), 1);
        assert!(editing[i]);
    }

    nodes[2].borrow_mut().exit_editing();
    assert_eq!(coordinator.active(), None);
}

#[test]
fn typing_session_through_events() {
    init_logging();
    let mut node = TextNode::new(TextNodeOptions::with_text("draft"));
    node.enter_editing(None);

    for c in " one".chars() {
        node.handle_event(&EditorEvent::Key(KeyEvent::char(c)));
    }
    assert_eq!(node.text(), "draft one");

    let select_word = KeyEvent::new(KeyCode::Left, KeyModifiers::CTRL | KeyModifiers::SHIFT);
    node.handle_event(&EditorEvent::Key(select_word));
    assert_eq!(node.copy().as_deref(), Some("one"));

    let cut = node.handle_event(&EditorEvent::Key(KeyEvent::with_ctrl(KeyCode::Char('x'))));
    assert_eq!(cut, EventResponse::Copied("one".to_string()));
    node.handle_event(&EditorEvent::Paste("two".to_string()));
    assert_eq!(node.text(), "draft two");

    node.handle_event(&EditorEvent::CompositionStart);
    node.handle_event(&EditorEvent::CompositionUpdate("か".to_string()));
    node.handle_event(&EditorEvent::CompositionEnd("歌".to_string()));
    assert_eq!(node.text(), "draft two歌");

    let undo = KeyEvent::with_ctrl(KeyCode::Char('z'));
    node.handle_event(&EditorEvent::Key(undo));
    assert_eq!(node.text(), "draft two");

    // Double-click a word, then leave.
    let t = Duration::from_millis(1_000);
    node.handle_event(&EditorEvent::PointerDown(PointerEvent::new(5.0, 5.0, t)));
    node.handle_event(&EditorEvent::PointerUp(PointerEvent::new(5.0, 5.0, t)));
    let t = t + Duration::from_millis(100);
    node.handle_event(&EditorEvent::PointerDown(PointerEvent::new(5.0, 5.0, t)));
    assert_eq!(node.copy().as_deref(), Some("draft"));

    let response = node.handle_event(&EditorEvent::Blur(BlurTarget::Outside));
    assert_eq!(response, EventResponse::Exited);
    assert!(!node.is_editing());
}
