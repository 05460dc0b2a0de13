//! Fuzz target for editing sequences.
//!
//! Drives a node with structured operations and checks that the selection
//! and style overrides never leave the text.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use richtext_canvas::{CharStyle, FontWeight, TextNode, TextNodeOptions};

#[derive(Arbitrary, Debug)]
enum Op {
    Insert(String),
    Select { start: u8, end: u8 },
    Bold,
    FullSize(u8),
    ClearSelection,
    Backspace { by_word: bool },
    Delete { by_word: bool },
    Move { forward: bool, extend: bool },
    Vertical { down: bool },
    Compose(String),
    Undo,
    Redo,
}

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    width: Option<u8>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut options = TextNodeOptions::with_text(input.text);
    if let Some(width) = input.width {
        options = options.with_fixed_width(f32::from(width));
    }
    let mut node = TextNode::new(options);
    node.enter_editing(None);

    for op in input.ops.into_iter().take(64) {
        match op {
            Op::Insert(text) => node.insert_text(&text),
            Op::Select { start, end } => node.set_selection(start.into(), end.into()),
            Op::Bold => node.set_selection_styles(&CharStyle::new().with_font_weight(FontWeight::BOLD)),
            Op::FullSize(size) => {
                node.set_full_text_styles(&CharStyle::new().with_font_size(f32::from(size)));
            }
            Op::ClearSelection => node.clear_selection_styles(),
            Op::Backspace { by_word } => node.delete_backward(by_word),
            Op::Delete { by_word } => node.delete_forward(by_word),
            Op::Move { forward, extend } => node.move_cursor(forward, extend),
            Op::Vertical { down } => node.move_vertical(if down { 1 } else { -1 }, false),
            Op::Compose(text) => {
                node.composition_start();
                node.composition_update(&text);
                node.composition_end(&text);
            }
            Op::Undo => {
                node.undo();
            }
            Op::Redo => {
                node.redo();
            }
        }

        let selection = node.selection();
        assert!(selection.start <= selection.end && selection.end <= node.len());
        assert!(node.style_ranges().iter().all(|r| r.end <= node.len()));
    }
    let _ = node.render();
});
