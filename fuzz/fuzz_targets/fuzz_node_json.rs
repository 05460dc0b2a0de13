//! Fuzz target for node construction from JSON.
//!
//! Arbitrary payloads either fail to decode or produce a node whose
//! export decodes again to the same text and style ranges.

#![no_main]

use libfuzzer_sys::fuzz_target;
use richtext_canvas::TextNode;

fuzz_target!(|data: &str| {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(data) else {
        return;
    };
    let Ok(node) = TextNode::from_json(value) else {
        return;
    };
    let _ = node.render();

    let restored = TextNode::from_json(node.to_json()).expect("exported json decodes");
    assert_eq!(restored.text(), node.text());
    assert_eq!(restored.style_ranges(), node.style_ranges());
});
