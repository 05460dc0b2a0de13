//! Fuzz target for color parsing.
//!
//! Rgba::parse must reject malformed notation without panicking, and any
//! color it accepts must round-trip through its hex form.

#![no_main]

use libfuzzer_sys::fuzz_target;
use richtext_canvas::color::Rgba;

fuzz_target!(|data: &str| {
    if let Some(color) = Rgba::parse(data) {
        assert_eq!(Rgba::from_hex(&color.to_string()), Some(color));
    }

    if !data.starts_with('#') {
        let _ = Rgba::from_hex(&format!("#{data}"));
    }

    // Suffixes starting on char boundaries
    for (i, _) in data.char_indices().take(10) {
        let _ = Rgba::parse(&data[i..]);
    }
});
