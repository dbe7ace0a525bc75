//! Fuzz target for the markdown renderer.
//!
//! Feeds arbitrary UTF-8 to the renderer as plain markdown source and
//! checks that no markup can be smuggled through it.

#![no_main]

use evalview::markdown::{render, MarkedText};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 256 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let html = render(&MarkedText::from_plain(text));
    assert!(!html.contains("<span"));
});
