//! Fuzz target for evaluation document parsing and rendering.
//!
//! Any document that parses must render and validate without panicking,
//! whatever its span offsets look like.

#![no_main]

use evalview::html::page::render_page;
use evalview::html::RenderContext;
use evalview::model::document::from_evaluation_slice;
use evalview::validation::{validate_document, ValidateOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(doc) = from_evaluation_slice(data) else {
        return;
    };

    let ctx = RenderContext::new(&doc, None);
    let _ = render_page(&ctx);
    let _ = validate_document(&doc, &ValidateOptions::default());
});
