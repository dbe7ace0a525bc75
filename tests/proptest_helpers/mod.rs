#![allow(dead_code)]

use evalview::model::{Annotation, Category, EvaluationDocument, TextBuffer};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Text pieces that exercise markdown syntax, escaping and multi-unit
/// characters.
fn arb_piece() -> BoxedStrategy<String> {
    prop_oneof![
        4 => "[a-z ]{1,6}",
        1 => Just("\n".to_string()),
        1 => Just("\n\n".to_string()),
        1 => Just("**".to_string()),
        1 => Just("*".to_string()),
        1 => Just("# ".to_string()),
        1 => Just("## ".to_string()),
        1 => Just("> ".to_string()),
        1 => Just("| a | b |\n".to_string()),
        1 => Just("---".to_string()),
        1 => Just("[l](u)".to_string()),
        1 => Just("&<>\"'".to_string()),
        1 => Just("é".to_string()),
        1 => Just("日本".to_string()),
        1 => Just("😀".to_string()),
        1 => Just("\u{E000}0\u{E001}".to_string()),
    ]
    .boxed()
}

pub fn arb_text(max_pieces: usize) -> BoxedStrategy<String> {
    prop::collection::vec(arb_piece(), 0..max_pieces)
        .prop_map(|pieces| pieces.concat())
        .boxed()
}

pub fn arb_category() -> BoxedStrategy<String> {
    prop_oneof![
        6 => prop::sample::select(Category::NAMED.to_vec()).prop_map(|c| c.title().to_string()),
        1 => Just("Fluency".to_string()),
    ]
    .boxed()
}

/// A document whose span offsets are mostly valid but may overlap, nest,
/// repeat, reverse, run past the end or split surrogate pairs.
pub fn arb_document(max_pieces: usize, max_spans: usize) -> BoxedStrategy<EvaluationDocument> {
    arb_text(max_pieces)
        .prop_flat_map(move |text| {
            let units = TextBuffer::new(text.as_str()).len_units() as i64;
            let offset = 0..=units + 2;
            let spans = prop::collection::vec(
                (offset.clone(), offset, arb_category()),
                0..max_spans,
            );
            (Just(text), spans)
        })
        .prop_map(|(text, spans)| {
            let records = spans
                .into_iter()
                .enumerate()
                .map(|(idx, (start, end, category))| {
                    Annotation::label(format!("s{idx}"), start, end, "x", category)
                })
                .collect();
            EvaluationDocument::new(text, records)
        })
        .boxed()
}
