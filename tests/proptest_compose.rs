mod proptest_helpers;

use evalview::compose::compose;
use evalview::html::text::{marked_text, render_annotated_text};
use evalview::markdown::{render, MarkedText, Segment};
use evalview::model::{FacetIndex, TextBuffer};
use proptest::prelude::*;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn runs_reconstruct_the_text(doc in proptest_helpers::arb_document(20, 8)) {
        let buffer = TextBuffer::new(doc.source_text.as_str());
        let index = FacetIndex::build(&doc.records);
        let composition = compose(&buffer, &doc.records, &index);

        let joined: String = composition.runs.iter().map(|run| run.text).collect();
        prop_assert_eq!(joined, doc.source_text.clone());
    }

    #[test]
    fn runs_are_contiguous_and_non_empty(doc in proptest_helpers::arb_document(20, 8)) {
        let buffer = TextBuffer::new(doc.source_text.as_str());
        let index = FacetIndex::build(&doc.records);
        let composition = compose(&buffer, &doc.records, &index);

        let mut expected_start = 0;
        for run in &composition.runs {
            prop_assert!(!run.text.is_empty());
            prop_assert_eq!(run.range.start, expected_start);
            prop_assert_eq!(&doc.source_text[run.range.clone()], run.text);
            expected_start = run.range.end;
        }
        prop_assert_eq!(expected_start, doc.source_text.len());
    }

    #[test]
    fn innermost_active_span_governs(doc in proptest_helpers::arb_document(20, 8)) {
        let buffer = TextBuffer::new(doc.source_text.as_str());
        let index = FacetIndex::build(&doc.records);
        let composition = compose(&buffer, &doc.records, &index);

        for run in &composition.runs {
            let innermost = composition
                .spans
                .iter()
                .filter(|span| span.range.start <= run.range.start && run.range.end <= span.range.end)
                .max_by_key(|span| (span.range.start, span.order))
                .map(|span| span.order);
            prop_assert_eq!(run.span, innermost);
        }
    }

    #[test]
    fn every_highlight_survives_markdown(doc in proptest_helpers::arb_document(20, 8)) {
        let buffer = TextBuffer::new(doc.source_text.as_str());
        let index = FacetIndex::build(&doc.records);
        let composition = compose(&buffer, &doc.records, &index);
        let marked = marked_text(&composition);

        let html = render(&marked);
        let placeholders = marked
            .segments()
            .iter()
            .filter(|segment| matches!(segment, Segment::Placeholder(_)))
            .count();
        prop_assert_eq!(html.matches("<span class=\"highlight ").count(), placeholders);
        prop_assert_eq!(
            html.matches('\u{E000}').count(),
            doc.source_text.matches('\u{E000}').count()
        );
    }

    #[test]
    fn plain_markdown_never_leaks_tags(text in proptest_helpers::arb_text(30)) {
        let html = render(&MarkedText::from_plain(&text));
        prop_assert!(!html.contains("<span"));
        prop_assert!(!html.contains("<script"));
    }

    #[test]
    fn annotated_text_is_never_empty(doc in proptest_helpers::arb_document(10, 4)) {
        let buffer = TextBuffer::new(doc.source_text.as_str());
        let index = FacetIndex::build(&doc.records);
        let composition = compose(&buffer, &doc.records, &index);

        let html = render_annotated_text(&composition);
        prop_assert!(html.contains('<'));
    }
}
