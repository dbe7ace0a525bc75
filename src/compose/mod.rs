//! Span composition.
//!
//! Annotators may highlight overlapping, nested, identical or adjacent
//! ranges. HTML highlights cannot overlap, so the spans are flattened into
//! a sequence of disjoint [`Run`]s. Each run is either plain or governed by
//! exactly one span: the most recently opened span that is still open
//! ("innermost wins").
//!
//! Concatenating the text of all runs reproduces the buffer exactly.
//!
//! # Example
//!
//! ```
//! use evalview::compose::compose;
//! use evalview::model::{Annotation, FacetIndex, TextBuffer};
//!
//! let buffer = TextBuffer::new("The cat sat.");
//! let records = vec![Annotation::label("a1", 4, 7, "cat", "Accuracy")];
//! let index = FacetIndex::build(&records);
//! let composition = compose(&buffer, &records, &index);
//!
//! let texts: Vec<_> = composition.runs.iter().map(|run| run.text).collect();
//! assert_eq!(texts, vec!["The ", "cat", " sat."]);
//! ```

use std::ops::Range;

use tracing::debug;

use crate::model::{Annotation, Category, FacetIndex, SpanFacets, TextBuffer};

/// A span record that survived filtering, with its facets resolved.
#[derive(Clone, Debug)]
pub struct Span<'a> {
    /// Position among renderable spans; the tie-break key for identical
    /// offsets and the index written into highlight markup.
    pub order: usize,
    pub annotation: &'a Annotation,
    /// Byte range in the buffer.
    pub range: Range<usize>,
    pub category: Category,
    pub facets: SpanFacets,
}

/// A maximal piece of text with constant span membership.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run<'a> {
    pub text: &'a str,
    /// Byte range in the buffer.
    pub range: Range<usize>,
    /// The governing span's `order`, if any span is active.
    pub span: Option<usize>,
}

impl Run<'_> {
    pub fn is_tagged(&self) -> bool {
        self.span.is_some()
    }
}

/// The result of composing a buffer with its spans.
#[derive(Clone, Debug, Default)]
pub struct Composition<'a> {
    pub runs: Vec<Run<'a>>,
    /// Renderable spans indexed by `order`.
    pub spans: Vec<Span<'a>>,
}

impl<'a> Composition<'a> {
    /// The span governing a run.
    pub fn governing(&self, run: &Run<'_>) -> Option<&Span<'a>> {
        run.span.and_then(|order| self.spans.get(order))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum BoundaryKind {
    // Declaration order is sort order: closes precede opens at one position.
    Close,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Boundary {
    pos: usize,
    kind: BoundaryKind,
    order: usize,
}

/// Flattens the span records of `records` over `buffer` into runs.
///
/// Records that are not spans, lack offsets or text, have offsets that do
/// not map onto the buffer, or are zero-length are skipped.
pub fn compose<'a>(
    buffer: &'a TextBuffer,
    records: &'a [Annotation],
    facets: &FacetIndex<'a>,
) -> Composition<'a> {
    let spans = renderable_spans(buffer, records, facets);

    let mut boundaries = Vec::with_capacity(spans.len() * 2);
    for span in &spans {
        boundaries.push(Boundary {
            pos: span.range.start,
            kind: BoundaryKind::Open,
            order: span.order,
        });
        boundaries.push(Boundary {
            pos: span.range.end,
            kind: BoundaryKind::Close,
            order: span.order,
        });
    }
    boundaries.sort_unstable();

    let text = buffer.as_str();
    let mut runs = Vec::with_capacity(boundaries.len() + 1);
    // Most recently opened span is last.
    let mut active: Vec<usize> = Vec::new();
    let mut last = 0;

    for boundary in boundaries {
        if boundary.pos > last {
            runs.push(Run {
                text: &text[last..boundary.pos],
                range: last..boundary.pos,
                span: active.last().copied(),
            });
            last = boundary.pos;
        }

        match boundary.kind {
            BoundaryKind::Open => active.push(boundary.order),
            BoundaryKind::Close => {
                if let Some(idx) = active.iter().rposition(|&order| order == boundary.order) {
                    active.remove(idx);
                }
            }
        }
    }

    if last < text.len() {
        runs.push(Run {
            text: &text[last..],
            range: last..text.len(),
            span: None,
        });
    }

    Composition { runs, spans }
}

fn renderable_spans<'a>(
    buffer: &TextBuffer,
    records: &'a [Annotation],
    facets: &FacetIndex<'a>,
) -> Vec<Span<'a>> {
    let mut spans = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        if !record.is_label() {
            continue;
        }
        let Some((start, end)) = record.offsets() else {
            debug!(index = idx, "skipping span without offsets");
            continue;
        };
        if record.span_text().is_none() {
            debug!(index = idx, "skipping span without text");
            continue;
        }
        let range = match buffer.byte_range(start, end) {
            Ok(range) => range,
            Err(err) => {
                debug!(index = idx, %err, "skipping span with unusable offsets");
                continue;
            }
        };
        if range.is_empty() {
            debug!(index = idx, "skipping zero-length span");
            continue;
        }

        spans.push(Span {
            order: spans.len(),
            annotation: record,
            range,
            category: record.category(),
            facets: facets.span_facets(record),
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::annotation::names;

    fn label(id: &str, start: i64, end: i64) -> Annotation {
        Annotation::label(id, start, end, "x", "Accuracy")
    }

    fn runs_of(text: &str, records: &[Annotation]) -> Vec<(String, Option<usize>)> {
        let buffer = TextBuffer::new(text);
        let index = FacetIndex::build(records);
        compose(&buffer, records, &index)
            .runs
            .into_iter()
            .map(|run| (run.text.to_string(), run.span))
            .collect()
    }

    fn run(text: &str, span: Option<usize>) -> (String, Option<usize>) {
        (text.to_string(), span)
    }

    #[test]
    fn no_spans_yields_one_plain_run() {
        assert_eq!(runs_of("hello", &[]), vec![run("hello", None)]);
    }

    #[test]
    fn empty_text_yields_no_runs() {
        assert!(runs_of("", &[]).is_empty());
    }

    #[test]
    fn single_span_with_default_facets() {
        let buffer = TextBuffer::new("The cat sat.");
        let records = vec![Annotation::label("a", 4, 7, "cat", "accuracy")];
        let index = FacetIndex::build(&records);
        let composition = compose(&buffer, &records, &index);

        let texts: Vec<_> = composition.runs.iter().map(|run| run.text).collect();
        assert_eq!(texts, vec!["The ", "cat", " sat."]);

        let span = composition
            .governing(&composition.runs[1])
            .expect("tagged run");
        assert_eq!(span.category, Category::Accuracy);
        assert_eq!(span.facets.severity, "minor");
        assert_eq!(span.facets.subcategory, "N/A");
        assert_eq!(span.facets.comment, "");
        assert!(!composition.runs[0].is_tagged());
        assert!(!composition.runs[2].is_tagged());
    }

    #[test]
    fn overlapping_spans_latest_open_wins() {
        let text = "abcdefghijklmnop";
        let runs = runs_of(text, &[label("a", 0, 10), label("b", 5, 15)]);
        assert_eq!(
            runs,
            vec![
                run("abcde", Some(0)),
                run("fghij", Some(1)),
                run("klmno", Some(1)),
                run("p", None),
            ]
        );
    }

    #[test]
    fn adjacent_spans_stay_separate() {
        let runs = runs_of("0123456789", &[label("a", 0, 5), label("b", 5, 10)]);
        assert_eq!(runs, vec![run("01234", Some(0)), run("56789", Some(1))]);
    }

    #[test]
    fn nested_span_resumes_outer() {
        let runs = runs_of("0123456789", &[label("outer", 0, 10), label("inner", 3, 6)]);
        assert_eq!(
            runs,
            vec![
                run("012", Some(0)),
                run("345", Some(1)),
                run("6789", Some(0)),
            ]
        );
    }

    #[test]
    fn identical_spans_later_index_governs() {
        let runs = runs_of("0123456789", &[label("a", 2, 8), label("b", 2, 8)]);
        assert_eq!(
            runs,
            vec![run("01", None), run("234567", Some(1)), run("89", None)]
        );
    }

    #[test]
    fn identical_start_longer_earlier_span_regains_control() {
        let runs = runs_of("0123456789", &[label("a", 0, 8), label("b", 0, 4)]);
        assert_eq!(
            runs,
            vec![run("0123", Some(1)), run("4567", Some(0)), run("89", None)]
        );
    }

    #[test]
    fn zero_length_span_contributes_nothing() {
        let runs = runs_of("abcdef", &[label("z", 3, 3)]);
        assert_eq!(runs, vec![run("abcdef", None)]);

        let runs = runs_of("abcdef", &[label("z", 3, 3), label("a", 1, 2)]);
        assert_eq!(
            runs,
            vec![run("a", None), run("b", Some(0)), run("cdef", None)]
        );
    }

    #[test]
    fn unusable_records_are_discarded() {
        let mut no_text = label("t", 0, 2);
        no_text.value.text.clear();
        let mut no_end = label("e", 0, 2);
        no_end.value.end = None;
        let records = vec![
            label("reversed", 4, 2),
            label("beyond", 3, 99),
            no_text,
            no_end,
            Annotation::choice("c", names::SEVERITY, "Major"),
        ];

        assert_eq!(runs_of("abcdef", &records), vec![run("abcdef", None)]);
    }

    #[test]
    fn out_of_order_close_removes_non_front_span() {
        // a opens, b opens, a closes while b is front, c opens, b closes.
        let records = vec![label("a", 0, 4), label("b", 2, 8), label("c", 6, 10)];
        let runs = runs_of("0123456789", &records);
        assert_eq!(
            runs,
            vec![
                run("01", Some(0)),
                run("23", Some(1)),
                run("45", Some(1)),
                run("67", Some(2)),
                run("89", Some(2)),
            ]
        );
    }

    #[test]
    fn offsets_are_code_units() {
        let buffer = TextBuffer::new("😀 café");
        let records = vec![Annotation::label("a", 3, 7, "café", "Style")];
        let index = FacetIndex::build(&records);
        let composition = compose(&buffer, &records, &index);

        let texts: Vec<_> = composition.runs.iter().map(|run| run.text).collect();
        assert_eq!(texts, vec!["😀 ", "café"]);
    }
}
