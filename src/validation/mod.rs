//! Evaluation document validation.
//!
//! Rendering never fails on a well-formed document: spans it cannot place
//! are skipped and unknown labels fall back to "other". Validation reports
//! those silent decisions so they can be fixed at the source:
//! - Span offsets that cannot be highlighted (errors)
//! - Span content that renders differently than recorded (warnings)
//! - Facet records that are duplicated or attached to nothing (warnings)
//! - Missing overall ratings (warnings)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashSet;

use crate::model::annotation::names;
use crate::model::{
    Annotation, AnnotationKind, Category, EvaluationDocument, FacetIndex, OffsetError, TextBuffer,
};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates an evaluation document and returns a report of all issues found.
pub fn validate_document(document: &EvaluationDocument, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();
    let buffer = TextBuffer::new(document.source_text.as_str());

    validate_spans(document, &buffer, &mut report);
    validate_facets(document, &mut report);
    validate_overall(document, &mut report);

    report
}

fn context(index: usize, record: &Annotation) -> IssueContext {
    IssueContext::Record {
        index,
        id: record.id.as_ref().map(|id| id.as_str().to_string()),
    }
}

/// Checks offsets, recorded text and category of every span record.
fn validate_spans(document: &EvaluationDocument, buffer: &TextBuffer, report: &mut ValidationReport) {
    for (index, record) in document.records.iter().enumerate() {
        if !record.is_label() {
            continue;
        }
        validate_category(index, record, report);

        let Some((start, end)) = record.offsets() else {
            report.add(ValidationIssue::error(
                IssueCode::MissingSpanOffsets,
                format!(
                    "Span has no usable offsets (start {:?}, end {:?})",
                    record.value.start, record.value.end
                ),
                context(index, record),
            ));
            continue;
        };

        let range = match buffer.byte_range(start, end) {
            Ok(range) => range,
            Err(err) => {
                let code = match err {
                    OffsetError::Reversed { .. } => IssueCode::InvalidSpanOrdering,
                    OffsetError::OutOfBounds { .. } => IssueCode::SpanOutOfBounds,
                    OffsetError::SplitsSurrogate { .. } => IssueCode::SplitSurrogate,
                };
                report.add(ValidationIssue::error(
                    code,
                    format!("Span [{}, {}) cannot be highlighted: {}", start, end, err),
                    context(index, record),
                ));
                continue;
            }
        };

        if range.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::ZeroLengthSpan,
                format!("Span [{}, {}) covers no text", start, end),
                context(index, record),
            ));
            continue;
        }

        let actual = &buffer.as_str()[range];
        match record.span_text() {
            Some(recorded) if recorded == actual => {}
            Some(recorded) => report.add(ValidationIssue::warning(
                IssueCode::SpanTextMismatch,
                format!(
                    "Span text {:?} differs from the text at its offsets {:?}",
                    recorded, actual
                ),
                context(index, record),
            )),
            None => report.add(ValidationIssue::warning(
                IssueCode::SpanTextMismatch,
                format!(
                    "Span has no recorded text and will not be highlighted (text at offsets {:?})",
                    actual
                ),
                context(index, record),
            )),
        }
    }
}

fn validate_category(index: usize, record: &Annotation, report: &mut ValidationReport) {
    match record.category_label() {
        Some(label) if Category::from_label(label).is_some() => {}
        Some(label) => report.add(ValidationIssue::warning(
            IssueCode::UnknownCategory,
            format!("Unknown category '{}' is shown as 'other'", label),
            context(index, record),
        )),
        None => report.add(ValidationIssue::warning(
            IssueCode::UnknownCategory,
            "Span has no category label and is shown as 'other'",
            context(index, record),
        )),
    }
}

/// Checks that facet records attach to exactly one span each.
fn validate_facets(document: &EvaluationDocument, report: &mut ValidationReport) {
    let label_ids: HashSet<&str> = document
        .labels()
        .filter_map(|label| label.id.as_ref().map(|id| id.as_str()))
        .collect();
    let mut seen: HashSet<(&str, AnnotationKind)> = HashSet::new();

    for (index, record) in document.records.iter().enumerate() {
        if !record.kind.is_span_facet() {
            continue;
        }

        let Some(id) = record.id.as_ref().map(|id| id.as_str()) else {
            report.add(ValidationIssue::warning(
                IssueCode::OrphanFacet,
                format!("{} record has no id and is never shown", record.kind),
                context(index, record),
            ));
            continue;
        };

        if !label_ids.contains(id) {
            report.add(ValidationIssue::warning(
                IssueCode::OrphanFacet,
                format!("{} record matches no span", record.kind),
                context(index, record),
            ));
        }

        if !seen.insert((id, record.kind)) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateFacet,
                format!(
                    "Duplicate {} record for span {}; only the first is shown",
                    record.kind, id
                ),
                context(index, record),
            ));
        }
    }
}

/// Checks that both overall ratings are present.
fn validate_overall(document: &EvaluationDocument, report: &mut ValidationReport) {
    let facets = FacetIndex::build(&document.records);

    for name in [names::OVERALL_CORRESPONDENCE, names::OVERALL_READABILITY] {
        let rating = facets
            .find_named(name)
            .and_then(|record| record.value.rating);
        if rating.is_none() {
            report.add(ValidationIssue::warning(
                IssueCode::MissingOverallRating,
                format!("No '{}' rating", name),
                IssueContext::Document,
            ));
        }
    }
}
