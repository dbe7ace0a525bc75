//! Facet lookup by shared record id.
//!
//! Subcategory, severity and comment records are not embedded in the span
//! record; they are separate records carrying the span's id. [`FacetIndex`]
//! indexes them once per document so each lookup is a hash probe.

use std::collections::HashMap;

use super::{Annotation, AnnotationKind, ResultId};

/// Subcategory shown when a span has no subcategory record.
pub const SUBCATEGORY_PLACEHOLDER: &str = "N/A";

/// Severity assumed when a span has no severity record.
pub const DEFAULT_SEVERITY: &str = "minor";

/// Presentation facets resolved for one span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanFacets {
    pub subcategory: String,
    /// Always lower-case.
    pub severity: String,
    pub comment: String,
}

impl Default for SpanFacets {
    fn default() -> Self {
        Self {
            subcategory: SUBCATEGORY_PLACEHOLDER.to_string(),
            severity: DEFAULT_SEVERITY.to_string(),
            comment: String::new(),
        }
    }
}

/// Index of non-label records by `(id, kind)` and by `from_name`.
///
/// The first record wins for every key, matching a front-to-back scan.
#[derive(Debug, Default)]
pub struct FacetIndex<'a> {
    by_id: HashMap<(&'a str, AnnotationKind), &'a Annotation>,
    by_name: HashMap<&'a str, &'a Annotation>,
}

impl<'a> FacetIndex<'a> {
    /// Builds the index over a document's records.
    pub fn build(records: &'a [Annotation]) -> Self {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();

        for record in records {
            by_name.entry(record.from_name.as_str()).or_insert(record);

            if record.is_label() {
                continue;
            }
            if let Some(id) = &record.id {
                by_id.entry((id.as_str(), record.kind)).or_insert(record);
            }
        }

        Self { by_id, by_name }
    }

    /// Finds the facet record of `kind` linked to `id`.
    pub fn find_facet(&self, id: &ResultId, kind: AnnotationKind) -> Option<&'a Annotation> {
        self.by_id.get(&(id.as_str(), kind)).copied()
    }

    /// Finds the first record produced by the control `from_name`.
    ///
    /// Document-level scores and comments are addressed this way rather than
    /// by a per-span id.
    pub fn find_named(&self, from_name: &str) -> Option<&'a Annotation> {
        self.by_name.get(from_name).copied()
    }

    /// Resolves subcategory, severity and comment for a span record.
    pub fn span_facets(&self, label: &Annotation) -> SpanFacets {
        let Some(id) = &label.id else {
            return SpanFacets::default();
        };

        let subcategory = self
            .find_facet(id, AnnotationKind::Subcategory)
            .and_then(|record| record.value.first_choice())
            .unwrap_or(SUBCATEGORY_PLACEHOLDER)
            .to_string();

        let severity = self
            .find_facet(id, AnnotationKind::Severity)
            .and_then(|record| record.value.first_choice())
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_SEVERITY.to_string());

        let comment = self
            .find_facet(id, AnnotationKind::Comment)
            .and_then(|record| record.value.first_text())
            .unwrap_or_default()
            .to_string();

        SpanFacets {
            subcategory,
            severity,
            comment,
        }
    }
}
