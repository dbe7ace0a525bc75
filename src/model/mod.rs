//! Data model for evaluation documents.
//!
//! This module defines the in-memory representation of one human-annotated
//! translation evaluation as exported from Label Studio.
//!
//! # Design Principles
//!
//! 1. **Permissive Construction**: Records with missing or malformed fields
//!    are still represented, so that validation can report them and the
//!    renderer can skip them instead of failing the whole document.
//!
//! 2. **Explicit Offsets**: Span offsets are UTF-16 code units. Only
//!    [`TextBuffer`] converts them to byte positions.
//!
//! 3. **Indexed Facets**: Facet records are linked to spans by a shared id
//!    and looked up through a [`FacetIndex`] built once per document.
//!
//! # Example
//!
//! ```
//! use evalview::model::{Annotation, EvaluationDocument, FacetIndex};
//!
//! let doc = EvaluationDocument::new(
//!     "The cat sat.",
//!     vec![Annotation::label("a1", 4, 7, "cat", "Accuracy")],
//! );
//! let index = FacetIndex::build(&doc.records);
//! assert_eq!(index.span_facets(&doc.records[0]).severity, "minor");
//! ```

pub mod annotation;
pub mod config;
pub mod document;
mod facets;
mod ids;
mod text;

// Re-export core types for convenient access
pub use annotation::{Annotation, AnnotationKind, AnnotationValue, Category};
pub use config::{Manifest, ManifestEntry, SiteConfig};
pub use document::EvaluationDocument;
pub use facets::{FacetIndex, SpanFacets, DEFAULT_SEVERITY, SUBCATEGORY_PLACEHOLDER};
pub use ids::ResultId;
pub use text::{OffsetError, TextBuffer};
