//! HTML output for evaluation documents.
//!
//! Everything here reads from a [`RenderContext`], built once per document.
//! A new document gets a new context; nothing is carried over between
//! documents.
//!
//! - [`text`]: composed runs as highlight markup, then markdown
//! - [`legend`]: error dimensions and severity levels
//! - [`summary`]: issue table and overall scores
//! - [`tooltip`]: per-span tooltip content and the hover state machine
//! - [`page`]: complete pages and the site index

pub mod legend;
pub mod page;
pub mod site;
pub mod summary;
pub mod text;
pub mod tooltip;

use crate::compose::{compose, Composition};
use crate::model::{EvaluationDocument, FacetIndex, SiteConfig, TextBuffer};

/// Everything derived from one evaluation document.
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub document: &'a EvaluationDocument,
    pub config: Option<&'a SiteConfig>,
    pub buffer: TextBuffer,
    pub facets: FacetIndex<'a>,
}

impl<'a> RenderContext<'a> {
    /// Builds the text buffer and facet index for a document.
    pub fn new(document: &'a EvaluationDocument, config: Option<&'a SiteConfig>) -> Self {
        Self {
            document,
            config,
            buffer: TextBuffer::new(document.source_text.as_str()),
            facets: FacetIndex::build(&document.records),
        }
    }

    /// Composes the document's spans into runs.
    pub fn compose(&self) -> Composition<'_> {
        compose(&self.buffer, &self.document.records, &self.facets)
    }
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Turns a free-form value into a single CSS class token.
pub(crate) fn css_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn css_tokens_have_no_spaces() {
        assert_eq!(css_token("very major"), "very-major");
        assert_eq!(css_token(" minor "), "minor");
        assert_eq!(css_token("a\"b"), "a-b");
    }
}
