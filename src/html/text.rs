//! The annotated translation text.

use super::{css_token, escape_html};
use crate::compose::{Composition, Span};
use crate::markdown::{self, MarkedText};

/// Materializes runs as marked text: plain runs stay markdown source,
/// tagged runs become opaque highlight fragments.
///
/// A tagged run spanning line breaks yields one fragment per line, with the
/// breaks left in the plain text so block structure is still visible to
/// the markdown passes.
pub fn marked_text(composition: &Composition<'_>) -> MarkedText {
    let mut marked = MarkedText::new();

    for run in &composition.runs {
        let Some(span) = composition.governing(run) else {
            marked.push_plain(run.text);
            continue;
        };

        let open = highlight_open_tag(span);
        for (idx, line) in run.text.split('\n').enumerate() {
            if idx > 0 {
                marked.push_plain("\n");
            }
            if !line.is_empty() {
                marked.push_markup(format!("{open}{}</span>", escape_html(line)));
            }
        }
    }

    marked
}

fn highlight_open_tag(span: &Span<'_>) -> String {
    format!(
        r#"<span class="highlight {} {}" data-annotation-index="{}">"#,
        span.category.css_class(),
        css_token(&span.facets.severity),
        span.order
    )
}

/// Renders composed text as HTML blocks.
pub fn render_annotated_text(composition: &Composition<'_>) -> String {
    let html = markdown::render(&marked_text(composition));
    if html.contains('<') {
        html
    } else {
        format!("<p>{html}</p>")
    }
}
