//! Issue summary table and overall scores.

use serde::Serialize;

use super::{css_token, escape_html, RenderContext};
use crate::model::annotation::names;
use crate::model::{Annotation, Category, FacetIndex};

/// Shown when a rating is absent.
const MISSING_RATING: &str = "-";

/// One row of the issue summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueRow {
    pub text: String,
    pub category: Category,
    pub subcategory: String,
    pub severity: String,
    pub comment: String,
}

/// Rows for every span record with selected text, in document order.
///
/// Unlike the highlighted text, the table lists spans even when their
/// offsets are unusable.
pub fn issue_rows(ctx: &RenderContext<'_>) -> Vec<IssueRow> {
    ctx.document
        .labels()
        .filter_map(|label| {
            let text = label.span_text()?;
            let facets = ctx.facets.span_facets(label);
            Some(IssueRow {
                text: text.to_string(),
                category: label.category(),
                subcategory: facets.subcategory,
                severity: facets.severity,
                comment: facets.comment,
            })
        })
        .collect()
}

/// Renders the summary rows as `<tr>` elements.
pub fn render_issue_rows(rows: &[IssueRow]) -> String {
    let mut html = String::new();
    for row in rows {
        html.push_str(&format!(
            "<tr>\n<td class=\"text-segment\">{}</td>\n<td>{}</td>\n<td>{}</td>\n<td><span class=\"error-badge severity-{}\">{}</span></td>\n<td class=\"comments-cell\">{}</td>\n</tr>\n",
            escape_html(&row.text),
            escape_html(&row.category.capitalized()),
            escape_html(&row.subcategory),
            css_token(&row.severity),
            escape_html(&row.severity),
            escape_html(&row.comment),
        ));
    }
    html
}

/// Document-level ratings and comments.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OverallScores {
    pub correspondence: String,
    pub correspondence_comment: String,
    pub readability: String,
    pub readability_comment: String,
    pub document_issues: String,
}

/// Reads the overall scores through their well-known control names.
pub fn overall_scores(facets: &FacetIndex<'_>) -> OverallScores {
    OverallScores {
        correspondence: rating(facets.find_named(names::OVERALL_CORRESPONDENCE)),
        correspondence_comment: first_text(facets.find_named(names::CORRESPONDENCE_COMMENTS)),
        readability: rating(facets.find_named(names::OVERALL_READABILITY)),
        readability_comment: first_text(facets.find_named(names::READABILITY_COMMENTS)),
        document_issues: first_text(facets.find_named(names::DOCUMENT_ISSUES)),
    }
}

fn rating(record: Option<&Annotation>) -> String {
    record
        .and_then(|record| record.value.rating)
        .map(|rating| rating.to_string())
        .unwrap_or_else(|| MISSING_RATING.to_string())
}

fn first_text(record: Option<&Annotation>) -> String {
    record
        .and_then(|record| record.value.first_text())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EvaluationDocument;

    fn document() -> EvaluationDocument {
        EvaluationDocument::new(
            "The cat sat.",
            vec![
                Annotation::label("a", 4, 7, "cat", "accuracy"),
                Annotation::choice("a", names::SUBCATEGORIES, "Mistranslation"),
                Annotation::textarea("a", names::COMMENTS, "Should be <dog>"),
                Annotation::label("b", 40, 50, "mat", "Style"),
                Annotation::label("c", 0, 0, "", "Style"),
                Annotation::rating("r1", names::OVERALL_CORRESPONDENCE, 4.0),
                Annotation::rating("r2", names::OVERALL_READABILITY, 3.5),
                Annotation::textarea("r3", names::DOCUMENT_ISSUES, "Inconsistent tone"),
            ],
        )
    }

    #[test]
    fn rows_cover_spans_with_text() {
        let doc = document();
        let ctx = RenderContext::new(&doc, None);
        let rows = issue_rows(&ctx);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "cat");
        assert_eq!(rows[0].subcategory, "Mistranslation");
        assert_eq!(rows[0].severity, "minor");
        assert_eq!(rows[1].text, "mat");
        assert_eq!(rows[1].subcategory, "N/A");
    }

    #[test]
    fn rows_render_escaped() {
        let doc = document();
        let ctx = RenderContext::new(&doc, None);
        let html = render_issue_rows(&issue_rows(&ctx));

        assert!(html.contains("<td>Accuracy</td>"));
        assert!(html.contains("Should be &lt;dog&gt;"));
        assert!(html.contains("<span class=\"error-badge severity-minor\">minor</span>"));
        assert_eq!(html.matches("<tr>").count(), 2);
    }

    #[test]
    fn overall_scores_use_well_known_names() {
        let doc = document();
        let ctx = RenderContext::new(&doc, None);
        let scores = overall_scores(&ctx.facets);

        assert_eq!(scores.correspondence, "4");
        assert_eq!(scores.readability, "3.5");
        assert_eq!(scores.correspondence_comment, "");
        assert_eq!(scores.document_issues, "Inconsistent tone");
    }

    #[test]
    fn missing_ratings_show_dash() {
        let doc = EvaluationDocument::new("x", vec![]);
        let ctx = RenderContext::new(&doc, None);
        let scores = overall_scores(&ctx.facets);

        assert_eq!(scores.correspondence, "-");
        assert_eq!(scores.readability, "-");
    }
}
