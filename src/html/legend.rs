//! Legend of error dimensions and severity levels.

use std::collections::BTreeSet;

use crate::model::{Category, EvaluationDocument};

/// Opacity of dimensions that do not occur in the document.
const UNUSED_OPACITY: &str = "0.3";

/// Categories used by the document's span records.
pub fn used_categories(document: &EvaluationDocument) -> BTreeSet<Category> {
    document.labels().map(|label| label.category()).collect()
}

/// Renders the legend.
///
/// Every named dimension is listed; those absent from the document are
/// dimmed.
pub fn render_legend(document: &EvaluationDocument) -> String {
    let used = used_categories(document);
    let mut html = String::new();

    html.push_str("<div class=\"legend-section\">\n<h4>Error Dimensions</h4>\n<div class=\"legend-items\">\n");
    for category in Category::NAMED {
        let opacity = if used.contains(&category) {
            "1"
        } else {
            UNUSED_OPACITY
        };
        html.push_str(&format!(
            "<div class=\"legend-item\"><div class=\"legend-color\" style=\"background-color: {}; opacity: {};\"></div><span style=\"opacity: {};\">{}</span></div>\n",
            category.color(),
            opacity,
            opacity,
            category.title()
        ));
    }
    html.push_str("</div>\n</div>\n");

    html.push_str("<div class=\"legend-section\">\n<h4>Severity Levels</h4>\n<div class=\"legend-items\">\n");
    html.push_str("<div class=\"legend-item\"><div class=\"legend-color severity-major-legend\"></div><span>Major</span></div>\n");
    html.push_str("<div class=\"legend-item\"><div class=\"legend-color severity-minor-legend\"></div><span>Minor</span></div>\n");
    html.push_str("</div>\n</div>");

    html
}
