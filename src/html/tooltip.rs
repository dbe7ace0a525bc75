//! Tooltip content and hover state.
//!
//! Content is rendered ahead of time, one `<template>` per governing span.
//! The page script only swaps templates in and out, following
//! [`TooltipState::on`].

use std::collections::BTreeSet;

use super::escape_html;
use crate::compose::{Composition, Span};

/// Whether a tooltip is visible, and for which span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TooltipState {
    #[default]
    Hidden,
    /// Showing the tooltip of the span with this `order`.
    Shown(usize),
}

/// Pointer transitions over highlighted text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    /// The pointer entered a highlight governed by the span with this `order`.
    Enter(usize),
    Leave,
}

impl TooltipState {
    /// Applies one pointer event.
    ///
    /// Entering a highlight always shows that span's tooltip, replacing any
    /// other; leaving always hides.
    pub fn on(self, event: PointerEvent) -> Self {
        match event {
            PointerEvent::Enter(order) => TooltipState::Shown(order),
            PointerEvent::Leave => TooltipState::Hidden,
        }
    }

    pub fn shown(&self) -> Option<usize> {
        match self {
            TooltipState::Hidden => None,
            TooltipState::Shown(order) => Some(*order),
        }
    }
}

/// Inner HTML of one span's tooltip.
pub fn tooltip_content(span: &Span<'_>) -> String {
    let mut html = format!(
        "<div class=\"tooltip-info\"><strong>Category:</strong> {}</div>\n<div class=\"tooltip-info\"><strong>Type:</strong> {}</div>\n<div class=\"tooltip-info\"><strong>Severity:</strong> {}</div>",
        escape_html(&span.category.capitalized()),
        escape_html(&span.facets.subcategory),
        escape_html(&span.facets.severity),
    );
    if !span.facets.comment.is_empty() {
        html.push_str(&format!(
            "\n<div class=\"tooltip-comment\">{}</div>",
            escape_html(&span.facets.comment)
        ));
    }
    html
}

/// One `<template id="tooltip-N">` per span that governs at least one run.
///
/// Spans hidden entirely behind inner spans never receive pointer events
/// and get no template.
pub fn render_tooltip_templates(composition: &Composition<'_>) -> String {
    let governing: BTreeSet<usize> = composition.runs.iter().filter_map(|run| run.span).collect();

    let mut html = String::new();
    for span in governing
        .into_iter()
        .filter_map(|order| composition.spans.get(order))
    {
        html.push_str(&format!(
            "<template id=\"tooltip-{}\">{}</template>\n",
            span.order,
            tooltip_content(span)
        ));
    }
    html
}
