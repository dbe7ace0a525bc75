//! Complete HTML pages.
//!
//! Every page comes from one embedded mustache template. A page shows one
//! evaluation, a load error, or (for the site index) only the selector.

use serde::Serialize;

use super::legend::render_legend;
use super::summary::{issue_rows, overall_scores, render_issue_rows, OverallScores};
use super::text::render_annotated_text;
use super::tooltip::render_tooltip_templates;
use super::RenderContext;
use crate::error::EvalviewError;
use crate::model::SiteConfig;

const PAGE_TEMPLATE: &str = include_str!("templates/page.html.mustache");

/// Title used when no configuration is available.
const DEFAULT_TITLE: &str = "Translation Evaluation";

/// Evaluation selector shown on site pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Selector {
    pub has_options: bool,
    pub options: Vec<SelectorOption>,
}

/// One entry of the selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    /// Page the option navigates to.
    pub href: String,
    pub label: String,
    pub selected: bool,
}

impl Selector {
    /// Builds a selector from `(href, label)` pairs, in order.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let options: Vec<SelectorOption> = entries
            .into_iter()
            .map(|(href, label)| SelectorOption {
                href,
                label,
                selected: false,
            })
            .collect();
        Self {
            has_options: !options.is_empty(),
            options,
        }
    }

    /// The same selector with the option pointing at `href` preselected.
    pub fn with_selected(&self, href: &str) -> Self {
        let mut selector = self.clone();
        for option in &mut selector.options {
            option.selected = option.href == href;
        }
        selector
    }
}

#[derive(Debug, Default, Serialize)]
struct DocumentData {
    legend: String,
    text: String,
    scores: OverallScores,
    issues: String,
    tooltips: String,
}

#[derive(Debug, Default, Serialize)]
struct PageData {
    title: String,
    has_translator: bool,
    translator: String,
    has_footer: bool,
    footer: String,
    has_selector: bool,
    selector: Selector,
    has_error: bool,
    error_message: String,
    has_document: bool,
    document: DocumentData,
}

impl PageData {
    fn new(config: Option<&SiteConfig>, selector: Option<&Selector>) -> Self {
        let mut data = PageData {
            title: DEFAULT_TITLE.to_string(),
            ..PageData::default()
        };
        if let Some(config) = config {
            data.title = config.page_title();
            data.has_translator = !config.translator.is_empty();
            data.translator = config.translator.clone();
            data.has_footer = true;
            data.footer = config.footer();
        }
        if let Some(selector) = selector {
            data.has_selector = true;
            data.selector = selector.clone();
        }
        data
    }

    fn render(&self) -> Result<String, EvalviewError> {
        let template = mustache::compile_str(PAGE_TEMPLATE)?;
        Ok(template.render_to_string(self)?)
    }
}

/// Renders a standalone page for one evaluation.
pub fn render_page(ctx: &RenderContext<'_>) -> Result<String, EvalviewError> {
    render_page_with_selector(ctx, None)
}

/// Renders an evaluation page, optionally with the site selector.
pub fn render_page_with_selector(
    ctx: &RenderContext<'_>,
    selector: Option<&Selector>,
) -> Result<String, EvalviewError> {
    let composition = ctx.compose();

    let mut data = PageData::new(ctx.config, selector);
    data.has_document = true;
    data.document = DocumentData {
        legend: render_legend(ctx.document),
        text: render_annotated_text(&composition),
        scores: overall_scores(&ctx.facets),
        issues: render_issue_rows(&issue_rows(ctx)),
        tooltips: render_tooltip_templates(&composition),
    };
    data.render()
}

/// Renders the page shown for an evaluation file that failed to load.
pub fn render_error_page(
    config: Option<&SiteConfig>,
    selector: Option<&Selector>,
    file_name: &str,
) -> Result<String, EvalviewError> {
    let mut data = PageData::new(config, selector);
    data.has_error = true;
    data.error_message = format!("Error loading {file_name}. Please check the file format.");
    data.render()
}

/// Renders the site index: header, selector and footer only.
pub fn render_index(config: &SiteConfig, selector: &Selector) -> Result<String, EvalviewError> {
    PageData::new(Some(config), Some(selector)).render()
}
