//! Inline substitutions and paragraph wrapping.
//!
//! Substitutions run in a fixed order; none of them produces text that a
//! later pattern could match again.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::TOKEN_OPEN;

// A header on the last line of a blockquote must close before the quote.
static H3: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^### (.*?)(</blockquote>)?$").expect("valid h3 regex")
});
static H2: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^## (.*?)(</blockquote>)?$").expect("valid h2 regex")
});
static H1: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^# (.*?)(</blockquote>)?$").expect("valid h1 regex")
});

static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^---+$").expect("valid rule regex"));

/// `**text**` where text is non-empty, has no `**`, does not end in `*`
/// and stays on one line.
static BOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*((?:[^*\n]|\*[^*\n])+)\*\*").expect("valid bold regex")
});

static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").expect("valid italic regex"));

/// `[label](url)`; a url containing protected markup is not a link.
static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\[([^\]]+)\]\(([^){TOKEN_OPEN}]+)\)")).expect("valid link regex")
});

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));

static BLOCK_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^<(h[1-6]|table|blockquote|hr)").expect("valid block-start regex")
});

/// Applies header, rule, bold, italic and link substitutions in order.
pub(super) fn render_inline(text: &str) -> String {
    let html = H3.replace_all(text, "<h3>${1}</h3>${2}");
    let html = H2.replace_all(&html, "<h2>${1}</h2>${2}");
    let html = H1.replace_all(&html, "<h1>${1}</h1>${2}");
    let html = RULE.replace_all(&html, "<hr>");
    let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
    let html = ITALIC.replace_all(&html, "<em>${1}</em>");
    let html = LINK.replace_all(&html, |caps: &Captures<'_>| {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            caps[2].replace('"', "&quot;"),
            &caps[1]
        )
    });
    html.into_owned()
}

/// Splits on blank lines and wraps chunks that are not already blocks.
pub(super) fn wrap_paragraphs(html: &str) -> String {
    PARAGRAPH_BREAK
        .split(html)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            if BLOCK_START.is_match(chunk) {
                chunk.to_string()
            } else {
                format!("<p>{}</p>", chunk.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
