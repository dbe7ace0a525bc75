//! A small markdown renderer for text that already carries highlight markup.
//!
//! The input is a [`MarkedText`]: plain markdown source interleaved with
//! opaque markup fragments (the highlight `<span>`s produced from composed
//! runs). Fragments must come out byte-for-byte unchanged, so they never
//! take part in markdown processing:
//!
//! 1. Every fragment is replaced by a placeholder token that carries its
//!    index in a side table.
//! 2. Block passes (tables, blockquotes) run over the protected lines.
//! 3. Inline passes (headers, rules, bold, italic, links) run as ordered
//!    pattern substitutions.
//! 4. The result is split into paragraphs.
//! 5. Tokens are swapped back for their fragments by index.
//!
//! Placeholder tokens are delimited by two private-use characters. Any such
//! character occurring in the plain text is itself stashed as a fragment
//! before processing, so every delimiter left in the working string belongs
//! to a token the renderer created.
//!
//! Supported syntax is deliberately small: `#`-`###` headers, `---` rules,
//! `**bold**`, `*italic*`, `[label](url)` links, pipe tables and `>`
//! blockquotes. Plain text has `&` and `<` escaped.

mod blocks;
mod inline;

use tracing::trace;

/// Opens a placeholder token.
const TOKEN_OPEN: char = '\u{E000}';
/// Closes a placeholder token.
const TOKEN_CLOSE: char = '\u{E001}';

/// One piece of marked text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Markdown source.
    Plain(String),
    /// Index of an opaque markup fragment.
    Placeholder(usize),
}

/// Markdown source interleaved with opaque markup fragments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkedText {
    segments: Vec<Segment>,
    fragments: Vec<String>,
}

impl MarkedText {
    /// Creates empty marked text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates marked text holding only markdown source.
    pub fn from_plain(text: &str) -> Self {
        let mut marked = Self::new();
        marked.push_plain(text);
        marked
    }

    /// Appends markdown source, merging with a preceding plain segment.
    pub fn push_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Plain(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Plain(text.to_string()));
        }
    }

    /// Appends an opaque markup fragment.
    pub fn push_markup(&mut self, markup: impl Into<String>) {
        self.segments.push(Segment::Placeholder(self.fragments.len()));
        self.fragments.push(markup.into());
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The fragment behind a placeholder index.
    pub fn fragment(&self, index: usize) -> Option<&str> {
        self.fragments.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Renders marked text to HTML block markup.
pub fn render(marked: &MarkedText) -> String {
    let (protected, table) = protect(marked);

    let blocks = blocks::render_blocks(&protected);
    let inline = inline::render_inline(&blocks);
    let paragraphs = inline::wrap_paragraphs(&inline);

    trace!(fragments = table.len(), "restoring protected fragments");
    restore(&paragraphs, &table)
}

/// Builds the working string and the fragment table.
fn protect(marked: &MarkedText) -> (String, Vec<String>) {
    let mut table = marked.fragments.clone();
    let mut protected = String::new();

    for segment in &marked.segments {
        match segment {
            Segment::Placeholder(index) => push_token(&mut protected, *index),
            Segment::Plain(text) => {
                for ch in text.chars() {
                    match ch {
                        '&' => protected.push_str("&amp;"),
                        '<' => protected.push_str("&lt;"),
                        TOKEN_OPEN | TOKEN_CLOSE => {
                            push_token(&mut protected, table.len());
                            table.push(ch.to_string());
                        }
                        _ => protected.push(ch),
                    }
                }
            }
        }
    }

    (protected, table)
}

fn push_token(out: &mut String, index: usize) {
    out.push(TOKEN_OPEN);
    out.push_str(&index.to_string());
    out.push(TOKEN_CLOSE);
}

/// Swaps every token for its fragment.
fn restore(html: &str, table: &[String]) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find(TOKEN_OPEN) {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + TOKEN_OPEN.len_utf8()..];

        let restored = after_open.find(TOKEN_CLOSE).and_then(|close| {
            let fragment = after_open[..close]
                .parse::<usize>()
                .ok()
                .and_then(|index| table.get(index))?;
            Some((fragment, close))
        });

        match restored {
            Some((fragment, close)) => {
                out.push_str(fragment);
                rest = &after_open[close + TOKEN_CLOSE.len_utf8()..];
            }
            None => {
                // Only reachable if a pass split a token; drop the delimiter.
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}
