//! Lightweight formatter for the service's explanation text.
//!
//! The explanation is loosely structured markdown: blank-line separated blocks,
//! `##` or `**` headings, `-`/`*` bullet lists and inline `**bold**` spans.
//! [`format_explanation`] turns it into a small block tree that the terminal
//! renders directly and that [`Markup::to_html`] serialises as HTML.
//!
//! Blocks are classified independently; nothing carries over from one block to
//! the next.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// An inline run inside a paragraph or list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// Content of a `**...**` span.
    Strong(String),
    LineBreak,
}

/// One formatted block of the explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    /// One entry per retained bullet line.
    List(Vec<Vec<Inline>>),
    Paragraph(Vec<Inline>),
}

/// Formatted explanation, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub blocks: Vec<Block>,
}

impl Markup {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Serialises the block tree as HTML. Text content is escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Heading(text) => {
                    out.push_str("<h4>");
                    out.push_str(&escape_html(text).replace('\n', "<br>"));
                    out.push_str("</h4>");
                }
                Block::List(items) => {
                    out.push_str("<ul>");
                    for item in items {
                        out.push_str("<li>");
                        push_inlines(&mut out, item);
                        out.push_str("</li>");
                    }
                    out.push_str("</ul>");
                }
                Block::Paragraph(inlines) => {
                    out.push_str("<p>");
                    push_inlines(&mut out, inlines);
                    out.push_str("</p>");
                }
            }
        }
        out
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Strong(text) => {
                out.push_str("<strong>");
                out.push_str(&escape_html(text));
                out.push_str("</strong>");
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"))
}

/// Formats an explanation string into [`Markup`].
pub fn format_explanation(explanation: &str) -> Markup {
    let normalized = explanation.replace("\r\n", "\n");
    let blocks = split_blocks(&normalized)
        .into_iter()
        .map(|lines| format_block(&lines))
        .collect();
    Markup { blocks }
}

/// Groups consecutive non-blank lines. Whitespace-only lines are boundaries.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn format_block(lines: &[&str]) -> Block {
    let text = lines.join("\n");

    if text.starts_with('#') {
        let stripped = text.trim_start_matches('#').trim();
        return Block::Heading(stripped.replace("**", ""));
    }
    if text.starts_with("**") {
        return Block::Heading(text.replace("**", "").trim().to_owned());
    }

    let bullets: Vec<&str> = lines
        .iter()
        .map(|line| line.trim_start())
        .filter(|line| is_bullet(line))
        .collect();
    if !bullets.is_empty() {
        let items = bullets.iter().map(|line| inline_spans(&line[2..])).collect();
        return Block::List(items);
    }

    let mut inlines = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            inlines.push(Inline::LineBreak);
        }
        inlines.extend(inline_spans(line));
    }
    Block::Paragraph(inlines)
}

fn is_bullet(line: &str) -> bool {
    line.starts_with("- ") || line.starts_with("* ")
}

/// Splits one line into text and `**bold**` runs. Spans never cross lines.
fn inline_spans(line: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in bold_pattern().captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Inline::Text(line[last..whole.start()].to_owned()));
        }
        out.push(Inline::Strong(inner.as_str().to_owned()));
        last = whole.end();
    }
    if last < line.len() {
        out.push(Inline::Text(line[last..].to_owned()));
    }
    out
}
