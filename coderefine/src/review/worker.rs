//! Background thread that owns the review client for its lifetime.
//!
//! The HTTP call is blocking, so it runs here instead of on the event loop.
//! All communication is via channels: ReviewJob in, AppEvent out.

use std::sync::LazyLock;

use coderefine_core::client::ReviewClient;
use coderefine_core::types::ReviewResult;
use crossbeam_channel::Receiver;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use similar::{ChangeTag, TextDiff};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::event::AppEvent;
use crate::review::types::{DiffStats, HighlightedPanes, ReviewJob, ReviewPayload};

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Entry point for the review worker thread.
///
/// Loops over incoming jobs until the channel is closed (sender dropped).
pub fn review_worker_loop(
    client: ReviewClient,
    rx: Receiver<ReviewJob>,
    event_tx: UnboundedSender<AppEvent>,
) {
    // Load syntect tables now so the first review is not slowed down by them.
    let _ = &*PS;
    let _ = &*TS;

    for job in rx {
        let event = match job {
            ReviewJob::Review { id, request } => {
                info!(%id, url = client.base_url(), "review started");
                let outcome = client.review(&request);
                let panes = match &outcome {
                    Ok(result) => {
                        info!(%id, issues = result.issues.len(), "review finished");
                        highlight_panes(&request.code, result)
                    }
                    Err(e) => {
                        warn!(%id, error = %e, "review failed");
                        HighlightedPanes::default()
                    }
                };
                AppEvent::Review(Box::new(ReviewPayload {
                    id,
                    original_code: request.code,
                    outcome,
                    panes,
                }))
            }
            ReviewJob::Health => AppEvent::Health(client.health()),
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }
}

/// Builds the highlighted optimized pane and the original → optimized diff.
fn highlight_panes(original: &str, result: &ReviewResult) -> HighlightedPanes {
    let syntax = syntax_for(result.detected_language.as_deref());
    let theme = TS
        .themes
        .get("base16-ocean.dark")
        .or_else(|| TS.themes.values().next());

    let Some(theme) = theme else {
        let (diff, stats) = plain_diff_lines(original, &result.optimized_code);
        return HighlightedPanes {
            optimized: plain_code_lines(&result.optimized_code),
            diff,
            stats,
        };
    };

    let (diff, stats) = diff_lines(original, &result.optimized_code, syntax, theme);
    HighlightedPanes {
        optimized: code_lines(&result.optimized_code, syntax, theme),
        diff,
        stats,
    }
}

/// Maps the service's language name to a syntect syntax, plain text if unknown.
fn syntax_for(language: Option<&str>) -> &'static SyntaxReference {
    let token = match language.map(|l| l.trim().to_ascii_lowercase()) {
        Some(l) => match l.as_str() {
            "csharp" | "c#" => "cs".to_owned(),
            "typescript" => "js".to_owned(),
            "c++" => "cpp".to_owned(),
            "kotlin" => "java".to_owned(),
            _ => l,
        },
        None => return PS.find_syntax_plain_text(),
    };
    PS.find_syntax_by_token(&token)
        .unwrap_or_else(|| PS.find_syntax_plain_text())
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::{Color as SC, FontStyle};
    let rgb = |c: SC| (c.a > 0).then_some(Color::Rgb(c.r, c.g, c.b));

    let mut out = Style::default();
    if let Some(fg) = rgb(style.foreground) {
        out = out.fg(fg);
    }
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), out)
}

/// Highlights one line of code. Falls back to a plain span on error.
fn syntect_spans(code: &str, h: &mut HighlightLines) -> Vec<Span<'static>> {
    let spans: Vec<Span<'static>> = h
        .highlight_line(code, &PS)
        .unwrap_or_default()
        .into_iter()
        .map(|(style, text)| syntect_to_span(style, text))
        .collect();
    if spans.is_empty() {
        vec![Span::raw(code.to_owned())]
    } else {
        spans
    }
}

fn gutter(lineno: usize, width: usize) -> Span<'static> {
    Span::styled(
        format!("{lineno:>width$} │ "),
        Style::default().fg(Color::DarkGray),
    )
}

fn code_lines(code: &str, syntax: &SyntaxReference, theme: &SyntectTheme) -> Vec<Line<'static>> {
    if code.is_empty() {
        return Vec::new();
    }
    let mut h = HighlightLines::new(syntax, theme);
    let width = code.lines().count().to_string().len();
    code.lines()
        .enumerate()
        .map(|(idx, line)| {
            let mut spans = vec![gutter(idx + 1, width)];
            spans.extend(syntect_spans(line, &mut h));
            Line::from(spans)
        })
        .collect()
}

fn plain_code_lines(code: &str) -> Vec<Line<'static>> {
    let width = code.lines().count().to_string().len();
    code.lines()
        .enumerate()
        .map(|(idx, line)| Line::from(vec![gutter(idx + 1, width), Span::raw(line.to_owned())]))
        .collect()
}

/// Word-level emphasis for a removed/added line pair.
///
/// Returns (old spans, new spans); changed words are bold.
fn word_diff_spans(old_line: &str, new_line: &str) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
    let diff = TextDiff::from_words(old_line, new_line);
    let mut old_spans = Vec::new();
    let mut new_spans = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            for (emphasized, value) in change.iter_strings_lossy() {
                let text = value.into_owned();
                let emphasis = |color: Color| {
                    let style = Style::default().fg(color);
                    if emphasized {
                        style.add_modifier(Modifier::BOLD)
                    } else {
                        style
                    }
                };
                match change.tag() {
                    ChangeTag::Delete => old_spans.push(Span::styled(text, emphasis(Color::Red))),
                    ChangeTag::Insert => new_spans.push(Span::styled(text, emphasis(Color::Green))),
                    ChangeTag::Equal => {
                        let span = Span::styled(text, Style::default().fg(Color::DarkGray));
                        old_spans.push(span.clone());
                        new_spans.push(span);
                    }
                }
            }
        }
    }
    (old_spans, new_spans)
}

fn marker(tag: ChangeTag) -> Span<'static> {
    match tag {
        ChangeTag::Delete => Span::styled("- ", Style::default().fg(Color::Red)),
        ChangeTag::Insert => Span::styled("+ ", Style::default().fg(Color::Green)),
        ChangeTag::Equal => Span::styled("  ", Style::default().fg(Color::DarkGray)),
    }
}

/// Line diff of `original` against `optimized`.
///
/// A removed line directly followed by an added line is shown as a pair with
/// word-level emphasis; everything else is syntax-highlighted.
fn diff_lines(
    original: &str,
    optimized: &str,
    syntax: &SyntaxReference,
    theme: &SyntectTheme,
) -> (Vec<Line<'static>>, DiffStats) {
    let diff = TextDiff::from_lines(original, optimized);
    let mut h = HighlightLines::new(syntax, theme);
    let mut out: Vec<Line<'static>> = Vec::new();
    let mut stats = DiffStats::default();
    let mut pending_removed: Option<(String, Vec<Span<'static>>)> = None;

    for change in diff.iter_all_changes() {
        let code = change.value().trim_end_matches('\n');
        let base_spans = syntect_spans(code, &mut h);

        match change.tag() {
            ChangeTag::Delete => {
                stats.removed += 1;
                if let Some((_, spans)) = pending_removed.take() {
                    out.push(Line::from(spans));
                }
                let mut s = vec![marker(ChangeTag::Delete)];
                s.extend(base_spans);
                pending_removed = Some((code.to_owned(), s));
            }
            ChangeTag::Insert => {
                stats.added += 1;
                if let Some((old_code, _)) = pending_removed.take() {
                    let (old_words, new_words) = word_diff_spans(&old_code, code);
                    let mut old_s = vec![marker(ChangeTag::Delete)];
                    old_s.extend(old_words);
                    out.push(Line::from(old_s));
                    let mut new_s = vec![marker(ChangeTag::Insert)];
                    new_s.extend(new_words);
                    out.push(Line::from(new_s));
                } else {
                    let mut s = vec![marker(ChangeTag::Insert)];
                    s.extend(base_spans);
                    out.push(Line::from(s));
                }
            }
            ChangeTag::Equal => {
                if let Some((_, spans)) = pending_removed.take() {
                    out.push(Line::from(spans));
                }
                let mut s = vec![marker(ChangeTag::Equal)];
                s.extend(base_spans);
                out.push(Line::from(s));
            }
        }
    }
    if let Some((_, spans)) = pending_removed.take() {
        out.push(Line::from(spans));
    }

    (out, stats)
}

/// Unhighlighted diff, used when no syntect theme is available.
fn plain_diff_lines(original: &str, optimized: &str) -> (Vec<Line<'static>>, DiffStats) {
    let diff = TextDiff::from_lines(original, optimized);
    let mut stats = DiffStats::default();
    let lines = diff
        .iter_all_changes()
        .map(|change| {
            let color = match change.tag() {
                ChangeTag::Delete => {
                    stats.removed += 1;
                    Color::Red
                }
                ChangeTag::Insert => {
                    stats.added += 1;
                    Color::Green
                }
                ChangeTag::Equal => Color::DarkGray,
            };
            Line::from(vec![
                marker(change.tag()),
                Span::styled(
                    change.value().trim_end_matches('\n').to_owned(),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect();
    (lines, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn diff_counts_added_and_removed_lines() {
        let (lines, stats) = plain_diff_lines("a\nb\nc\n", "a\nc\nd\n");
        assert_eq!(stats, DiffStats { added: 1, removed: 1 });
        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(text, vec!["  a", "- b", "  c", "+ d"]);
    }

    #[test]
    fn replaced_line_is_paired() {
        let syntax = PS.find_syntax_plain_text();
        let theme = TS.themes.values().next().expect("default themes");
        let (lines, stats) = diff_lines("let x = 1;\n", "let y = 1;\n", syntax, theme);
        assert_eq!(stats, DiffStats { added: 1, removed: 1 });
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "- let x = 1;");
        assert_eq!(line_text(&lines[1]), "+ let y = 1;");
    }

    #[test]
    fn optimized_pane_has_gutter() {
        let lines = plain_code_lines("one\ntwo");
        assert_eq!(line_text(&lines[1]), "2 │ two");
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        assert_eq!(syntax_for(Some("Brainfuck")).name, PS.find_syntax_plain_text().name);
        assert_eq!(syntax_for(None).name, "Plain Text");
        assert_eq!(syntax_for(Some("Python")).name, "Python");
    }
}
