//! Output panel: tabs for the optimized code, the diff against the submitted
//! code, and the formatted explanation.
//!
//! The code tabs use manual virtual scrolling: only
//! `lines[output_scroll..output_scroll + viewport_height]` are cloned into the
//! frame, so rendering cost is O(viewport), not O(total lines).

use coderefine_core::format::{Block, Inline, Markup};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Tabs, Wrap},
};

use crate::app::{AppState, OutputTab, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the Output panel for the selected tab.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: the `Rect` for the panel (includes borders)
/// * `state`: app state; viewport and explanation heights are cached here
/// * `theme`: active color theme
pub fn render_output(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Output;
    frame.render_widget(panel_block(" Output ", is_focused, theme), area);

    let inner = inner_rect(area);
    let [tabs_area, body_area] =
        inner.layout(&Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]));

    let tabs = Tabs::new(OutputTab::ALL.iter().map(|t| t.title()))
        .select(state.output_tab.index())
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.selected)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    frame.render_widget(tabs, tabs_area);

    state.output_viewport_height = body_area.height;

    if state.orchestrator.is_loading() && !state.view.has_result() {
        placeholder(frame, body_area, "Reviewing...", theme);
        return;
    }
    if !state.view.has_result() {
        placeholder(frame, body_area, "Results appear here after a review.", theme);
        return;
    }

    match state.output_tab {
        OutputTab::Optimized => {
            render_code(frame, body_area, &state.panes.optimized, state.output_scroll);
        }
        OutputTab::Diff => {
            if state.panes.diff.is_empty() {
                placeholder(frame, body_area, "No changes.", theme);
            } else {
                render_code(frame, body_area, &state.panes.diff, state.output_scroll);
            }
        }
        OutputTab::Explanation => {
            let lines = markup_lines(&state.view.explanation, theme);
            state.explanation_height = lines.len();
            if lines.is_empty() {
                placeholder(frame, body_area, "No explanation provided.", theme);
                return;
            }
            let scroll = state.output_scroll.min(lines.len().saturating_sub(1));
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
                body_area,
            );
        }
    }
}

fn placeholder(frame: &mut Frame, area: Rect, msg: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::styled(msg, Style::default().fg(theme.muted))),
        area,
    );
}

fn render_code(frame: &mut Frame, area: Rect, lines: &[Line<'static>], scroll: usize) {
    let total = lines.len();
    let visible_start = scroll.min(total.saturating_sub(1));
    let visible_end = (visible_start + usize::from(area.height)).min(total);

    let items: Vec<ListItem> = lines[visible_start..visible_end]
        .iter()
        .map(|l| ListItem::new(l.clone()))
        .collect();
    frame.render_widget(List::new(items), area);
}

/// Converts formatted explanation markup into styled lines, with a blank line
/// between blocks.
pub fn markup_lines<'a>(markup: &'a Markup, theme: &Theme) -> Vec<Line<'a>> {
    let strong = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let plain = Style::default().fg(theme.text);
    let mut out: Vec<Line<'a>> = Vec::new();

    for block in &markup.blocks {
        if !out.is_empty() {
            out.push(Line::default());
        }
        match block {
            Block::Heading(text) => {
                let heading = Style::default()
                    .fg(theme.selected)
                    .add_modifier(Modifier::BOLD);
                out.extend(text.lines().map(|l| Line::styled(l, heading)));
            }
            Block::Paragraph(inlines) => {
                out.extend(inline_lines(inlines, Vec::new(), plain, strong));
            }
            Block::List(items) => {
                for item in items {
                    let bullet = Span::styled("• ", Style::default().fg(theme.selected));
                    out.extend(inline_lines(item, vec![bullet], plain, strong));
                }
            }
        }
    }
    out
}

/// Splits a run of inlines into lines at each `LineBreak`. `lead` starts the
/// first line.
fn inline_lines<'a>(
    inlines: &'a [Inline],
    lead: Vec<Span<'a>>,
    plain: Style,
    strong: Style,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    let mut current = lead;
    for inline in inlines {
        match inline {
            Inline::Text(text) => current.push(Span::styled(text.as_str(), plain)),
            Inline::Strong(text) => current.push(Span::styled(text.as_str(), strong)),
            Inline::LineBreak => lines.push(Line::from(std::mem::take(&mut current))),
        }
    }
    lines.push(Line::from(current));
    lines
}
