//! Input panel: the code editor plus a one-line summary of review options.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Columns a tab expands to on screen.
const TAB_WIDTH: usize = 4;

/// Renders the Input panel and, in Insert mode, places the terminal cursor.
///
/// Only rows `input_scroll..input_scroll + height` are materialized. Long
/// lines are cut at the panel edge rather than wrapped so row numbers match
/// the editor's line numbers.
pub fn render_input(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Input;
    let title = if state.mode == Mode::Insert {
        " Input [editing, Esc to stop] "
    } else {
        " Input "
    };
    frame.render_widget(panel_block(title, is_focused, theme), area);

    let inner = inner_rect(area);
    let [editor_area, options_area] =
        inner.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    frame.render_widget(Paragraph::new(options_line(state, theme)), options_area);

    if state.editor.is_empty() && state.mode != Mode::Insert {
        frame.render_widget(
            Paragraph::new(vec![
                Line::styled("Press i to type or paste code,", Style::default().fg(theme.muted)),
                Line::styled("o to open a file, r to review.", Style::default().fg(theme.muted)),
            ]),
            editor_area,
        );
        return;
    }

    let text = state.editor.text();
    let total = state.editor.line_count();
    let gutter_width = total.to_string().len();
    let height = usize::from(editor_area.height);

    let lines: Vec<Line> = text
        .split('\n')
        .enumerate()
        .skip(state.input_scroll)
        .take(height)
        .map(|(idx, line)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>gutter_width$} ", idx + 1),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(expand_tabs(line), Style::default().fg(theme.text)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), editor_area);

    if state.mode == Mode::Insert {
        let (row, col) = state.editor.cursor_position();
        let line = text.split('\n').nth(row).unwrap_or_default();
        let prefix: String = line.chars().take(col).collect();
        let x = gutter_width + 1 + expand_tabs(&prefix).chars().count();
        let y = row.saturating_sub(state.input_scroll);
        if y < height {
            let max_x = usize::from(editor_area.width.saturating_sub(1));
            frame.set_cursor_position(Position {
                x: editor_area.x + x.min(max_x) as u16,
                y: editor_area.y + y as u16,
            });
        }
    }
}

fn expand_tabs(line: &str) -> String {
    line.replace('\t', &" ".repeat(TAB_WIDTH))
}

fn options_line<'a>(state: &AppState, theme: &Theme) -> Line<'a> {
    let options = state.orchestrator.options;
    let label = Style::default().fg(theme.muted);
    let value = Style::default().fg(theme.selected).add_modifier(Modifier::BOLD);
    let check = |on: bool, name: &'a str| {
        let mark = if on { "[x] " } else { "[ ] " };
        Span::styled(format!("{mark}{name} "), if on { value } else { label })
    };

    Line::from(vec![
        Span::styled("lang ", label),
        Span::styled(format!("{} ", options.language.as_str()), value),
        Span::styled("depth ", label),
        Span::styled(format!("{} ", options.depth.as_str()), value),
        check(options.check_security, "sec"),
        check(options.check_performance, "perf"),
        check(options.check_best_practices, "style"),
    ])
}
