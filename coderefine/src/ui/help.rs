//! Help overlay renderer for coderefine.
//!
//! Draws a centred modal over the panel layout. `Clear` erases the background
//! first, inside the same `terminal.draw()` closure as the panels.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal.
///
/// Skipped on terminals narrower than 60 columns, where the centred rect
/// would be too small to be useful.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `theme`: active color theme
/// * `help_scroll`: vertical scroll offset; j/k in HelpOverlay mode mutate this field
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let section = |title: &'static str| {
        Line::styled(
            title,
            Style::default()
                .fg(theme.selected)
                .add_modifier(Modifier::BOLD),
        )
    };
    Text::from(vec![
        section("Review"),
        Line::from("  i             Edit code (Esc to stop)"),
        Line::from("  r             Submit code for review"),
        Line::from("  o             Open a file into the editor"),
        Line::from("  x             Clear the editor"),
        Line::from("  Paste         Inserts into the editor"),
        Line::from(""),
        section("Options"),
        Line::from("  t             Cycle language"),
        Line::from("  d             Cycle depth: quick, standard, deep"),
        Line::from("  s / p / b     Toggle security / performance / best-practice checks"),
        Line::from(""),
        section("Results"),
        Line::from("  f             Cycle severity filter"),
        Line::from("  1 2 3 4       Filter: all / critical / warning / info"),
        Line::from("  Tab           Next output tab: optimized, diff, explanation"),
        Line::from("  c             Copy optimized code to the clipboard"),
        Line::from("  e             Export the review as JSON"),
        Line::from(""),
        section("Navigation"),
        Line::from("  H / L         Move panel focus left / right"),
        Line::from("  j / k         Scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from("  Ctrl-f / b    Scroll full page down / up"),
        Line::from(""),
        section("General"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q             Quit"),
    ])
}
