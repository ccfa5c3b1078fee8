//! Responsive 3-panel layout engine for coderefine.
//!
//! Pure layout arithmetic, recomputed inside `terminal.draw()` on every frame
//! so it always reflects the current terminal size.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single cell and merge their junction
//! characters.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Health, Mode, Notice};
use crate::theme::Theme;

/// Below this width the panels stack vertically.
const WIDE_LAYOUT_MIN_COLS: u16 = 120;

/// Returns `[input, review, output, status_bar]` for the current frame.
///
/// | Terminal width | Layout |
/// |----------------|--------|
/// | `< 120` cols   | Input on top, Review and Output side by side below |
/// | `>= 120` cols  | Three columns: 35 / 30 / 35 |
///
/// # Arguments
///
/// * `frame`: current render frame (provides `frame.area()` with live terminal size)
pub fn compute_layout(frame: &Frame) -> [Rect; 4] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    if main_area.width >= WIDE_LAYOUT_MIN_COLS {
        let [input, review, output] = main_area.layout(
            &Layout::horizontal([
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Percentage(35),
            ])
            .spacing(Spacing::Overlap(1)),
        );
        return [input, review, output, status_bar];
    }

    let [input, bottom] = main_area.layout(
        &Layout::vertical([Constraint::Percentage(45), Constraint::Fill(1)])
            .spacing(Spacing::Overlap(1)),
    );
    let [review, output] = bottom.layout(
        &Layout::horizontal([Constraint::Percentage(45), Constraint::Fill(1)])
            .spacing(Spacing::Overlap(1)),
    );
    [input, review, output, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Focused panels get `BorderType::Thick`. `MergeStrategy::Fuzzy` is required
/// because `Exact` produces broken junctions when `Thick` meets `Plain`.
///
/// # Arguments
///
/// * `title`: panel title shown in the top border
/// * `is_focused`: `true` when this panel has keyboard focus
/// * `theme`: active color theme
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar.
///
/// Left to right: mode indicator, then the most relevant message. A review in
/// flight wins over the error, which wins over a notice, which wins over the
/// service health. In `OpenFile` mode the path prompt replaces all of them.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: the 1-row `Rect` returned by `compute_layout` (index 3)
/// * `state`: read-only app state
/// * `theme`: active color theme
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::OpenFile => (" OPEN ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let mut spans = vec![
        Span::styled(
            mode_text,
            Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    spans.extend(message_spans(state, theme));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠸", "⠴"];

fn message_spans<'a>(state: &'a AppState, theme: &Theme) -> Vec<Span<'a>> {
    if state.mode == Mode::OpenFile {
        return vec![
            Span::raw("Open file: "),
            Span::raw(state.path_input.as_str()),
            Span::styled("█", Style::default().fg(theme.status_mode_insert)),
        ];
    }
    if let Some(step) = state.loading_step() {
        let spinner = SPINNER[state.loading_ticks % SPINNER.len()];
        return vec![
            Span::styled(format!("{spinner} "), Style::default().fg(theme.selected)),
            Span::raw(format!("{step}...")),
            Span::styled("  (submit disabled)", Style::default().fg(theme.muted)),
        ];
    }
    if let Some(error) = state.orchestrator.error() {
        return vec![Span::styled(
            error,
            Style::default()
                .fg(theme.status_error)
                .add_modifier(Modifier::BOLD),
        )];
    }
    match &state.notice {
        Some(Notice::Info(msg)) => {
            return vec![Span::styled(msg.as_str(), Style::default().fg(theme.status_notice))];
        }
        Some(Notice::Error(msg)) => {
            return vec![Span::styled(msg.as_str(), Style::default().fg(theme.status_error))];
        }
        None => {}
    }
    match &state.health {
        Health::Unknown => vec![Span::styled(
            "Checking review service...",
            Style::default().fg(theme.muted),
        )],
        Health::Up { ai_enabled } => {
            let ai = match ai_enabled {
                Some(true) => "  AI: on",
                Some(false) => "  AI: off",
                None => "",
            };
            vec![
                Span::styled("● service up", Style::default().fg(theme.status_notice)),
                Span::styled(ai, Style::default().fg(theme.muted)),
                Span::styled("  r submit  ? help", Style::default().fg(theme.muted)),
            ]
        }
        Health::Down(reason) => vec![Span::styled(
            format!("● service unreachable: {reason}"),
            Style::default().fg(theme.status_error),
        )],
    }
}
