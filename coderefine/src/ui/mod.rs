//! UI rendering module for coderefine.
//!
//! `render()` is the single entry point called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! panel has its own module.

mod layout;
pub mod help;
pub mod input_view;
pub mod keybindings;
pub mod output_view;
pub mod review_view;

use ratatui::{Frame, style::Style, widgets::Block};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: Input, Review and Output panels plus the
/// status bar, with the help overlay on top when active.
///
/// Panel rects and the Input viewport height are written back into `state`
/// for mouse hit-testing and scrolling on the next keypress. The one-frame
/// lag is imperceptible in practice.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `state`: mutable app state (layout caches are written here)
/// * `theme`: active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    frame.render_widget(
        Block::new().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    let [input, review, output, status_bar] = compute_layout(frame);
    state.panel_rects = [input, review, output];
    // Options line takes the last inner row of the Input panel.
    state.input_viewport_height = inner_rect(input).height.saturating_sub(1);

    input_view::render_input(frame, input, state, theme);
    review_view::render_review(frame, review, state, theme);
    output_view::render_output(frame, output, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn renders_at_narrow_and_wide_sizes() {
        for (w, h) in [(80, 24), (160, 40), (20, 5)] {
            let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
            let mut state = AppState::default();
            state.mode = Mode::HelpOverlay;
            terminal
                .draw(|frame| render(frame, &mut state, &Theme::catppuccin_mocha()))
                .unwrap();
            assert_eq!(state.panel_rects[0].y, 0);
        }
    }
}
