//! Keybinding dispatcher for coderefine.
//!
//! Translates crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` for the event loop. Dispatch branches first on `state.mode` so
//! Normal, Insert, OpenFile and HelpOverlay each have an isolated handler.

use coderefine_core::issues::SeverityFilter;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// Control-flow signal returned from the dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Copy the optimized code. Handled by the event loop, which owns the
    /// terminal the OSC 52 sequence is written to.
    Copy,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// # Arguments
///
/// * `key`: the raw crossterm key event (code + modifiers)
/// * `state`: mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
        Mode::OpenFile => handle_open_file(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    // Ctrl scroll combos first so Ctrl-d / Ctrl-f / Ctrl-b do not fall
    // through to the plain d / f / b bindings.
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char('i') => {
            state.mode = Mode::Insert;
            state.focus = PanelFocus::Input;
            state.follow_cursor();
        }
        KeyCode::Char('r') => state.submit(),
        KeyCode::Char('o') => {
            state.path_input.clear();
            state.mode = Mode::OpenFile;
        }
        KeyCode::Char('x') => state.clear_input(),
        KeyCode::Char('c') => return KeyAction::Copy,
        KeyCode::Char('e') => state.export(),

        // Severity filter
        KeyCode::Char('f') => state.cycle_filter(),
        KeyCode::Char('1') => state.set_filter(SeverityFilter::All),
        KeyCode::Char('2') => state.set_filter(SeverityFilter::Critical),
        KeyCode::Char('3') => state.set_filter(SeverityFilter::Warning),
        KeyCode::Char('4') => state.set_filter(SeverityFilter::Info),

        // Options
        KeyCode::Char('t') => state.cycle_language(),
        KeyCode::Char('d') => state.cycle_depth(),
        KeyCode::Char('s') => state.toggle_security(),
        KeyCode::Char('p') => state.toggle_performance(),
        KeyCode::Char('b') => state.toggle_best_practices(),

        KeyCode::Tab => state.select_tab(state.output_tab.next()),

        // Panel focus
        KeyCode::Char('H') => state.focus = state.focus.prev(),
        KeyCode::Char('L') => state.focus = state.focus.next(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }
        KeyCode::Esc => {
            state.notice = None;
            state.orchestrator.clear_error();
        }
        KeyCode::Char('q') => return KeyAction::Quit,
        _ => {}
    }
    KeyAction::Continue
}

/// Handles j / k / g / G and the Ctrl page combos.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when the key
/// should fall through to the rest of the Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return Some(KeyAction::Quit),
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        KeyCode::PageDown => state.full_page_down(),
        KeyCode::PageUp => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// `?`, `Esc` or `q` dismisses the overlay; j / k / g / G scroll it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Edits the code buffer. `Esc` returns to Normal mode.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let editor = &mut state.editor;

    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            return KeyAction::Continue;
        }
        KeyCode::Char('c') if ctrl => return KeyAction::Quit,
        KeyCode::Char(c) if !ctrl => editor.insert_char(c),
        KeyCode::Enter => editor.insert_char('\n'),
        KeyCode::Tab => editor.insert_str("    "),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Delete => editor.delete(),
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Up => editor.move_up(),
        KeyCode::Down => editor.move_down(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        _ => return KeyAction::Continue,
    }
    state.follow_cursor();
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// OpenFile mode
// ---------------------------------------------------------------------------

/// Edits the path prompt. `Enter` loads the file, `Esc` cancels.
fn handle_open_file(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.path_input.clear();
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => state.confirm_open_file(),
        KeyCode::Backspace => {
            state.path_input.pop();
        }
        KeyCode::Char(c) => state.path_input.push(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses a panel; the wheel scrolls the focused panel (or the
/// help overlay) by 3 lines.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_mouse_click(mouse.column, mouse.row, state),
        MouseEventKind::ScrollUp => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            } else {
                state.scroll_up(3);
            }
        }
        MouseEventKind::ScrollDown => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_add(3);
            } else {
                state.scroll_down(3);
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Sets focus from the cached panel rects. Clicking outside the Input panel
/// leaves Insert mode.
fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) {
    if state.mode == Mode::HelpOverlay || state.mode == Mode::OpenFile {
        return;
    }
    let pos = Position { x: col, y: row };
    let [input, review, output] = state.panel_rects;

    if input.contains(pos) {
        state.focus = PanelFocus::Input;
    } else if review.contains(pos) {
        state.focus = PanelFocus::Review;
    } else if output.contains(pos) {
        state.focus = PanelFocus::Output;
    } else {
        return;
    }
    if state.focus != PanelFocus::Input && state.mode == Mode::Insert {
        state.mode = Mode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::OutputTab;
    use coderefine_core::types::{Depth, Language};
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn insert_mode_edits_and_esc_leaves() {
        let mut state = AppState::default();
        handle_key(key(KeyCode::Char('i')), &mut state);
        assert_eq!(state.mode, Mode::Insert);
        for c in ['r', 'q'] {
            assert_eq!(handle_key(key(KeyCode::Char(c)), &mut state), KeyAction::Continue);
        }
        handle_key(key(KeyCode::Enter), &mut state);
        handle_key(key(KeyCode::Backspace), &mut state);
        handle_key(key(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.editor.text(), "rq");
        assert!(!state.orchestrator.is_loading());
    }

    #[test]
    fn number_keys_select_explicit_filter() {
        let mut state = AppState::default();
        handle_key(key(KeyCode::Char('2')), &mut state);
        assert_eq!(state.reconciler.board().filter(), SeverityFilter::Critical);
        handle_key(key(KeyCode::Char('4')), &mut state);
        assert_eq!(state.reconciler.board().filter(), SeverityFilter::Info);
        handle_key(key(KeyCode::Char('f')), &mut state);
        assert_eq!(state.reconciler.board().filter(), SeverityFilter::All);
    }

    #[test]
    fn option_keys_change_request_options() {
        let mut state = AppState::default();
        handle_key(key(KeyCode::Char('t')), &mut state);
        handle_key(key(KeyCode::Char('d')), &mut state);
        handle_key(key(KeyCode::Char('s')), &mut state);
        handle_key(key(KeyCode::Char('b')), &mut state);
        let options = state.orchestrator.options;
        assert_eq!(options.language, Language::Python);
        assert_eq!(options.depth, Depth::Deep);
        assert!(!options.check_security);
        assert!(options.check_performance);
        assert!(!options.check_best_practices);
    }

    #[test]
    fn ctrl_combos_scroll_instead_of_toggling() {
        let mut state = AppState::default();
        handle_key(ctrl('d'), &mut state);
        handle_key(ctrl('b'), &mut state);
        assert_eq!(state.orchestrator.options.depth, Depth::Standard);
        assert!(state.orchestrator.options.check_best_practices);
        assert_eq!(handle_key(ctrl('c'), &mut state), KeyAction::Quit);
    }

    #[test]
    fn empty_submit_shows_validation_error() {
        let mut state = AppState::default();
        handle_key(key(KeyCode::Char('r')), &mut state);
        assert_eq!(
            state.orchestrator.error(),
            Some("Please enter some code to review!")
        );
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.orchestrator.error().is_none());
    }

    #[test]
    fn tab_cycles_output_tabs_and_copy_is_delegated() {
        let mut state = AppState::default();
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.output_tab, OutputTab::Diff);
        assert_eq!(handle_key(key(KeyCode::Char('c')), &mut state), KeyAction::Copy);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn open_file_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.go");
        std::fs::write(&path, "package main").unwrap();

        let mut state = AppState::default();
        handle_key(key(KeyCode::Char('o')), &mut state);
        assert_eq!(state.mode, Mode::OpenFile);
        for c in path.to_string_lossy().chars() {
            handle_key(key(KeyCode::Char(c)), &mut state);
        }
        handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.editor.text(), "package main");
    }

    #[test]
    fn help_overlay_toggles() {
        let mut state = AppState::default();
        handle_key(key(KeyCode::Char('?')), &mut state);
        assert_eq!(state.mode, Mode::HelpOverlay);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.help_scroll, 1);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn click_focuses_panel_and_leaves_insert() {
        let mut state = AppState::default();
        state.panel_rects = [
            Rect::new(0, 0, 10, 10),
            Rect::new(10, 0, 10, 10),
            Rect::new(20, 0, 10, 10),
        ];
        state.mode = Mode::Insert;
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 25,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(click, &mut state);
        assert_eq!(state.focus, PanelFocus::Output);
        assert_eq!(state.mode, Mode::Normal);
    }
}
