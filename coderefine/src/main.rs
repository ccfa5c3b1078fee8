//! coderefine: terminal client for the CodeRefine code review service.
//!
//! Wires together configuration (`config`), the terminal lifecycle (`tui`),
//! the unified event bus (`event`), the review worker thread (`review`), and
//! the UI (`ui`).
//!
//! # Startup sequence
//!
//! 1. Parse args and load config. Read-only, safe before terminal init.
//! 2. Initialize file logging. The terminal belongs to the TUI, so nothing
//!    may be written to stdout/stderr once it is up.
//! 3. `install_panic_hook()` so a panic restores the terminal first.
//! 4. `register_sigterm()` returns a flag polled by the event loop.
//! 5. `init_tui()` enters the alternate screen and raw mode.
//! 6. Spawn the event task and the review worker, and queue the health probe.
//!
//! `restore_tui()` runs after the event loop exits. A draw error restores the
//! terminal before it is returned; the panic hook covers unexpected panics.

mod app;
mod config;
mod editor;
mod event;
mod review;
mod theme;
mod tui;
mod ui;

use std::fs::OpenOptions;
use std::sync::atomic::Ordering;

use clap::Parser;
use coderefine_core::client::ReviewClient;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{AppState, Notice};
use crate::config::{Args, Config};
use crate::event::AppEvent;
use crate::review::types::ReviewJob;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

/// Sends `tracing` output to `<state dir>/coderefine.log`.
///
/// `RUST_LOG` wins over the configured level. If the log file cannot be
/// opened, logging stays off rather than writing over the TUI.
fn init_logging(default_level: &str) {
    let dir = config::state_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("coderefine.log"))
    else {
        return;
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Copies the optimized code via OSC 52 and reports the outcome in the
/// status bar.
fn copy_optimized(state: &mut AppState) {
    let Some(code) = state.copy_text() else {
        state.set_notice(Notice::Error("Nothing to copy yet".to_owned()));
        return;
    };
    let notice = match tui::copy_to_clipboard(code) {
        Ok(()) => Notice::Info("Copied!".to_owned()),
        Err(e) => {
            warn!(error = %e, "clipboard copy failed");
            Notice::Error(format!("Copy failed: {e}"))
        }
    };
    state.set_notice(notice);
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let (config, config_warning) = Config::load(&args);
    init_logging(&config.log_level);
    if let Some(warning) = config_warning {
        warn!("{warning}");
    }
    info!(api_url = %config.api_url, "starting coderefine");

    let theme = theme::Theme::from_name(&config.theme);
    let mut state = AppState::new(config.review_options(), config.export_dir.clone());
    if let Some(path) = &args.file {
        state.load_file(path);
    }

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    // Review worker: owns the HTTP agent. Exits when `job_tx` is dropped.
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<ReviewJob>();
    let client = ReviewClient::new(config.api_url.clone(), config.timeout());
    let worker_tx = handler.tx.clone();
    std::thread::Builder::new()
        .name("review-worker".to_owned())
        .spawn(move || review::worker::review_worker_loop(client, job_rx, worker_tx))?;
    let _ = job_tx.send(ReviewJob::Health);
    state.job_tx = Some(job_tx);

    'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when no events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        // Exactly one draw() call per Render event.
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            error!(error = %e, "draw failed");
                            tui::restore_tui()?;
                            return Err(e);
                        }
                    }
                    Some(AppEvent::Key(key)) => match handle_key(key, &mut state) {
                        KeyAction::Quit => break 'event_loop,
                        KeyAction::Copy => copy_optimized(&mut state),
                        KeyAction::Continue => {}
                    },
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, &mut state);
                    }
                    Some(AppEvent::Paste(text)) => state.paste(&text),
                    Some(AppEvent::Tick) => state.tick(),
                    Some(AppEvent::Review(payload)) => state.apply_review(*payload),
                    Some(AppEvent::Health(outcome)) => state.apply_health(outcome),
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => {}
                    Some(AppEvent::Quit) | None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    info!("shutting down");
    tui::restore_tui()?;
    Ok(())
}
