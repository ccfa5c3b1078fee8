//! Central application state for coderefine.
//!
//! Owns all mutable UI state: mode, focus, the input buffer, the review
//! orchestrator and reconciler, per-panel scroll offsets and viewport heights.
//! No ratatui rendering lives here; `app.rs` is read by the render module and
//! mutated by the keybinding dispatcher and the main loop.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use coderefine_core::client::ApiError;
use coderefine_core::export::write_export;
use coderefine_core::format::Markup;
use coderefine_core::issues::SeverityFilter;
use coderefine_core::orchestrator::{Orchestrator, SubmitError};
use coderefine_core::reconcile::PLACEHOLDER;
use coderefine_core::score::ScorePresentation;
use coderefine_core::types::{Issue, ReviewOptions, ReviewResult};
use coderefine_core::{Reconciler, Region, RenderPort};
use crossbeam_channel::Sender;
use ratatui::layout::Rect;
use tracing::{info, warn};
use uuid::Uuid;

use crate::editor::Editor;
use crate::review::types::{HealthOutcome, HighlightedPanes, ReviewJob, ReviewPayload};

/// Status messages cycled while a review is in flight.
pub const LOADING_STEPS: [&str; 4] = [
    "Parsing code structure",
    "Checking for security issues",
    "Analyzing performance",
    "Generating optimizations",
];

/// Logic ticks (250 ms each) spent on one loading step.
const TICKS_PER_STEP: usize = 6;

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Keys edit the code in the Input panel.
    Insert,
    /// Keys edit the path prompt in the status bar.
    OpenFile,
    HelpOverlay,
}

/// Which panel currently has keyboard focus.
///
/// Cycle order: `Input` → `Review` → `Output` → `Input`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Input,
    Review,
    Output,
}

impl PanelFocus {
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::Input => PanelFocus::Output,
            PanelFocus::Review => PanelFocus::Input,
            PanelFocus::Output => PanelFocus::Review,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PanelFocus::Input => PanelFocus::Review,
            PanelFocus::Review => PanelFocus::Output,
            PanelFocus::Output => PanelFocus::Input,
        }
    }
}

/// Tabs of the Output panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTab {
    #[default]
    Optimized,
    Diff,
    Explanation,
}

impl OutputTab {
    pub const ALL: [OutputTab; 3] = [OutputTab::Optimized, OutputTab::Diff, OutputTab::Explanation];

    pub fn title(self) -> &'static str {
        match self {
            OutputTab::Optimized => "Optimized",
            OutputTab::Diff => "Diff",
            OutputTab::Explanation => "Explanation",
        }
    }

    pub fn next(self) -> Self {
        match self {
            OutputTab::Optimized => OutputTab::Diff,
            OutputTab::Diff => OutputTab::Explanation,
            OutputTab::Explanation => OutputTab::Optimized,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Reachability of the review service, from the startup probe.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Health {
    #[default]
    Unknown,
    Up { ai_enabled: Option<bool> },
    Down(String),
}

/// Transient status-bar message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// View model written by the reconciler.
///
/// Everything the Review and Output panels show about a response lives here,
/// so a render never reads the raw `ReviewResult`. The Output panel's code tabs
/// draw `AppState::panes`, the worker's highlighted rendering of the
/// `OptimizedCode`, `DiffOriginal` and `DiffOptimized` regions; copying reads
/// the region text itself.
#[derive(Debug, Default)]
pub struct ReviewView {
    texts: BTreeMap<Region, String>,
    pub score: Option<ScorePresentation>,
    pub issues: Vec<Issue>,
    pub explanation: Markup,
}

impl ReviewView {
    /// The text for `region`, or the placeholder before the first review.
    pub fn text(&self, region: Region) -> &str {
        self.texts.get(&region).map_or(PLACEHOLDER, String::as_str)
    }

    pub fn has_result(&self) -> bool {
        !self.texts.is_empty()
    }
}

impl RenderPort for ReviewView {
    fn set_text(&mut self, region: Region, value: String) {
        self.texts.insert(region, value);
    }

    fn set_score(&mut self, score: Option<ScorePresentation>) {
        self.score = score;
    }

    fn set_issues(&mut self, visible: &[Issue]) {
        self.issues = visible.to_vec();
    }

    fn set_explanation(&mut self, markup: Markup) {
        self.explanation = markup;
    }
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,

    pub editor: Editor,
    /// Path being typed in `Mode::OpenFile`.
    pub path_input: String,

    pub orchestrator: Orchestrator,
    pub reconciler: Reconciler,
    pub view: ReviewView,
    /// Highlighted Optimized and Diff tab content from the worker.
    pub panes: HighlightedPanes,
    /// Last successful response, kept for export.
    pub last_result: Option<ReviewResult>,
    pub output_tab: OutputTab,

    /// First visible row of the Input panel.
    pub input_scroll: usize,
    pub review_scroll: usize,
    pub output_scroll: usize,
    pub help_scroll: u16,

    /// Inner heights cached after each render for page scrolling.
    pub input_viewport_height: u16,
    pub review_viewport_height: u16,
    pub output_viewport_height: u16,
    /// Line count of the Review panel content, cached after each render.
    pub review_content_height: usize,
    /// Line count of the rendered explanation, cached after each render.
    pub explanation_height: usize,

    /// Outer rects of [input, review, output], cached for mouse hit-testing.
    pub panel_rects: [Rect; 3],

    pub loading_ticks: usize,
    pub notice: Option<Notice>,
    pub health: Health,

    /// Review job of the request in flight.
    pub pending: Option<Uuid>,
    pub job_tx: Option<Sender<ReviewJob>>,
    pub export_dir: PathBuf,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ReviewOptions::default(), PathBuf::from("."))
    }
}

impl AppState {
    pub fn new(options: ReviewOptions, export_dir: PathBuf) -> Self {
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            editor: Editor::default(),
            path_input: String::new(),
            orchestrator: Orchestrator::new(options),
            reconciler: Reconciler::new(),
            view: ReviewView::default(),
            panes: HighlightedPanes::default(),
            last_result: None,
            output_tab: OutputTab::default(),
            input_scroll: 0,
            review_scroll: 0,
            output_scroll: 0,
            help_scroll: 0,
            input_viewport_height: 0,
            review_viewport_height: 0,
            output_viewport_height: 0,
            review_content_height: 0,
            explanation_height: 0,
            panel_rects: [Rect::default(); 3],
            loading_ticks: 0,
            notice: None,
            health: Health::default(),
            pending: None,
            job_tx: None,
            export_dir,
        }
    }

    // -----------------------------------------------------------------------
    // Review lifecycle
    // -----------------------------------------------------------------------

    /// Validates the input and hands a review job to the worker.
    ///
    /// Empty input sets the orchestrator's validation error and sends nothing.
    /// A submit while a review is in flight is ignored; the loading line
    /// already says so.
    pub fn submit(&mut self) {
        let request = match self.orchestrator.begin(self.editor.text()) {
            Ok(request) => request,
            Err(SubmitError::EmptyCode | SubmitError::Busy) => return,
        };
        self.notice = None;
        self.loading_ticks = 0;

        let id = Uuid::new_v4();
        let sent = self
            .job_tx
            .as_ref()
            .is_some_and(|tx| tx.send(ReviewJob::Review { id, request }).is_ok());
        if sent {
            self.pending = Some(id);
        } else {
            warn!("review worker is not running");
            self.orchestrator.finish(Err(ApiError::Network {
                message: "review worker is not running".to_owned(),
            }));
        }
    }

    /// Applies a finished review from the worker.
    ///
    /// On success every view region is reconciled and the highlighted panes
    /// replace the old ones. On failure prior results stay on screen.
    pub fn apply_review(&mut self, payload: ReviewPayload) {
        if self.pending != Some(payload.id) {
            warn!(id = %payload.id, "review result does not match the pending request");
        }
        self.pending = None;
        let ReviewPayload {
            original_code,
            outcome,
            panes,
            ..
        } = payload;

        if let Some(result) = self.orchestrator.finish(outcome) {
            self.reconciler
                .reconcile(&result, &original_code, &mut self.view);
            self.panes = panes;
            self.last_result = Some(result);
            self.review_scroll = 0;
            self.output_scroll = 0;
        }
    }

    pub fn apply_health(&mut self, outcome: HealthOutcome) {
        self.health = match outcome {
            Ok(status) if status.is_healthy() => {
                info!(version = ?status.version, ai_enabled = ?status.ai_enabled, "review service is up");
                Health::Up {
                    ai_enabled: status.ai_enabled,
                }
            }
            Ok(status) => {
                warn!(status = %status.status, "review service reports unhealthy");
                Health::Down(status.status)
            }
            Err(e) => {
                warn!(error = %e, "review service unreachable");
                Health::Down(e.to_string())
            }
        };
    }

    /// Advances the loading indicator. Called on every logic tick.
    pub fn tick(&mut self) {
        if self.orchestrator.is_loading() {
            self.loading_ticks = self.loading_ticks.wrapping_add(1);
        }
    }

    /// The loading message for the current tick, while a review is in flight.
    pub fn loading_step(&self) -> Option<&'static str> {
        self.orchestrator
            .is_loading()
            .then(|| LOADING_STEPS[(self.loading_ticks / TICKS_PER_STEP) % LOADING_STEPS.len()])
    }

    // -----------------------------------------------------------------------
    // Filter, tabs and options
    // -----------------------------------------------------------------------

    /// Shows only issues matching `filter`.
    pub fn set_filter(&mut self, filter: SeverityFilter) {
        self.reconciler.set_filter(filter, &mut self.view);
        self.review_scroll = 0;
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.reconciler.board().filter().next());
    }

    pub fn select_tab(&mut self, tab: OutputTab) {
        self.output_tab = tab;
        self.output_scroll = 0;
    }

    pub fn cycle_language(&mut self) {
        let options = &mut self.orchestrator.options;
        options.language = options.language.next();
    }

    pub fn cycle_depth(&mut self) {
        let options = &mut self.orchestrator.options;
        options.depth = options.depth.next();
    }

    pub fn toggle_security(&mut self) {
        let options = &mut self.orchestrator.options;
        options.check_security = !options.check_security;
    }

    pub fn toggle_performance(&mut self) {
        let options = &mut self.orchestrator.options;
        options.check_performance = !options.check_performance;
    }

    pub fn toggle_best_practices(&mut self) {
        let options = &mut self.orchestrator.options;
        options.check_best_practices = !options.check_best_practices;
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Replaces the input with the contents of `path`. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn load_file(&mut self, path: &Path) {
        match std::fs::read(path) {
            Ok(bytes) => {
                self.editor.set_text(String::from_utf8_lossy(&bytes));
                self.input_scroll = 0;
                info!(path = %path.display(), bytes = bytes.len(), "loaded file");
                self.set_notice(Notice::Info(format!("Loaded {}", path.display())));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read file");
                self.set_notice(Notice::Error(format!(
                    "Cannot read {}: {e}",
                    path.display()
                )));
            }
        }
    }

    /// Loads the file named in the path prompt and leaves `OpenFile` mode.
    pub fn confirm_open_file(&mut self) {
        let path = std::mem::take(&mut self.path_input);
        self.mode = Mode::Normal;
        let path = path.trim();
        if !path.is_empty() {
            self.load_file(Path::new(path));
        }
    }

    /// Inserts pasted text. In `OpenFile` mode only the first line goes into
    /// the path prompt; otherwise the text goes into the code input.
    pub fn paste(&mut self, text: &str) {
        if self.mode == Mode::OpenFile {
            let first = text.lines().next().unwrap_or_default();
            self.path_input.push_str(first);
            return;
        }
        self.editor.insert_str(text);
        self.focus = PanelFocus::Input;
        self.follow_cursor();
    }

    pub fn clear_input(&mut self) {
        self.editor.clear();
        self.input_scroll = 0;
    }

    /// Keeps the editor cursor inside the Input viewport.
    pub fn follow_cursor(&mut self) {
        let (row, _) = self.editor.cursor_position();
        let height = usize::from(self.input_viewport_height.max(1));
        if row < self.input_scroll {
            self.input_scroll = row;
        } else if row >= self.input_scroll + height {
            self.input_scroll = row + 1 - height;
        }
    }

    // -----------------------------------------------------------------------
    // Copy / export
    // -----------------------------------------------------------------------

    /// The optimized code to copy, if a review has produced one.
    pub fn copy_text(&self) -> Option<&str> {
        if !self.view.has_result() {
            return None;
        }
        Some(self.view.text(Region::OptimizedCode)).filter(|code| !code.is_empty())
    }

    /// Writes the last review as JSON into `export_dir`.
    pub fn export(&mut self) {
        let notice = match write_export(&self.export_dir, self.last_result.as_ref(), Utc::now()) {
            Ok(path) => Notice::Info(format!("Exported to {}", path.display())),
            Err(e) => {
                warn!(error = %e, "export failed");
                Notice::Error(e.to_string())
            }
        };
        self.set_notice(notice);
    }

    /// Shows `notice` in the status bar. A newer notice replaces a stale
    /// review error, which otherwise outranks it.
    pub fn set_notice(&mut self, notice: Notice) {
        self.orchestrator.clear_error();
        self.notice = Some(notice);
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    /// Number of scrollable lines in the focused panel.
    fn content_len(&self) -> usize {
        match self.focus {
            PanelFocus::Input => self.editor.line_count(),
            PanelFocus::Review => self.review_content_height,
            PanelFocus::Output => match self.output_tab {
                OutputTab::Optimized => self.panes.optimized.len(),
                OutputTab::Diff => self.panes.diff.len(),
                OutputTab::Explanation => self.explanation_height,
            },
        }
    }

    fn viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Input => self.input_viewport_height,
            PanelFocus::Review => self.review_viewport_height,
            PanelFocus::Output => self.output_viewport_height,
        }
    }

    fn scroll_mut(&mut self) -> &mut usize {
        match self.focus {
            PanelFocus::Input => &mut self.input_scroll,
            PanelFocus::Review => &mut self.review_scroll,
            PanelFocus::Output => &mut self.output_scroll,
        }
    }

    /// Scrolls the focused panel down by `lines`, stopping at the last line.
    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.content_len().saturating_sub(1);
        let scroll = self.scroll_mut();
        *scroll = scroll.saturating_add(usize::from(lines)).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        let scroll = self.scroll_mut();
        *scroll = scroll.saturating_sub(usize::from(lines));
    }

    pub fn scroll_top(&mut self) {
        *self.scroll_mut() = 0;
    }

    pub fn scroll_bottom(&mut self) {
        let last_page = self
            .content_len()
            .saturating_sub(usize::from(self.viewport_height()));
        *self.scroll_mut() = last_page;
    }

    /// Scrolls by half the viewport cached from the previous render, at least 1.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.viewport_height() / 2).max(1));
    }

    pub fn full_page_down(&mut self) {
        self.scroll_down(self.viewport_height().max(1));
    }

    pub fn full_page_up(&mut self) {
        self.scroll_up(self.viewport_height().max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderefine_core::types::{HealthStatus, Language, Severity};
    use crossbeam_channel::unbounded;
    use ratatui::text::Line;

    fn with_worker() -> (AppState, crossbeam_channel::Receiver<ReviewJob>) {
        let (tx, rx) = unbounded();
        let mut state = AppState::default();
        state.job_tx = Some(tx);
        (state, rx)
    }

    fn sample_result() -> ReviewResult {
        ReviewResult {
            detected_language: Some("Python".into()),
            quality_score: Some(82.0),
            issues: vec![
                Issue::new("eval", Severity::Critical),
                Issue::new("tabs", Severity::Warning),
            ],
            optimized_code: "print(1)".into(),
            explanation: "## Summary\n\nok".into(),
            ..ReviewResult::default()
        }
    }

    fn payload(id: Uuid, outcome: Result<ReviewResult, ApiError>) -> ReviewPayload {
        ReviewPayload {
            id,
            original_code: "print(1)\nprint(2)".into(),
            outcome,
            panes: HighlightedPanes {
                optimized: vec![Line::raw("1 │ print(1)")],
                ..HighlightedPanes::default()
            },
        }
    }

    #[test]
    fn empty_submit_sends_nothing() {
        let (mut state, rx) = with_worker();
        state.editor.set_text("   \n");
        state.submit();
        assert!(rx.try_recv().is_err());
        assert!(!state.orchestrator.is_loading());
        assert!(state.orchestrator.error().is_some());
    }

    #[test]
    fn submit_sends_job_with_options() {
        let (mut state, rx) = with_worker();
        state.cycle_language();
        state.toggle_security();
        state.editor.set_text("x = 1");
        state.submit();

        let Ok(ReviewJob::Review { id, request }) = rx.try_recv() else {
            panic!("expected a review job");
        };
        assert_eq!(state.pending, Some(id));
        assert_eq!(request.language, Some(Language::Python));
        assert!(!request.check_security);
        assert!(state.loading_step().is_some());

        state.submit();
        assert!(rx.try_recv().is_err());
        assert!(state.notice.is_none());
    }

    #[test]
    fn submit_without_worker_reports_error() {
        let mut state = AppState::default();
        state.editor.set_text("x");
        state.submit();
        assert!(!state.orchestrator.is_loading());
        assert_eq!(
            state.orchestrator.error(),
            Some("Error: review worker is not running")
        );
    }

    #[test]
    fn successful_review_updates_view_and_panes() {
        let (mut state, rx) = with_worker();
        state.editor.set_text("print(1)\nprint(2)");
        state.submit();
        let Ok(ReviewJob::Review { id, .. }) = rx.try_recv() else {
            panic!("expected a review job");
        };

        state.apply_review(payload(id, Ok(sample_result())));
        assert!(!state.orchestrator.is_loading());
        assert!(state.pending.is_none());
        assert_eq!(state.view.text(Region::DetectedLanguage), "Python");
        assert_eq!(state.view.text(Region::LinesReduced), "-1");
        assert_eq!(state.view.score.map(|s| s.grade), Some("A"));
        assert_eq!(state.view.issues.len(), 2);
        assert_eq!(state.panes.optimized.len(), 1);
        assert_eq!(state.copy_text(), Some("print(1)"));
    }

    #[test]
    fn failed_review_keeps_previous_results() {
        let (mut state, rx) = with_worker();
        state.editor.set_text("a");
        state.submit();
        let Ok(ReviewJob::Review { id, .. }) = rx.try_recv() else {
            panic!("expected a review job");
        };
        state.apply_review(payload(id, Ok(sample_result())));

        state.submit();
        let Ok(ReviewJob::Review { id, .. }) = rx.try_recv() else {
            panic!("expected a review job");
        };
        state.apply_review(ReviewPayload {
            panes: HighlightedPanes::default(),
            ..payload(
                id,
                Err(ApiError::Status {
                    status: 500,
                    message: "boom".into(),
                }),
            )
        });
        assert_eq!(state.orchestrator.error(), Some("Error: boom"));
        assert_eq!(state.view.text(Region::DetectedLanguage), "Python");
        assert_eq!(state.panes.optimized.len(), 1);
        assert!(!state.orchestrator.is_disabled());
    }

    #[test]
    fn copy_reads_the_reconciled_region_without_panes() {
        let mut state = AppState::default();
        assert_eq!(state.copy_text(), None);

        state.apply_review(ReviewPayload {
            panes: HighlightedPanes::default(),
            ..payload(Uuid::new_v4(), Ok(sample_result()))
        });
        assert!(state.panes.optimized.is_empty());
        assert_eq!(state.view.text(Region::OptimizedCode), "print(1)");
        assert_eq!(state.copy_text(), Some("print(1)"));

        let empty = ReviewResult {
            optimized_code: String::new(),
            ..sample_result()
        };
        state.apply_review(payload(Uuid::new_v4(), Ok(empty)));
        assert_eq!(state.copy_text(), None);
    }

    #[test]
    fn filter_is_explicit_and_survives_new_results() {
        let mut state = AppState::default();
        state.set_filter(SeverityFilter::Critical);
        state.apply_review(payload(Uuid::new_v4(), Ok(sample_result())));
        assert_eq!(state.view.issues.len(), 1);
        state.cycle_filter();
        assert_eq!(state.reconciler.board().filter(), SeverityFilter::Warning);
        assert_eq!(state.view.issues[0].title, "tabs");
    }

    #[test]
    fn loading_step_advances_on_ticks() {
        let (mut state, _rx) = with_worker();
        state.editor.set_text("x");
        state.submit();
        assert_eq!(state.loading_step(), Some(LOADING_STEPS[0]));
        for _ in 0..TICKS_PER_STEP {
            state.tick();
        }
        assert_eq!(state.loading_step(), Some(LOADING_STEPS[1]));
    }

    #[test]
    fn health_outcomes() {
        let mut state = AppState::default();
        state.apply_health(Ok(HealthStatus {
            message: "running".into(),
            status: "healthy".into(),
            version: None,
            ai_enabled: Some(true),
        }));
        assert_eq!(state.health, Health::Up { ai_enabled: Some(true) });
        state.apply_health(Err(ApiError::Network {
            message: "refused".into(),
        }));
        assert_eq!(state.health, Health::Down("refused".into()));
    }

    #[test]
    fn load_file_replaces_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.py");
        std::fs::write(&path, b"print('hi')\r\n\xff").unwrap();
        let mut state = AppState::default();
        state.editor.set_text("old");
        state.load_file(&path);
        assert_eq!(state.editor.text(), "print('hi')\n\u{fffd}");

        state.load_file(&dir.path().join("missing.py"));
        assert!(matches!(state.notice, Some(Notice::Error(_))));
        assert_eq!(state.editor.text(), "print('hi')\n\u{fffd}");
    }

    #[test]
    fn open_file_prompt_takes_first_pasted_line() {
        let mut state = AppState::default();
        state.mode = Mode::OpenFile;
        state.paste("/tmp/a.rs\nignored");
        assert_eq!(state.path_input, "/tmp/a.rs");
        assert!(state.editor.is_empty());
    }

    #[test]
    fn export_writes_into_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(ReviewOptions::default(), dir.path().to_path_buf());
        state.export();
        assert!(matches!(state.notice, Some(Notice::Error(_))));

        state.apply_review(payload(Uuid::new_v4(), Ok(sample_result())));
        state.export();
        assert!(matches!(&state.notice, Some(Notice::Info(msg)) if msg.starts_with("Exported to")));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn export_after_failed_review_replaces_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(ReviewOptions::default(), dir.path().to_path_buf());
        state.apply_review(payload(Uuid::new_v4(), Ok(sample_result())));
        state.apply_review(payload(
            Uuid::new_v4(),
            Err(ApiError::Status {
                status: 500,
                message: "boom".into(),
            }),
        ));
        assert_eq!(state.orchestrator.error(), Some("Error: boom"));

        state.export();
        assert!(state.orchestrator.error().is_none());
        assert!(matches!(&state.notice, Some(Notice::Info(msg)) if msg.starts_with("Exported to")));
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let mut state = AppState::default();
        state.focus = PanelFocus::Output;
        state.output_viewport_height = 2;
        state.panes.optimized = (0..5).map(|i| Line::raw(i.to_string())).collect();
        state.scroll_down(10);
        assert_eq!(state.output_scroll, 4);
        state.scroll_bottom();
        assert_eq!(state.output_scroll, 3);
        state.half_page_up();
        assert_eq!(state.output_scroll, 2);
        state.select_tab(OutputTab::Diff);
        assert_eq!(state.output_scroll, 0);
    }

    #[test]
    fn focus_cycles() {
        assert_eq!(PanelFocus::Input.next().next().next(), PanelFocus::Input);
        assert_eq!(PanelFocus::Input.prev(), PanelFocus::Output);
        assert_eq!(OutputTab::Explanation.next(), OutputTab::Optimized);
    }
}
