//! Owned message types exchanged with the review worker thread.
//!
//! Everything here is `Send` and free of borrowed lifetimes so payloads can
//! be moved from the worker into `AppState` without copying.

use coderefine_core::client::ApiError;
use coderefine_core::types::{HealthStatus, ReviewRequest, ReviewResult};
use ratatui::text::Line;
use uuid::Uuid;

/// Commands sent from the event loop to the review worker.
#[derive(Debug)]
pub enum ReviewJob {
    /// Submit code for review. `id` tags the job in the log.
    Review { id: Uuid, request: ReviewRequest },
    /// Probe `GET /` on the service.
    Health,
}

/// Line counts of the original → optimized diff.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

/// Pre-highlighted output panes, built on the worker thread.
#[derive(Debug, Default)]
pub struct HighlightedPanes {
    /// Optimized code with a line-number gutter.
    pub optimized: Vec<Line<'static>>,
    /// Line diff of the submitted code against the optimized code.
    pub diff: Vec<Line<'static>>,
    pub stats: DiffStats,
}

/// Result of one review job.
///
/// Carried inside `AppEvent::Review(Box<ReviewPayload>)`; boxing keeps the
/// event enum small on the channel.
#[derive(Debug)]
pub struct ReviewPayload {
    pub id: Uuid,
    /// The code exactly as it was sent.
    pub original_code: String,
    pub outcome: Result<ReviewResult, ApiError>,
    /// Empty when the review failed.
    pub panes: HighlightedPanes,
}

/// Result of a health probe.
pub type HealthOutcome = Result<HealthStatus, ApiError>;
