//! Submission state machine around a single review call.
//!
//! `Idle → (validate) → Loading → Idle`. Validation failures never leave
//! `Idle`; success and failure both return to `Idle` with the submit control
//! enabled again. While `Loading` a second submit is refused, which is the only
//! thing keeping responses in order: there is no cancellation and no sequence
//! numbering.

use thiserror::Error;
use tracing::info;

use crate::client::ApiError;
use crate::types::{ReviewOptions, ReviewRequest, ReviewResult};

pub const EMPTY_CODE_MESSAGE: &str = "Please enter some code to review!";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{}", EMPTY_CODE_MESSAGE)]
    EmptyCode,
    /// A review is already in flight; the submit control is disabled.
    #[error("A review is already in progress")]
    Busy,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
}

/// Tracks options, loading state and the last error message.
#[derive(Debug, Default)]
pub struct Orchestrator {
    pub options: ReviewOptions,
    phase: Phase,
    error: Option<String>,
}

impl Orchestrator {
    pub fn new(options: ReviewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The submit control is disabled for exactly as long as a call is in flight.
    pub fn is_disabled(&self) -> bool {
        self.is_loading()
    }

    /// Message for the error panel, if the last action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Validates `code` and enters `Loading`, returning the request to send.
    ///
    /// On [`SubmitError::EmptyCode`] the error message is set and nothing else
    /// changes. [`SubmitError::Busy`] leaves all state untouched.
    pub fn begin(&mut self, code: &str) -> Result<ReviewRequest, SubmitError> {
        if self.is_loading() {
            return Err(SubmitError::Busy);
        }
        let code = code.trim();
        if code.is_empty() {
            self.error = Some(SubmitError::EmptyCode.to_string());
            return Err(SubmitError::EmptyCode);
        }
        self.error = None;
        self.phase = Phase::Loading;
        info!(
            bytes = code.len(),
            language = self.options.language.as_str(),
            depth = self.options.depth.as_str(),
            "review submitted"
        );
        Ok(self.options.request(code))
    }

    /// Leaves `Loading`. Returns the result to reconcile on success; on failure
    /// records `Error: <message>` and returns `None`.
    pub fn finish(&mut self, outcome: Result<ReviewResult, ApiError>) -> Option<ReviewResult> {
        self.phase = Phase::Idle;
        match outcome {
            Ok(result) => {
                self.error = None;
                Some(result)
            }
            Err(err) => {
                self.error = Some(format!("Error: {err}"));
                None
            }
        }
    }
}
