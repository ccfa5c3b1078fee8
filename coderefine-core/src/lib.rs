//! Core of the CodeRefine client: request/response types, the review API
//! client, and the terminal-independent view logic (explanation formatter,
//! score presenter, issue filter, reconciler, submission state machine).
//!
//! Nothing in this crate draws to a screen. The terminal app plugs in through
//! [`reconcile::RenderPort`].

pub mod client;
pub mod export;
pub mod format;
pub mod issues;
pub mod orchestrator;
pub mod reconcile;
pub mod score;
pub mod types;

pub use client::{ApiError, ReviewClient};
pub use reconcile::{Reconciler, Region, RenderPort};
pub use types::{Issue, ReviewOptions, ReviewRequest, ReviewResult, Severity};
