//! Review service integration for coderefine.
//!
//! The review module runs one background `std::thread` that owns the blocking
//! HTTP agent. Jobs arrive over a crossbeam channel; results go back to the
//! event loop as `AppEvent`s, with the code panes already syntax-highlighted.
pub mod types;
pub mod worker;
