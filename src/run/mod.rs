//! # Run Orchestration
//!
//! This module sequences one export run: connect, resolve, enumerate,
//! export, disconnect. The session is released on every exit path, including
//! early termination when the group cannot be resolved, and all failures are
//! surfaced through the logs rather than a process exit code.
//!
//! ## Submodules
//!
//! - **pipeline**: The stage machine and its summary type.

mod pipeline;

pub use pipeline::{run_pipeline, RunStage, RunSummary};
