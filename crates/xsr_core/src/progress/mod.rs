//! Read-only queries over a project.
//!
//! # Responsibility
//! - Completion reducers per task, per project and per user.
//! - Shop-floor man-day accounting and part list filtering.
//!
//! # Invariants
//! - Nothing here mutates the project; results are recomputed on every read.

pub mod aggregate;
pub mod filter;
pub mod man_days;

pub use aggregate::{
    aggregate_parts, percentage, project_progress, recent_completions, user_completions,
    AggregatedPart, CompletionRecord, ProjectProgress, Tally, UserTally,
};
pub use filter::PartFilter;
pub use man_days::man_days;
