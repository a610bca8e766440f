//! Mutation use-cases over an in-memory project.
//!
//! # Responsibility
//! - Apply task assignment, completion and note changes to a borrowed
//!   `Project` following authorship rules.
//! - Keep storage and transport outside the core: callers read the project,
//!   mutate it here, then persist it themselves.

pub mod note_service;
pub mod task_service;
