//! Part registry, instance expansion and the task template they seed from.
//!
//! # Responsibility
//! - Deduplicate parts seen under several assemblies.
//! - Expand each assembly into numbered, trackable instances.
//!
//! # Invariants
//! - Re-expansion preserves recorded task and note state.

pub mod expander;
pub mod part_registry;
pub mod template;
