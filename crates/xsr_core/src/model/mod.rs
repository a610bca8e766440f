//! Production model built from XSR reports.
//!
//! # Responsibility
//! - Define the canonical structures the parser emits and services mutate.
//! - Keep serialized field names compatible with stored project documents.
//!
//! # Invariants
//! - A `Project` exclusively owns its parts, assemblies, instances and notes.
//! - Instances are never deleted once created.

pub mod actor;
pub mod fastener;
pub mod part;
pub mod project;
pub(crate) mod wire;
