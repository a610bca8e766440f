//! Report grammars.
//!
//! # Responsibility
//! - Classify report lines and extract fields from them.
//! - Turn assembly reports into assemblies plus registry-merged parts.
//! - Turn fastener reports into flat bolt, nut and washer bills.
//!
//! # Invariants
//! - Parsing is permissive and never returns an error.

pub mod fastener;
pub mod line;
pub mod report;
