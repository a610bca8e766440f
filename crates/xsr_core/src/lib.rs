//! Shop-floor production tracking core for steel fabrication reports.
//!
//! Parses XSR assembly and fastener reports into a [`Project`], expands
//! assemblies into numbered instances with task checklists, and applies
//! completion and note changes under authorship rules. Storage stays with
//! the caller.

pub mod document;
pub mod logging;
pub mod model;
pub mod parse;
pub mod progress;
pub mod registry;
pub mod service;

pub use document::{
    assembly_document_key, assembly_id_from_route, compact_document_key, document_file_name,
    part_document_key, route_id,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::actor::Actor;
pub use model::fastener::{Fastener, FastenerKind};
pub use model::part::{Assembly, AssemblyId, AssemblyInstance, Note, NoteId, Part, TaskStatus};
pub use model::project::{
    ProcessStatusChange, ProcessStatusType, ProcessTime, Project, ProjectError, ProjectStatus,
};
pub use parse::fastener::{parse_fasteners, FastenerReport};
pub use parse::line::{classify, classify_fastener, LineKind};
pub use parse::report::{parse_report, ParsedReport, ReportParser};
pub use progress::{
    aggregate_parts, man_days, project_progress, recent_completions, user_completions,
    AggregatedPart, CompletionRecord, PartFilter, ProjectProgress, Tally, UserTally,
};
pub use registry::expander::InstanceExpander;
pub use registry::part_registry::PartRegistry;
pub use registry::template::{TaskTemplate, TaskTemplateError, TaskTemplateProvider};
pub use service::task_service::{MutationOutcome, TaskStateStore, TaskStoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
