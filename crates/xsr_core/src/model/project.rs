//! Project aggregate root.
//!
//! # Responsibility
//! - Own the canonical part registry, the assembly map and fastener bills.
//! - Validate construction input and fold re-parsed reports into history.
//!
//! # Invariants
//! - Every `Part` in `parts` has a unique `part` identifier.
//! - Nothing below a project is shared with another project.
//! - Persistence is the caller's concern; this is a plain value.

use crate::model::fastener::Fastener;
use crate::model::part::{Assembly, AssemblyId, Part};
use crate::parse::fastener::FastenerReport;
use crate::parse::report::ParsedReport;
use crate::registry::part_registry::PartRegistry;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Fabrication progress state of a whole project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "pending", alias = "beklemede")]
    Pending,
    #[serde(rename = "in-progress", alias = "devam ediyor")]
    InProgress,
    #[serde(rename = "done", alias = "bitti")]
    Done,
}

/// Shop-floor status change kind in the process time log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatusType {
    Start,
    Continue,
    Suspend,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatusChange {
    #[serde(rename = "type")]
    pub kind: ProcessStatusType,
    pub date: DateTime<Utc>,
    /// Meaningful for `start` and `continue`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTime {
    pub status_changes: Vec<ProcessStatusChange>,
}

/// Validation errors for project construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectError {
    /// Project name is blank after trim.
    EmptyName,
    /// Total weight is missing, zero, negative or not a number.
    InvalidTotalWeight(f64),
}

impl Display for ProjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name must not be blank"),
            Self::InvalidTotalWeight(value) => {
                write!(f, "project total weight must be a positive number, got {value}")
            }
        }
    }
}

impl Error for ProjectError {}

/// Aggregate root for one fabrication job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub project_name: String,
    #[serde(rename = "total_kg")]
    pub total_kg: f64,
    #[serde(default)]
    pub project_status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assemblies: BTreeMap<AssemblyId, Assembly>,
    /// Canonical registry, one record per part identifier.
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub bolts: Vec<Fastener>,
    #[serde(default)]
    pub nuts: Vec<Fastener>,
    #[serde(default)]
    pub washers: Vec<Fastener>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_time: Option<ProcessTime>,
}

impl Project {
    /// Builds a pending project from parsed reports.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank.
    /// - `InvalidTotalWeight` when the report carried no positive total.
    pub fn new(
        name: impl Into<String>,
        report: ParsedReport,
        fasteners: FastenerReport,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ProjectError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ProjectError::EmptyName);
        }
        if !report.total_kg.is_finite() || report.total_kg <= 0.0 {
            return Err(ProjectError::InvalidTotalWeight(report.total_kg));
        }

        let project = Self {
            id: Uuid::new_v4().to_string(),
            project_name: trimmed.to_string(),
            total_kg: report.total_kg,
            project_status: ProjectStatus::Pending,
            created_at,
            updated_at: None,
            assemblies: report.assemblies,
            parts: report.parts,
            bolts: fasteners.bolts,
            nuts: fasteners.nuts,
            washers: fasteners.washers,
            process_time: None,
        };
        info!(
            "event=project_created module=model assemblies={} parts={} bolts={} nuts={} washers={}",
            project.assemblies.len(),
            project.parts.len(),
            project.bolts.len(),
            project.nuts.len(),
            project.washers.len()
        );
        Ok(project)
    }

    pub fn part(&self, part_id: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.part == part_id)
    }

    pub fn part_mut(&mut self, part_id: &str) -> Option<&mut Part> {
        self.parts.iter_mut().find(|part| part.part == part_id)
    }

    pub fn set_status(&mut self, status: ProjectStatus, at: DateTime<Utc>) {
        self.project_status = status;
        self.updated_at = Some(at);
    }

    /// Folds a freshly parsed report into this project.
    ///
    /// Assembly records are replaced by the new ones. Parts go through the
    /// registry: quantities are summed onto the existing records and instance
    /// maps are merged so recorded task and note history survives. Merging the
    /// same report twice therefore doubles registry quantities.
    pub fn merge_report(&mut self, report: ParsedReport) {
        let incoming_parts = report.parts.len();
        for (assembly_id, assembly) in report.assemblies {
            self.assemblies.insert(assembly_id, assembly);
        }

        let mut registry = PartRegistry::from_parts(std::mem::take(&mut self.parts));
        for part in report.parts {
            registry.register(part);
        }
        self.parts = registry.into_parts();

        if report.total_kg > 0.0 {
            self.total_kg = report.total_kg;
        }
        info!(
            "event=report_merged module=model incoming_parts={} parts={} assemblies={}",
            incoming_parts,
            self.parts.len(),
            self.assemblies.len()
        );
    }
}
