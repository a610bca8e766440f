//! Part, assembly and instance records.
//!
//! # Responsibility
//! - Define the per-instance task state and note shapes.
//! - Define parsed part/assembly rows and the registry-level part record.
//!
//! # Invariants
//! - `AssemblyInstance::id` is 1-based and unique within `(part, assembly)`.
//! - `TaskStatus::done_by`/`done_at` are meant to be set only while
//!   `is_done` is true. `unassign` can leave them behind on an unset task.
//! - For every assembly key in `Part::assembly_instances` the instance list
//!   length equals that assembly's declared quantity once expanded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Identifier of one note attached to an instance.
///
/// New notes get a UUID v4; stored documents may carry older numeric ids.
pub type NoteId = String;

/// Identifier of an assembly as printed in the report (`CODE/NUMBER`).
pub type AssemblyId = String;

/// Completion state of one task on one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// Task is applicable/assigned to this instance.
    pub set: bool,
    pub is_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_at: Option<DateTime<Utc>>,
}

impl TaskStatus {
    /// Unassigned, not done. Seed value for every template task.
    pub fn unassigned() -> Self {
        Self::default()
    }

    /// Assigned and pending, with any completion metadata dropped.
    pub fn assigned() -> Self {
        Self {
            set: true,
            ..Self::default()
        }
    }

    /// Returns whether the task counts as completed work.
    pub fn is_completed(&self) -> bool {
        self.set && self.is_done
    }
}

/// Free-text annotation attached to one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// Full name of the author, compared against `Actor::display_name`.
    pub added_by: String,
    /// Creation time, refreshed on every edit.
    pub added_at: DateTime<Utc>,
    pub string_value: String,
}

/// One physical, numbered occurrence of a part inside one assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyInstance {
    /// 1-based sequence number.
    pub id: u32,
    /// Task states in template order.
    pub tasks: IndexMap<String, TaskStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

impl AssemblyInstance {
    /// Creates instance `id` with every template task unassigned.
    pub fn seeded<'a>(id: u32, task_names: impl IntoIterator<Item = &'a str>) -> Self {
        let tasks = task_names
            .into_iter()
            .map(|name| (name.to_string(), TaskStatus::unassigned()))
            .collect();
        Self {
            id,
            tasks,
            notes: Vec::new(),
        }
    }

    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == note_id)
    }
}

/// One part row, either as parsed under an assembly or as the registry
/// record merged across assemblies.
///
/// Column values other than quantity are kept as the report printed them;
/// absent columns are empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Part identifier with `/` rewritten to `-`.
    pub part: String,
    /// Per-assembly rows carry the assembly quantity; registry rows carry the
    /// sum across every assembly the part appeared in.
    #[serde(with = "crate::model::wire::qty")]
    pub qty: u32,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub length_mm: String,
    #[serde(default)]
    pub weight_kg: String,
    #[serde(rename = "assemblyInstances", default)]
    pub assembly_instances: BTreeMap<AssemblyId, Vec<AssemblyInstance>>,
}

impl Part {
    /// Creates a part row with no instances yet.
    pub fn new(part: impl Into<String>, qty: u32) -> Self {
        Self {
            part: part.into(),
            qty,
            profile: String::new(),
            grade: String::new(),
            length_mm: String::new(),
            weight_kg: String::new(),
            assembly_instances: BTreeMap::new(),
        }
    }

    /// Quantity used for progress weighting. Zero counts as one.
    pub fn weighting_qty(&self) -> u32 {
        self.qty.max(1)
    }

    /// Unit weight parsed from the weight column, `0.0` when unreadable.
    pub fn unit_weight_kg(&self) -> f64 {
        self.weight_kg.trim().parse().unwrap_or(0.0)
    }

    pub fn instances(&self, assembly_id: &str) -> Option<&[AssemblyInstance]> {
        self.assembly_instances.get(assembly_id).map(Vec::as_slice)
    }

    pub fn instance_mut(
        &mut self,
        assembly_id: &str,
        instance_id: u32,
    ) -> Option<&mut AssemblyInstance> {
        self.assembly_instances
            .get_mut(assembly_id)?
            .iter_mut()
            .find(|instance| instance.id == instance_id)
    }
}

/// Fabricated sub-structure made of parts, produced `qty` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    #[serde(with = "crate::model::wire::qty")]
    pub qty: u32,
    /// Last column of the assembly header line, kept verbatim.
    #[serde(default)]
    pub weight_kg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight_kg: Option<f64>,
    /// Parts as parsed under this assembly, before registry merge.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Assembly {
    pub fn new(qty: u32, weight_kg: impl Into<String>) -> Self {
        Self {
            qty,
            weight_kg: weight_kg.into(),
            total_weight_kg: None,
            parts: Vec::new(),
        }
    }

    /// Returns whether a part with this identifier was listed under the
    /// assembly.
    pub fn contains_part(&self, part_id: &str) -> bool {
        self.parts.iter().any(|part| part.part == part_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{AssemblyInstance, Part, TaskStatus};

    #[test]
    fn seeded_instance_has_every_task_unassigned() {
        let instance = AssemblyInstance::seeded(3, ["Primer", "Painting"]);
        assert_eq!(instance.id, 3);
        assert_eq!(instance.tasks.len(), 2);
        assert!(instance.tasks.values().all(|task| *task == TaskStatus::unassigned()));
        assert!(instance.notes.is_empty());
    }

    #[test]
    fn seeded_tasks_keep_template_order() {
        let instance = AssemblyInstance::seeded(1, ["Procurement", "Blasting", "Painting"]);
        let names: Vec<&str> = instance.tasks.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Procurement", "Blasting", "Painting"]);
    }

    #[test]
    fn weighting_qty_treats_zero_as_one() {
        assert_eq!(Part::new("P-1", 0).weighting_qty(), 1);
        assert_eq!(Part::new("P-1", 4).weighting_qty(), 4);
    }

    #[test]
    fn unit_weight_falls_back_to_zero() {
        let mut part = Part::new("P-1", 1);
        part.weight_kg = "12.5".to_string();
        assert_eq!(part.unit_weight_kg(), 12.5);
        part.weight_kg = "n/a".to_string();
        assert_eq!(part.unit_weight_kg(), 0.0);
    }
}
