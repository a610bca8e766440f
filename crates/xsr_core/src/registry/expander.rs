//! Instance expansion and reconciliation.
//!
//! # Responsibility
//! - Materialize `qty` numbered instances per assembly, seeded from the task
//!   template.
//! - Reconcile regenerated instance lists with recorded history.
//!
//! # Invariants
//! - Instance ids are `1..=qty` for a fresh expansion.
//! - Existing instances, their task states and notes are never replaced or
//!   removed; only missing ids and missing template tasks are added.

use crate::model::part::{AssemblyInstance, TaskStatus};
use crate::model::project::Project;
use crate::registry::template::TaskTemplate;
use log::info;

/// Expands assemblies into per-instance task records.
#[derive(Debug, Clone, Copy)]
pub struct InstanceExpander<'t> {
    template: &'t TaskTemplate,
}

impl<'t> InstanceExpander<'t> {
    pub fn new(template: &'t TaskTemplate) -> Self {
        Self { template }
    }

    /// Creates instances `1..=qty`, every template task unassigned.
    pub fn expand(&self, qty: u32) -> Vec<AssemblyInstance> {
        (1..=qty)
            .map(|id| AssemblyInstance::seeded(id, self.template.iter()))
            .collect()
    }

    /// Brings `existing` up to `qty` instances without touching recorded
    /// state. Returns how many instances were created.
    ///
    /// Missing ids in `1..=qty` are created; template tasks absent from an
    /// existing instance are added unassigned. A lower `qty` removes nothing.
    pub fn reconcile(&self, existing: &mut Vec<AssemblyInstance>, qty: u32) -> usize {
        for instance in existing.iter_mut() {
            for name in self.template.iter() {
                instance
                    .tasks
                    .entry(name.to_string())
                    .or_insert_with(TaskStatus::unassigned);
            }
        }

        let mut created = 0;
        for id in 1..=qty {
            if !existing.iter().any(|instance| instance.id == id) {
                existing.push(AssemblyInstance::seeded(id, self.template.iter()));
                created += 1;
            }
        }
        existing.sort_by_key(|instance| instance.id);
        created
    }

    /// Creates or reconciles instances for every registry part in every
    /// assembly that lists it. Returns how many instances were created.
    pub fn sync_project(&self, project: &mut Project) -> usize {
        let mut created = 0;
        let Project {
            assemblies, parts, ..
        } = project;
        for part in parts.iter_mut() {
            for (assembly_id, assembly) in assemblies.iter() {
                if !assembly.contains_part(&part.part) {
                    continue;
                }
                let instances = part
                    .assembly_instances
                    .entry(assembly_id.clone())
                    .or_default();
                created += self.reconcile(instances, assembly.qty);
            }
        }
        info!(
            "event=instances_synced module=registry parts={} created={}",
            project.parts.len(),
            created
        );
        created
    }
}

/// Merges a regenerated instance list into recorded history.
///
/// Instances already present keep their state; their missing tasks are taken
/// from the incoming instance. Incoming ids not yet present are appended.
pub fn merge_instances(
    existing: &mut Vec<AssemblyInstance>,
    incoming: Vec<AssemblyInstance>,
) {
    for fresh in incoming {
        match existing.iter_mut().find(|instance| instance.id == fresh.id) {
            Some(recorded) => {
                for (name, status) in fresh.tasks {
                    recorded.tasks.entry(name).or_insert(status);
                }
            }
            None => existing.push(fresh),
        }
    }
    existing.sort_by_key(|instance| instance.id);
}
