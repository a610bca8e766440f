//! Completion reducers over the part → assembly → instance → task tree.
//!
//! # Responsibility
//! - Per-task and overall completion figures for one project.
//! - Per-user completion counts and the recent completion feed.
//! - The aggregated parts table grouped by part, profile and grade.
//!
//! # Invariants
//! - Pure functions; the project is only read.
//! - A percentage over zero applicable tasks is `0.0`.
//! - Per-task figures are weighted by the part's registry quantity on top of
//!   per-instance expansion, so they over-count physical work by that
//!   factor. Overall figures count each `(part, assembly, instance, task)`
//!   once, unweighted.

use crate::model::part::{Assembly, AssemblyId};
use crate::model::project::Project;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Applicable versus completed count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub total: u64,
    pub completed: u64,
}

impl Tally {
    pub fn percentage(&self) -> f64 {
        percentage(self.completed, self.total)
    }
}

/// `completed / total * 100`, or `0.0` when `total` is zero.
pub fn percentage(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Completion summary for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectProgress {
    /// Unweighted count of applicable instance tasks.
    pub total: u64,
    pub completed: u64,
    pub percentage: f64,
    /// Quantity-weighted figures per task name.
    pub by_task: BTreeMap<String, Tally>,
}

/// Completed task count for one author string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTally {
    pub name: String,
    pub completed: u64,
}

/// One done task with its author and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRecord {
    pub part_id: String,
    pub assembly_id: AssemblyId,
    pub instance_id: u32,
    pub task_name: String,
    pub done_by: String,
    pub done_at: DateTime<Utc>,
}

/// One row of the aggregated parts table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPart {
    pub part: String,
    pub profile: String,
    pub grade: String,
    pub length_mm: String,
    pub total_qty: u64,
    pub total_weight_kg: f64,
}

/// Computes per-task and overall completion for a project.
///
/// Every `(part, assembly, instance, task)` with `set == true` is counted
/// once. A duplicate key seen later can only upgrade the entry to done.
pub fn project_progress(project: &Project) -> ProjectProgress {
    let mut seen: HashMap<(&str, &str, u32, &str), bool> = HashMap::new();
    let mut by_task: BTreeMap<String, Tally> = BTreeMap::new();

    for part in &project.parts {
        let weight = u64::from(part.weighting_qty());
        for (assembly_id, instances) in &part.assembly_instances {
            for instance in instances {
                for (task_name, status) in &instance.tasks {
                    if !status.set {
                        continue;
                    }
                    let key = (
                        part.part.as_str(),
                        assembly_id.as_str(),
                        instance.id,
                        task_name.as_str(),
                    );
                    match seen.entry(key) {
                        Entry::Vacant(slot) => {
                            slot.insert(status.is_done);
                            let tally = by_task.entry(task_name.clone()).or_default();
                            tally.total += weight;
                            if status.is_done {
                                tally.completed += weight;
                            }
                        }
                        Entry::Occupied(mut slot) => {
                            if status.is_done && !*slot.get() {
                                slot.insert(true);
                                by_task.entry(task_name.clone()).or_default().completed += weight;
                            }
                        }
                    }
                }
            }
        }
    }

    let total = seen.len() as u64;
    let completed = seen.values().filter(|is_done| **is_done).count() as u64;
    ProjectProgress {
        total,
        completed,
        percentage: percentage(completed, total),
        by_task,
    }
}

/// Completed tasks grouped by the literal `doneBy` string.
///
/// `known_users` are listed with zero when they completed nothing. Sorted by
/// count descending, then name.
pub fn user_completions(project: &Project, known_users: &[String]) -> Vec<UserTally> {
    let mut counts: BTreeMap<String, u64> = known_users
        .iter()
        .map(|name| (name.clone(), 0))
        .collect();

    let done_by = project
        .parts
        .iter()
        .flat_map(|part| part.assembly_instances.values().flatten())
        .flat_map(|instance| instance.tasks.values())
        .filter(|status| status.is_done)
        .filter_map(|status| status.done_by.as_deref());
    for name in done_by {
        *counts.entry(name.to_string()).or_default() += 1;
    }

    let mut tallies: Vec<UserTally> = counts
        .into_iter()
        .map(|(name, completed)| UserTally { name, completed })
        .collect();
    tallies.sort_by(|a, b| b.completed.cmp(&a.completed).then_with(|| a.name.cmp(&b.name)));
    tallies
}

/// Every done task carrying both author and time, newest first.
///
/// A repeated `(part, assembly, instance, task)` is listed once.
pub fn recent_completions(project: &Project) -> Vec<CompletionRecord> {
    let mut records = Vec::new();
    let mut seen: HashSet<(&str, &str, u32, &str)> = HashSet::new();
    for part in &project.parts {
        for (assembly_id, instances) in &part.assembly_instances {
            for instance in instances {
                for (task_name, status) in &instance.tasks {
                    let (true, Some(done_by), Some(done_at)) =
                        (status.is_done, status.done_by.as_ref(), status.done_at)
                    else {
                        continue;
                    };
                    let key = (
                        part.part.as_str(),
                        assembly_id.as_str(),
                        instance.id,
                        task_name.as_str(),
                    );
                    if !seen.insert(key) {
                        continue;
                    }
                    records.push(CompletionRecord {
                        part_id: part.part.clone(),
                        assembly_id: assembly_id.clone(),
                        instance_id: instance.id,
                        task_name: task_name.clone(),
                        done_by: done_by.clone(),
                        done_at,
                    });
                }
            }
        }
    }
    records.sort_by(|a, b| b.done_at.cmp(&a.done_at));
    records
}

/// Groups every assembly's part rows by `(part, profile, grade)`.
///
/// Quantity is summed; weight adds `weight_kg * qty` per row. Rows keep
/// first-seen order.
pub fn aggregate_parts(assemblies: &BTreeMap<AssemblyId, Assembly>) -> Vec<AggregatedPart> {
    let mut rows: Vec<AggregatedPart> = Vec::new();
    let mut index: HashMap<(String, String, String), usize> = HashMap::new();

    for part in assemblies.values().flat_map(|assembly| assembly.parts.iter()) {
        let qty = u64::from(part.qty);
        let weight = part.unit_weight_kg() * qty as f64;
        let key = (part.part.clone(), part.profile.clone(), part.grade.clone());
        match index.get(&key) {
            Some(&position) => {
                rows[position].total_qty += qty;
                rows[position].total_weight_kg += weight;
            }
            None => {
                index.insert(key, rows.len());
                rows.push(AggregatedPart {
                    part: part.part.clone(),
                    profile: part.profile.clone(),
                    grade: part.grade.clone(),
                    length_mm: part.length_mm.clone(),
                    total_qty: qty,
                    total_weight_kg: weight,
                });
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{percentage, Tally};

    #[test]
    fn percentage_of_nothing_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(Tally::default().percentage(), 0.0);
    }

    #[test]
    fn percentage_scales_to_hundred() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(
            Tally {
                total: 3,
                completed: 3
            }
            .percentage(),
            100.0
        );
    }
}
