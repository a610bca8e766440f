//! Task assignment and completion over a project value.
//!
//! # Responsibility
//! - Assign and unassign tasks on every instance of a part.
//! - Toggle completion with authorship rules.
//! - Let administrators record completion on behalf of someone else.
//!
//! # Invariants
//! - The store borrows the project; persisting the result is the caller's job.
//! - Authorization refusals are `Ok(MutationOutcome::Refused)` with no
//!   mutation, never errors.
//! - Assignment overwrites prior completion on the assigned tasks.
//! - Unassignment only clears `set`; completion metadata stays.

use crate::model::actor::Actor;
use crate::model::part::{AssemblyId, AssemblyInstance, NoteId, Part, TaskStatus};
use crate::model::project::Project;
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutation target lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStoreError {
    PartNotFound(String),
    AssemblyNotFound {
        part: String,
        assembly: String,
    },
    InstanceNotFound {
        part: String,
        assembly: String,
        instance: u32,
    },
    TaskNotFound {
        part: String,
        task: String,
    },
    NoteNotFound(NoteId),
    /// Note text is blank after trim.
    EmptyNote,
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PartNotFound(part) => write!(f, "part not found: {part}"),
            Self::AssemblyNotFound { part, assembly } => {
                write!(f, "part {part} has no instances in assembly {assembly}")
            }
            Self::InstanceNotFound {
                part,
                assembly,
                instance,
            } => write!(
                f,
                "instance {instance} of part {part} in assembly {assembly} not found"
            ),
            Self::TaskNotFound { part, task } => {
                write!(f, "task `{task}` not tracked on part {part}")
            }
            Self::NoteNotFound(note_id) => write!(f, "note not found: {note_id}"),
            Self::EmptyNote => write!(f, "note text must not be blank"),
        }
    }
}

impl Error for TaskStoreError {}

/// Whether a mutation request changed the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// Silently refused by authorization rules.
    Refused,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Mutation surface over one borrowed project.
pub struct TaskStateStore<'p> {
    pub(crate) project: &'p mut Project,
    pub(crate) clock: fn() -> DateTime<Utc>,
}

impl<'p> TaskStateStore<'p> {
    /// Creates a store stamping mutations with the system clock.
    pub fn new(project: &'p mut Project) -> Self {
        Self::with_clock(project, Utc::now)
    }

    /// Creates a store with a caller-provided clock.
    pub fn with_clock(project: &'p mut Project, clock: fn() -> DateTime<Utc>) -> Self {
        Self { project, clock }
    }

    pub fn project(&self) -> &Project {
        &*self.project
    }

    /// Sets `{set: true, isDone: false}` for each task on every instance of
    /// the part in every assembly that lists it. Returns the number of task
    /// states written.
    ///
    /// Instance ids `1..=qty` missing from an assembly are created first,
    /// seeded with the task names already tracked on the part. Completion
    /// already recorded on the assigned tasks is discarded.
    pub fn assign_tasks<I, S>(
        &mut self,
        part_id: &str,
        task_names: I,
        actor: &Actor,
    ) -> Result<usize, TaskStoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let task_names: Vec<String> = task_names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        let targets: Vec<(AssemblyId, u32)> = self
            .project
            .assemblies
            .iter()
            .filter(|(_, assembly)| assembly.contains_part(part_id))
            .map(|(assembly_id, assembly)| (assembly_id.clone(), assembly.qty))
            .collect();
        let part = self
            .project
            .part_mut(part_id)
            .ok_or_else(|| TaskStoreError::PartNotFound(part_id.to_string()))?;

        let known_tasks = tracked_task_names(part);
        let mut created = 0;
        let mut written = 0;
        for (assembly_id, qty) in &targets {
            let instances = part
                .assembly_instances
                .entry(assembly_id.clone())
                .or_default();
            created += pad_instances(instances, *qty, &known_tasks);
            for instance in instances.iter_mut() {
                for name in &task_names {
                    instance.tasks.insert(name.clone(), TaskStatus::assigned());
                    written += 1;
                }
            }
        }
        info!(
            "event=tasks_assigned module=service part={} tasks={} assemblies={} created={} written={} actor={}",
            part_id,
            task_names.len(),
            targets.len(),
            created,
            written,
            actor.display_name()
        );
        Ok(written)
    }

    /// Clears `set` for each named task present on any instance of the part.
    /// Returns the number of task states touched.
    pub fn unassign_tasks<I, S>(
        &mut self,
        part_id: &str,
        task_names: I,
        actor: &Actor,
    ) -> Result<usize, TaskStoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let task_names: Vec<String> = task_names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        let part = self
            .project
            .part_mut(part_id)
            .ok_or_else(|| TaskStoreError::PartNotFound(part_id.to_string()))?;

        let mut touched = 0;
        for instance in part.assembly_instances.values_mut().flatten() {
            for name in &task_names {
                if let Some(status) = instance.tasks.get_mut(name) {
                    status.set = false;
                    touched += 1;
                }
            }
        }
        info!(
            "event=tasks_unassigned module=service part={} tasks={} touched={} actor={}",
            part_id,
            task_names.len(),
            touched,
            actor.display_name()
        );
        Ok(touched)
    }

    /// Marks one instance task done or not done.
    ///
    /// A task completed by someone else can only be changed by an
    /// administrator; any other actor gets `Refused` and nothing changes.
    pub fn set_task_done(
        &mut self,
        part_id: &str,
        assembly_id: &str,
        instance_id: u32,
        task_name: &str,
        is_done: bool,
        actor: &Actor,
    ) -> Result<MutationOutcome, TaskStoreError> {
        let now = (self.clock)();
        let status = self.task_mut(part_id, assembly_id, instance_id, task_name)?;

        if let Some(owner) = status.done_by.as_deref() {
            if !actor.may_modify(owner) {
                info!(
                    "event=task_toggle_refused module=service part={} assembly={} instance={} task={} actor={}",
                    part_id,
                    assembly_id,
                    instance_id,
                    task_name,
                    actor.display_name()
                );
                return Ok(MutationOutcome::Refused);
            }
        }

        status.is_done = is_done;
        if is_done {
            status.done_by = Some(actor.display_name());
            status.done_at = Some(now);
        } else {
            status.done_by = None;
            status.done_at = None;
        }
        info!(
            "event=task_toggled module=service part={} assembly={} instance={} task={} is_done={}",
            part_id, assembly_id, instance_id, task_name, is_done
        );
        Ok(MutationOutcome::Applied)
    }

    /// Records completion with explicit author and time. Administrators only.
    #[allow(clippy::too_many_arguments)]
    pub fn override_completion(
        &mut self,
        part_id: &str,
        assembly_id: &str,
        instance_id: u32,
        task_name: &str,
        done_by: impl Into<String>,
        done_at: DateTime<Utc>,
        actor: &Actor,
    ) -> Result<MutationOutcome, TaskStoreError> {
        let status = self.task_mut(part_id, assembly_id, instance_id, task_name)?;
        if !actor.is_admin {
            info!(
                "event=task_override_refused module=service part={} task={} actor={}",
                part_id,
                task_name,
                actor.display_name()
            );
            return Ok(MutationOutcome::Refused);
        }

        *status = TaskStatus {
            set: true,
            is_done: true,
            done_by: Some(done_by.into()),
            done_at: Some(done_at),
        };
        info!(
            "event=task_overridden module=service part={} assembly={} instance={} task={}",
            part_id, assembly_id, instance_id, task_name
        );
        Ok(MutationOutcome::Applied)
    }

    pub(crate) fn instance_mut(
        &mut self,
        part_id: &str,
        assembly_id: &str,
        instance_id: u32,
    ) -> Result<&mut AssemblyInstance, TaskStoreError> {
        let part = self
            .project
            .part_mut(part_id)
            .ok_or_else(|| TaskStoreError::PartNotFound(part_id.to_string()))?;
        let instances = part.assembly_instances.get_mut(assembly_id).ok_or_else(|| {
            TaskStoreError::AssemblyNotFound {
                part: part_id.to_string(),
                assembly: assembly_id.to_string(),
            }
        })?;
        instances
            .iter_mut()
            .find(|instance| instance.id == instance_id)
            .ok_or_else(|| TaskStoreError::InstanceNotFound {
                part: part_id.to_string(),
                assembly: assembly_id.to_string(),
                instance: instance_id,
            })
    }

    fn task_mut(
        &mut self,
        part_id: &str,
        assembly_id: &str,
        instance_id: u32,
        task_name: &str,
    ) -> Result<&mut TaskStatus, TaskStoreError> {
        self.instance_mut(part_id, assembly_id, instance_id)?
            .tasks
            .get_mut(task_name)
            .ok_or_else(|| TaskStoreError::TaskNotFound {
                part: part_id.to_string(),
                task: task_name.to_string(),
            })
    }
}

/// Task names tracked on any instance of the part, first-seen order.
fn tracked_task_names(part: &Part) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for instance in part.assembly_instances.values().flatten() {
        for name in instance.tasks.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

/// Appends the ids in `1..=qty` not yet present. Returns how many were added.
fn pad_instances(
    instances: &mut Vec<AssemblyInstance>,
    qty: u32,
    task_names: &[String],
) -> usize {
    let mut created = 0;
    for id in 1..=qty {
        if !instances.iter().any(|instance| instance.id == id) {
            instances.push(AssemblyInstance::seeded(
                id,
                task_names.iter().map(String::as_str),
            ));
            created += 1;
        }
    }
    instances.sort_by_key(|instance| instance.id);
    created
}
