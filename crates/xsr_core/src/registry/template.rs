//! Task template: the ordered work steps seeded onto every instance.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const FABRICATION_DEFAULT_TASKS: &[&str] = &[
    "Procurement",
    "Dimension Check",
    "Material Cleaning",
    "Blasting",
    "Fit-Up",
    "Weld Cleaning",
    "Primer",
    "Painting",
    "Drilling",
    "Tapping",
    "Countersinking",
];

/// Template validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTemplateError {
    EmptyTemplate,
    BlankTaskName,
    DuplicateTaskName(String),
    /// The external template source could not provide a value.
    Unavailable(String),
}

impl Display for TaskTemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTemplate => write!(f, "task template must contain at least one task"),
            Self::BlankTaskName => write!(f, "task name must not be blank"),
            Self::DuplicateTaskName(name) => write!(f, "duplicate task name: `{name}`"),
            Self::Unavailable(details) => write!(f, "task template unavailable: {details}"),
        }
    }
}

impl Error for TaskTemplateError {}

/// Ordered, validated list of task names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTemplate {
    names: Vec<String>,
}

impl TaskTemplate {
    /// Builds a template from trimmed, unique, non-blank names.
    pub fn new<I, S>(names: I) -> Result<Self, TaskTemplateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut normalized = Vec::new();
        for name in names {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                return Err(TaskTemplateError::BlankTaskName);
            }
            if !seen.insert(trimmed.to_string()) {
                return Err(TaskTemplateError::DuplicateTaskName(trimmed.to_string()));
            }
            normalized.push(trimmed.to_string());
        }
        if normalized.is_empty() {
            return Err(TaskTemplateError::EmptyTemplate);
        }
        Ok(Self { names: normalized })
    }

    /// Stock steel-shop sequence used when no project template is supplied.
    pub fn fabrication_default() -> Self {
        Self {
            names: FABRICATION_DEFAULT_TASKS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
    }
}

/// Source of the task template for a project, typically a remote
/// key-value configuration document.
pub trait TaskTemplateProvider {
    fn task_template(&self) -> Result<TaskTemplate, TaskTemplateError>;
}

impl TaskTemplateProvider for TaskTemplate {
    fn task_template(&self) -> Result<TaskTemplate, TaskTemplateError> {
        Ok(self.clone())
    }
}
