//! Task record, Kanban status order and sparse update patches.
//!
//! # Responsibility
//! - Define the canonical task shape stored in the board document.
//! - Provide validation shared by create and update paths.
//! - Model partial updates as an explicit all-optional patch.
//!
//! # Invariants
//! - `progress` stays within `0..=100`.
//! - `title` is never blank.
//! - Status transitions are unconstrained; `TaskStatus::next`/`previous`
//!   only describe the board column order.

use crate::model::ids::{EpochMs, ProjectId, TaskId, UserId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_CATEGORY: &str = "General";
pub const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Board column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Backlog,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Column order, left to right.
    pub const ORDER: [TaskStatus; 4] = [
        TaskStatus::Backlog,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    pub fn column_index(self) -> usize {
        match self {
            Self::Backlog => 0,
            Self::InProgress => 1,
            Self::Review => 2,
            Self::Done => 3,
        }
    }

    /// Column to the right, or `None` at the last column.
    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.column_index() + 1).copied()
    }

    /// Column to the left, or `None` at the first column.
    pub fn previous(self) -> Option<Self> {
        self.column_index()
            .checked_sub(1)
            .and_then(|index| Self::ORDER.get(index).copied())
    }

    /// Work that has started but is not finished.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::InProgress | Self::Review)
    }
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    ProgressOutOfRange(u8),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::ProgressOutOfRange(value) => {
                write!(f, "task progress {value} is outside 0..={MAX_PROGRESS}")
            }
        }
    }
}

impl Error for TaskValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    /// Free-form due date, usually `YYYY-MM-DD`; empty when unset.
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub assignees: Vec<UserId>,
    pub created_by: UserId,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

impl Task {
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)?;
        validate_progress(self.progress)
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: String,
    pub progress: u8,
    /// `None` assigns the task to its creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<UserId>>,
}

impl NewTask {
    /// Creates input with board-form defaults: category `General`, priority
    /// `medium`, status `backlog`, progress `0`.
    pub fn new(project_id: impl Into<ProjectId>, title: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            priority: TaskPriority::default(),
            status: TaskStatus::default(),
            due_date: String::new(),
            progress: 0,
            assignees: None,
        }
    }
}

/// Sparse update: only fields set to `Some` are applied.
///
/// Identity and bookkeeping fields (`id`, `projectId`, `createdBy`,
/// `createdAt`, `updatedAt`) are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<UserId>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks the patched fields without touching any task.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(progress) = self.progress {
            validate_progress(progress)?;
        }
        Ok(())
    }

    /// Shallow-merges the present fields into `task`.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(progress) = self.progress {
            task.progress = progress;
        }
        if let Some(assignees) = self.assignees {
            task.assignees = assignees;
        }
    }
}

fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}

fn validate_progress(progress: u8) -> Result<(), TaskValidationError> {
    if progress > MAX_PROGRESS {
        return Err(TaskValidationError::ProgressOutOfRange(progress));
    }
    Ok(())
}
