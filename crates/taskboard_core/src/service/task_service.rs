//! Task operations.
//!
//! # Responsibility
//! - Create, filter, patch and delete tasks within a project.
//! - Keep the parent project's `updatedAt` in step with task changes.
//!
//! # Invariants
//! - Task lists are sorted by `updatedAt DESC`.
//! - `updatedAt` never moves backwards on update.
//! - Deleting an unknown task succeeds without writing.

use crate::model::document::Document;
use crate::model::ids::{new_id, touch, Clock, EpochMs, ProjectId};
use crate::model::task::{NewTask, Task, TaskPatch, TaskStatus};
use crate::repo::DocumentRepository;
use crate::service::store::{Deleted, DocumentStore, StoreError, StoreResult};
use log::{debug, info};

/// Filter for listing one project's tasks.
///
/// Empty `category` and `query` strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub project_id: ProjectId,
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
    pub query: Option<String>,
}

impl TaskListQuery {
    pub fn for_project(project_id: impl Into<ProjectId>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl<R: DocumentRepository, C: Clock> DocumentStore<R, C> {
    /// Lists tasks of one project matching every supplied filter.
    pub fn list_tasks(&self, query: &TaskListQuery) -> StoreResult<Vec<Task>> {
        let matcher = self.matcher(query.query.as_deref())?;
        let category = query.category.as_deref().filter(|value| !value.is_empty());

        let mut tasks = self
            .load()?
            .tasks
            .into_iter()
            .filter(|task| task.project_id == query.project_id)
            .filter(|task| query.status.map_or(true, |status| task.status == status))
            .filter(|task| category.map_or(true, |category| task.category == category))
            .filter(|task| matcher.matches_any(&[task.title.as_str(), task.description.as_str()]))
            .collect::<Vec<_>>();
        sort_by_recent(&mut tasks);

        debug!(
            "event=task_list module=store status=ok project_id={} count={}",
            query.project_id,
            tasks.len()
        );
        Ok(tasks)
    }

    pub fn get_task(&self, task_id: &str) -> StoreResult<Option<Task>> {
        Ok(self.load()?.task(task_id).cloned())
    }

    /// Creates a task; assignees default to the creator.
    ///
    /// The parent project is touched when it exists; a missing project is
    /// not an error.
    pub fn create_task(&mut self, input: NewTask, creator_id: &str) -> StoreResult<Task> {
        let mut document = self.load()?;
        let now = self.now();
        let task = Task {
            id: new_id(),
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            category: input.category,
            priority: input.priority,
            status: input.status,
            due_date: input.due_date,
            progress: input.progress,
            assignees: input
                .assignees
                .unwrap_or_else(|| vec![creator_id.to_string()]),
            created_by: creator_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        task.validate()?;

        document.tasks.push(task.clone());
        Self::touch_project(&mut document, &task.project_id, now);
        self.commit(&document)?;

        info!(
            "event=task_create module=store status=ok task_id={} project_id={}",
            task.id, task.project_id
        );
        Ok(task)
    }

    /// Shallow-merges `patch` into the task and refreshes timestamps.
    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> StoreResult<Task> {
        patch.validate()?;

        let mut document = self.load()?;
        let now = self.now();
        let task = patch_task(&mut document, task_id, patch, now)?;
        Self::touch_project(&mut document, &task.project_id, now);
        self.commit(&document)?;

        info!(
            "event=task_update module=store status=ok task_id={task_id} status_value={}",
            task.status.as_str()
        );
        Ok(task)
    }

    /// Removes the task; an unknown id is a successful no-op.
    pub fn delete_task(&mut self, task_id: &str) -> StoreResult<Deleted> {
        let mut document = self.load()?;
        let before = document.tasks.len();
        document.tasks.retain(|task| task.id != task_id);
        let existed = document.tasks.len() != before;

        if existed {
            self.commit(&document)?;
        }

        info!("event=task_delete module=store status=ok task_id={task_id} existed={existed}");
        Ok(Deleted {
            existed,
            cascaded_tasks: 0,
        })
    }
}

/// Applies `patch` to the task in `document` and returns the merged task.
pub(crate) fn patch_task(
    document: &mut Document,
    task_id: &str,
    patch: TaskPatch,
    now: EpochMs,
) -> StoreResult<Task> {
    let task = document
        .task_mut(task_id)
        .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
    patch.apply_to(task);
    task.updated_at = touch(task.updated_at, now);
    Ok(task.clone())
}

pub(crate) fn sort_by_recent(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
