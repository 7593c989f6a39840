//! Project operations.
//!
//! # Invariants
//! - `members` never gains a duplicate.
//! - Deleting a project removes every task that references it.
//! - Project lists are sorted by `updatedAt DESC`.

use crate::model::ids::{new_id, touch, Clock};
use crate::model::project::Project;
use crate::repo::DocumentRepository;
use crate::service::store::{require_text, Deleted, DocumentStore, StoreError, StoreResult};
use log::{debug, info};

impl<R: DocumentRepository, C: Clock> DocumentStore<R, C> {
    /// Projects the user owns or is a member of, most recently touched first.
    pub fn projects_for_user(&self, user_id: &str) -> StoreResult<Vec<Project>> {
        let mut projects = self
            .load()?
            .projects
            .into_iter()
            .filter(|project| project.is_accessible_by(user_id))
            .collect::<Vec<_>>();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        debug!(
            "event=projects_for_user module=store status=ok user_id={user_id} count={}",
            projects.len()
        );
        Ok(projects)
    }

    pub fn get_project(&self, project_id: &str) -> StoreResult<Option<Project>> {
        Ok(self.load()?.project(project_id).cloned())
    }

    /// Creates a project owned by `owner_id`, who is also its first member.
    pub fn create_project(
        &mut self,
        name: &str,
        description: &str,
        owner_id: &str,
    ) -> StoreResult<Project> {
        require_text("name", name)?;

        let mut document = self.load()?;
        let now = self.now();
        let project = Project {
            id: new_id(),
            name: name.to_string(),
            description: description.to_string(),
            owner: owner_id.to_string(),
            members: vec![owner_id.to_string()],
            created_at: now,
            updated_at: now,
        };
        document.projects.push(project.clone());
        self.commit(&document)?;

        info!(
            "event=project_create module=store status=ok project_id={} owner_id={owner_id}",
            project.id
        );
        Ok(project)
    }

    /// Adds `user_id` to the project's members unless already present.
    pub fn add_member(&mut self, project_id: &str, user_id: &str) -> StoreResult<Project> {
        let mut document = self.load()?;
        let now = self.now();
        let project = document
            .project_mut(project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))?;

        let added = project.add_member(user_id);
        project.updated_at = touch(project.updated_at, now);
        let project = project.clone();
        self.commit(&document)?;

        info!(
            "event=project_add_member module=store status=ok project_id={project_id} user_id={user_id} added={added}"
        );
        Ok(project)
    }

    /// Removes the project and cascades to its tasks. Not reversible.
    pub fn delete_project(&mut self, project_id: &str) -> StoreResult<Deleted> {
        let mut document = self.load()?;

        let projects_before = document.projects.len();
        document.projects.retain(|project| project.id != project_id);
        let existed = document.projects.len() != projects_before;

        let tasks_before = document.tasks.len();
        document.tasks.retain(|task| task.project_id != project_id);
        let cascaded_tasks = tasks_before - document.tasks.len();

        if existed || cascaded_tasks > 0 {
            self.commit(&document)?;
        }

        info!(
            "event=project_delete module=store status=ok project_id={project_id} existed={existed} cascaded_tasks={cascaded_tasks}"
        );
        Ok(Deleted {
            existed,
            cascaded_tasks,
        })
    }
}
