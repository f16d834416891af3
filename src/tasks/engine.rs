use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::auth::Session;
use crate::error::{Error, Result};
use crate::ids;
use crate::store::Store;
use crate::tasks::repo;
use crate::tasks::types::{Task, TaskDraft, TaskPatch};

/// CRUD over one user's task sequence. Every operation loads the full
/// sequence, applies a pure transformation and persists the result; nothing
/// is mutated in place behind the store's back.
pub struct TaskEngine<'a> {
    store: &'a mut dyn Store,
    session: &'a Session,
}

impl<'a> TaskEngine<'a> {
    pub fn new(store: &'a mut dyn Store, session: &'a Session) -> Self {
        Self { store, session }
    }

    fn email(&self) -> &str {
        &self.session.user.email
    }

    /// Full stored sequence in insertion order.
    pub fn list(&self) -> Result<Vec<Task>> {
        repo::load_tasks(self.store, self.email())
    }

    #[instrument(skip(self, draft))]
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(Error::validation("title must not be empty"));
        }

        let task = Task {
            id: ids::next_id(),
            title: title.to_string(),
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            deadline: draft.deadline,
            created_at: OffsetDateTime::now_utc(),
        };

        let mut tasks = self.list()?;
        tasks.push(task.clone());
        repo::save_tasks(self.store, &self.session.user.email, &tasks)?;

        info!(task_id = %task.id, user_id = %self.session.user.id, "task created");
        Ok(task)
    }

    /// Merge `patch` into the task with this id; unset fields keep their
    /// prior values, `id` and `created_at` are untouchable.
    #[instrument(skip(self, patch))]
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let mut tasks = self.list()?;
        let idx = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(Error::validation("title must not be empty"));
            }
            tasks[idx].title = title;
        }
        if let Some(description) = patch.description {
            tasks[idx].description = description;
        }
        if let Some(priority) = patch.priority {
            tasks[idx].priority = priority;
        }
        if let Some(status) = patch.status {
            tasks[idx].status = status;
        }
        if let Some(deadline) = patch.deadline {
            tasks[idx].deadline = deadline;
        }

        let updated = tasks[idx].clone();
        repo::save_tasks(self.store, &self.session.user.email, &tasks)?;

        info!(task_id = %updated.id, user_id = %self.session.user.id, "task updated");
        Ok(updated)
    }

    /// Removing an absent id is a no-op, not an error.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let tasks = self.list()?;
        let remaining: Vec<Task> = tasks.into_iter().filter(|t| t.id != id).collect();
        repo::save_tasks(self.store, &self.session.user.email, &remaining)?;
        info!(task_id = %id, user_id = %self.session.user.id, "task removed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn toggle_status(&mut self, id: &str) -> Result<Task> {
        let mut tasks = self.list()?;
        let idx = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        tasks[idx].status = tasks[idx].status.toggle();
        let updated = tasks[idx].clone();
        repo::save_tasks(self.store, &self.session.user.email, &tasks)?;

        info!(task_id = %updated.id, status = %updated.status, "task status toggled");
        Ok(updated)
    }
}
