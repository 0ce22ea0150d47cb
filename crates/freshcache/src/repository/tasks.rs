//! Task operations on top of the generic repository.

use uuid::Uuid;

use freshcache_core::models::Task;
use freshcache_core::storage::{LocalStore, RemoteSource, RepositoryError, Result};

use super::{CachedRepository, WriteOutcome};

impl<L, S> CachedRepository<Task, L, S>
where
    L: LocalStore<Task> + 'static,
    S: RemoteSource<Task> + 'static,
{
    /// Returns every local task, refreshing the collection first when forced.
    ///
    /// A failed forced refresh is returned as an error.
    pub async fn get_tasks(&self, force_update: bool) -> Result<Vec<Task>> {
        if force_update {
            self.force_refresh_all().await?;
        }
        self.read_all().await
    }

    /// Marks the task completed, locally first.
    pub async fn complete_task(&self, id: &Uuid) -> Result<(Task, WriteOutcome)> {
        self.update_task(id, Task::completed).await
    }

    /// Marks the task active again, locally first.
    pub async fn activate_task(&self, id: &Uuid) -> Result<(Task, WriteOutcome)> {
        self.update_task(id, Task::activated).await
    }

    /// Deletes every completed task.
    pub async fn clear_completed_tasks(&self) -> Result<WriteOutcome> {
        self.delete_where(|task| task.is_completed).await
    }

    async fn update_task(
        &self,
        id: &Uuid,
        change: impl FnOnce(Task) -> Task,
    ) -> Result<(Task, WriteOutcome)> {
        let task = self
            .read(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(id))?;
        let task = change(task);
        let outcome = self.write(&task).await?;
        Ok((task, outcome))
    }
}
