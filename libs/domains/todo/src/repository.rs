use async_trait::async_trait;

use crate::error::TaskResult;
use crate::models::{NewTask, Task};

/// Repository trait for Task persistence
///
/// Reads never return soft-deleted rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task and return it with its assigned id
    async fn create(&self, input: NewTask) -> TaskResult<Task>;

    /// Overwrite title, description and completed of `task.id`, returning the stored row.
    /// Fails with `NotFound` when the row is missing.
    async fn update(&self, task: Task) -> TaskResult<Task>;

    /// All tasks ordered by id
    async fn find_all(&self) -> TaskResult<Vec<Task>>;

    /// Fails with `NotFound` when the row is missing
    async fn find_by_id(&self, id: i64) -> TaskResult<Task>;
}
