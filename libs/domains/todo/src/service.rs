use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::TaskResult;
use crate::models::{NewTask, Task};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
///
/// Repository errors pass through unchanged.
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new task with validation
    #[instrument(skip(self, input), fields(task_title = %input.title))]
    pub async fn add_task(&self, input: NewTask) -> TaskResult<Task> {
        input.validate()?;
        self.repository.create(input).await
    }

    /// List all tasks ordered by id
    #[instrument(skip(self))]
    pub async fn list_tasks(&self) -> TaskResult<Vec<Task>> {
        self.repository.find_all().await
    }

    /// Mark a task as completed
    #[instrument(skip(self), fields(task_id = id))]
    pub async fn complete_task(&self, id: i64) -> TaskResult<Task> {
        let mut task = self.repository.find_by_id(id).await?;
        task.completed = true;
        self.repository.update(task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::repository::MockTaskRepository;
    use mockall::predicate::eq;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            completed,
        }
    }

    #[tokio::test]
    async fn test_add_task_forwards_to_repository() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_create()
            .with(eq(NewTask::new("Buy milk", "")))
            .times(1)
            .returning(|input| {
                Ok(Task {
                    id: 1,
                    title: input.title,
                    description: input.description,
                    completed: false,
                })
            });

        let service = TaskService::new(mock_repo);
        let created = service.add_task(NewTask::new("Buy milk", "")).await.unwrap();

        assert_eq!(created, task(1, "Buy milk", false));
    }

    #[tokio::test]
    async fn test_add_task_rejects_empty_title_without_touching_repository() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_create().never();

        let service = TaskService::new(mock_repo);
        let err = service.add_task(NewTask::new("", "desc")).await.unwrap_err();

        assert!(matches!(err, TaskError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_tasks_returns_repository_order() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_find_all()
            .returning(|| Ok(vec![task(1, "a", false), task(2, "b", true)]));

        let service = TaskService::new(mock_repo);
        let tasks = service.list_tasks().await.unwrap();

        assert_eq!(tasks, vec![task(1, "a", false), task(2, "b", true)]);
    }

    #[tokio::test]
    async fn test_complete_task_sets_completed_and_updates() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(task(id, "Buy milk", false)));
        mock_repo
            .expect_update()
            .with(eq(task(1, "Buy milk", true)))
            .times(1)
            .returning(Ok);

        let service = TaskService::new(mock_repo);
        let done = service.complete_task(1).await.unwrap();

        assert!(done.completed);
    }

    #[tokio::test]
    async fn test_complete_missing_task_is_not_found_and_writes_nothing() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Err(TaskError::NotFound(id)));
        mock_repo.expect_update().never();

        let service = TaskService::new(mock_repo);
        let err = service.complete_task(7).await.unwrap_err();

        assert!(matches!(err, TaskError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_repository_errors_propagate_unchanged() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_find_all()
            .returning(|| Err(TaskError::Database("connection reset".to_string())));

        let service = TaskService::new(mock_repo);
        let err = service.list_tasks().await.unwrap_err();

        assert!(matches!(err, TaskError::Database(ref msg) if msg == "connection reset"));
    }
}
