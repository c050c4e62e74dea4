//! gRPC handler for `todo.v1.TodoService`
//!
//! Thin mapping between wire messages and [`TaskService`]; holds no state of
//! its own so concurrent calls need no coordination.

use domain_todo::{NewTask, Task, TaskError, TaskRepository, TaskService};
use grpc_client::ToTonicOption;
use rpc::todo::v1::{
    self as proto, AddTaskRequest, AddTaskResponse, CompleteTaskRequest, CompleteTaskResponse,
    ListTasksRequest, ListTasksResponse, todo_service_server::TodoService,
};
use tonic::{Request, Response, Status};

pub struct TodoServiceImpl<R>
where
    R: TaskRepository + 'static,
{
    service: TaskService<R>,
}

impl<R> TodoServiceImpl<R>
where
    R: TaskRepository + 'static,
{
    pub fn new(service: TaskService<R>) -> Self {
        Self { service }
    }
}

/// Map a domain failure onto a status, keeping its message intact
pub fn task_status(err: TaskError) -> Status {
    match err {
        TaskError::NotFound(_) => Status::not_found(err.to_string()),
        TaskError::Validation(_) => Status::invalid_argument(err.to_string()),
        TaskError::Database(_) => Status::internal(err.to_string()),
    }
}

fn to_proto(task: Task) -> proto::Task {
    proto::Task {
        id: task.id,
        title: task.title,
        description: task.description,
        completed: task.completed,
    }
}

#[tonic::async_trait]
impl<R> TodoService for TodoServiceImpl<R>
where
    R: TaskRepository + 'static,
{
    async fn add_task(
        &self,
        request: Request<AddTaskRequest>,
    ) -> Result<Response<AddTaskResponse>, Status> {
        let task = request.into_inner().task.ok_or_invalid("task is required")?;
        let created = self
            .service
            .add_task(NewTask::new(task.title, task.description))
            .await
            .map_err(task_status)?;

        Ok(Response::new(AddTaskResponse {
            task: Some(to_proto(created)),
        }))
    }

    async fn list_tasks(
        &self,
        _request: Request<ListTasksRequest>,
    ) -> Result<Response<ListTasksResponse>, Status> {
        let tasks = self.service.list_tasks().await.map_err(task_status)?;

        Ok(Response::new(ListTasksResponse {
            tasks: tasks.into_iter().map(to_proto).collect(),
        }))
    }

    async fn complete_task(
        &self,
        request: Request<CompleteTaskRequest>,
    ) -> Result<Response<CompleteTaskResponse>, Status> {
        let id = request.into_inner().id;
        let task = self
            .service
            .complete_task(id)
            .await
            .map_err(task_status)?;

        Ok(Response::new(CompleteTaskResponse {
            task: Some(to_proto(task)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain_todo::TaskResult;
    use std::sync::Mutex;

    /// Single-slot repository; enough to exercise the wire mapping
    #[derive(Default)]
    struct SlotRepository {
        slot: Mutex<Option<Task>>,
    }

    #[async_trait]
    impl TaskRepository for SlotRepository {
        async fn create(&self, input: NewTask) -> TaskResult<Task> {
            let task = Task {
                id: 1,
                title: input.title,
                description: input.description,
                completed: false,
            };
            *self.slot.lock().unwrap() = Some(task.clone());
            Ok(task)
        }

        async fn update(&self, task: Task) -> TaskResult<Task> {
            *self.slot.lock().unwrap() = Some(task.clone());
            Ok(task)
        }

        async fn find_all(&self) -> TaskResult<Vec<Task>> {
            Ok(self.slot.lock().unwrap().iter().cloned().collect())
        }

        async fn find_by_id(&self, id: i64) -> TaskResult<Task> {
            self.slot
                .lock()
                .unwrap()
                .clone()
                .filter(|t| t.id == id)
                .ok_or(TaskError::NotFound(id))
        }
    }

    fn handler() -> TodoServiceImpl<SlotRepository> {
        TodoServiceImpl::new(TaskService::new(SlotRepository::default()))
    }

    fn add(title: &str) -> Request<AddTaskRequest> {
        Request::new(AddTaskRequest {
            task: Some(proto::Task {
                title: title.to_string(),
                ..Default::default()
            }),
        })
    }

    #[tokio::test]
    async fn test_add_then_complete() {
        let handler = handler();

        let created = handler.add_task(add("Buy milk")).await.unwrap().into_inner();
        assert_eq!(created.task.as_ref().map(|t| (t.id, t.completed)), Some((1, false)));

        let done = handler
            .complete_task(Request::new(CompleteTaskRequest { id: 1 }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(done.task.map(|t| t.completed), Some(true));
    }

    #[tokio::test]
    async fn test_add_without_payload_is_invalid_argument() {
        let status = handler()
            .add_task(Request::new(AddTaskRequest { task: None }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_add_with_empty_title_is_invalid_argument() {
        let status = handler().add_task(add("")).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_complete_missing_is_not_found() {
        let status = handler()
            .complete_task(Request::new(CompleteTaskRequest { id: 42 }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn test_storage_error_message_reaches_caller() {
        struct BrokenRepository;

        #[async_trait]
        impl TaskRepository for BrokenRepository {
            async fn create(&self, _input: NewTask) -> TaskResult<Task> {
                unreachable!()
            }

            async fn update(&self, _task: Task) -> TaskResult<Task> {
                unreachable!()
            }

            async fn find_all(&self) -> TaskResult<Vec<Task>> {
                Err(TaskError::Database(
                    "relation \"tasks\" does not exist".to_string(),
                ))
            }

            async fn find_by_id(&self, id: i64) -> TaskResult<Task> {
                Err(TaskError::NotFound(id))
            }
        }

        let handler = TodoServiceImpl::new(TaskService::new(BrokenRepository));
        let status = handler
            .list_tasks(Request::new(ListTasksRequest {}))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(status.message().contains("relation \"tasks\" does not exist"));
    }
}
