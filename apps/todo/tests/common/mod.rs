#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use domain_todo::{NewTask, Task, TaskError, TaskRepository, TaskResult, TaskService};
use grpc_client::{AuthInterceptor, BearerAuth, create_channel};
use rpc::todo::v1::todo_service_client::TodoServiceClient;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use todo_server::{HttpGateway, Lifecycle, RpcListener, TodoServiceImpl};

pub const TOKEN: &str = "test-token";

/// Repository keeping tasks in memory, ids assigned from 1
#[derive(Default)]
pub struct InMemoryRepository {
    tasks: Mutex<BTreeMap<i64, Task>>,
}

#[async_trait]
impl TaskRepository for InMemoryRepository {
    async fn create(&self, input: NewTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.lock().unwrap();
        let id = tasks.keys().next_back().copied().unwrap_or(0) + 1;
        let task = Task {
            id,
            title: input.title,
            description: input.description,
            completed: false,
        };
        tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> TaskResult<Task> {
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(task)
            }
            None => Err(TaskError::NotFound(task.id)),
        }
    }

    async fn find_all(&self) -> TaskResult<Vec<Task>> {
        Ok(self.tasks.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> TaskResult<Task> {
        self.tasks
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(TaskError::NotFound(id))
    }
}

/// Listener and gateway on ephemeral loopback ports over an empty store
pub struct Stack {
    pub lifecycle: Lifecycle,
    pub rpc: SocketAddr,
    pub http: SocketAddr,
}

pub async fn start_stack() -> Stack {
    let handler = TodoServiceImpl::new(TaskService::new(InMemoryRepository::default()));
    let listener = RpcListener::new("127.0.0.1:0", handler, BearerAuth::new(TOKEN));
    let rpc = listener.local_addr();
    let gateway = HttpGateway::new("127.0.0.1:0", listener.local_addr());
    let http = gateway.local_addr();

    let mut lifecycle = Lifecycle::new(Duration::from_secs(5));
    lifecycle.register(listener).unwrap();
    lifecycle.register(gateway).unwrap();
    lifecycle.start().await.unwrap();

    Stack {
        lifecycle,
        rpc: *rpc.get().unwrap(),
        http: *http.get().unwrap(),
    }
}

pub async fn rpc_client(
    addr: SocketAddr,
    token: &str,
) -> TodoServiceClient<InterceptedService<Channel, AuthInterceptor>> {
    let channel = create_channel(format!("http://{addr}")).await.unwrap();
    TodoServiceClient::with_interceptor(channel, AuthInterceptor::bearer(token).unwrap())
}
