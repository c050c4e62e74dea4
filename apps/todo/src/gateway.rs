//! HTTP/JSON transcoding onto the todo RPC service
//!
//! | route | RPC |
//! |---|---|
//! | `POST /v1/tasks` | `AddTask` |
//! | `GET /v1/tasks` | `ListTasks` |
//! | `PUT /v1/tasks/{id}/complete` | `CompleteTask` |
//!
//! Bodies are the JSON form of the RPC messages. The caller's `Authorization`
//! header is forwarded as call metadata so the RPC gate guards this surface too.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, header::AUTHORIZATION},
    routing::{get, put},
};
use axum_helpers::{AppError, create_router, health_router};
use eyre::{Result, eyre};
use grpc_client::create_channel;
use rpc::todo::v1::{
    AddTaskRequest, AddTaskResponse, CompleteTaskRequest, CompleteTaskResponse, ListTasksRequest,
    ListTasksResponse, todo_service_client::TodoServiceClient,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tonic::{Code, Request, Status, metadata::MetadataValue, transport::Channel};
use tracing::{error, info};

use crate::error::ServerError;
use crate::lifecycle::{Component, ExitReporter};
use crate::listener::BoundAddr;

pub const HTTP_COMPONENT: &str = "http-gateway";

type Client = TodoServiceClient<Channel>;

/// Map an upstream RPC status onto the HTTP error body
pub fn status_to_app_error(status: Status) -> AppError {
    let message = status.message().to_string();
    match status.code() {
        Code::Unauthenticated => AppError::Unauthorized(message),
        Code::NotFound => AppError::NotFound(message),
        Code::InvalidArgument => AppError::BadRequest(message),
        Code::Unavailable => AppError::ServiceUnavailable(message),
        _ => AppError::InternalServerError(message),
    }
}

/// Wrap `message` in a request that carries the caller's credential, if any
fn forward<T>(headers: &HeaderMap, message: T) -> Result<Request<T>, AppError> {
    let mut request = Request::new(message);
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value
            .to_str()
            .ok()
            .and_then(|v| MetadataValue::try_from(v).ok())
            .ok_or_else(|| AppError::Unauthorized("invalid auth token".to_string()))?;
        request.metadata_mut().insert("authorization", value);
    }
    Ok(request)
}

async fn add_task(
    State(mut client): State<Client>,
    headers: HeaderMap,
    payload: Result<Json<AddTaskRequest>, JsonRejection>,
) -> Result<Json<AddTaskResponse>, AppError> {
    let Json(body) = payload?;
    let response = client
        .add_task(forward(&headers, body)?)
        .await
        .map_err(status_to_app_error)?;
    Ok(Json(response.into_inner()))
}

async fn list_tasks(
    State(mut client): State<Client>,
    headers: HeaderMap,
) -> Result<Json<ListTasksResponse>, AppError> {
    let response = client
        .list_tasks(forward(&headers, ListTasksRequest {})?)
        .await
        .map_err(status_to_app_error)?;
    Ok(Json(response.into_inner()))
}

async fn complete_task(
    State(mut client): State<Client>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<CompleteTaskResponse>, AppError> {
    let response = client
        .complete_task(forward(&headers, CompleteTaskRequest { id })?)
        .await
        .map_err(status_to_app_error)?;
    Ok(Json(response.into_inner()))
}

pub fn router(client: Client) -> Router {
    let api = Router::new()
        .route("/v1/tasks", get(list_tasks).post(add_task))
        .route("/v1/tasks/{id}/complete", put(complete_task))
        .with_state(client);

    create_router(api.merge(health_router("todo", env!("CARGO_PKG_VERSION"))))
}

/// Dial target for a listener bound to `addr`; wildcard binds are reached over loopback
pub fn loopback(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}

pub struct HttpGateway {
    addr: String,
    upstream: BoundAddr,
    bound: BoundAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
    reporter: Option<ExitReporter>,
}

impl HttpGateway {
    /// `upstream` is the RPC listener's published address
    pub fn new(addr: impl Into<String>, upstream: BoundAddr) -> Self {
        Self {
            addr: addr.into(),
            upstream,
            bound: Arc::new(OnceLock::new()),
            shutdown: None,
            task: None,
            reporter: None,
        }
    }

    pub fn local_addr(&self) -> BoundAddr {
        Arc::clone(&self.bound)
    }
}

#[async_trait]
impl Component for HttpGateway {
    fn name(&self) -> &str {
        HTTP_COMPONENT
    }

    async fn start(&mut self) -> Result<()> {
        let upstream = self
            .upstream
            .get()
            .copied()
            .map(loopback)
            .ok_or_else(|| eyre!("{HTTP_COMPONENT} needs a bound RPC listener"))?;

        // Dial first so the gateway never serves without a reachable upstream
        let channel = create_channel(format!("http://{upstream}"))
            .await
            .map_err(ServerError::from)?;

        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|source| ServerError::BindFailure {
                addr: self.addr.clone(),
                source,
            })?;
        let local = listener.local_addr()?;
        let _ = self.bound.set(local);

        let app = router(TodoServiceClient::new(channel));
        let (tx, rx) = oneshot::channel::<()>();
        let reporter = self.reporter.clone();
        self.task = Some(tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
                .inspect_err(|e| {
                    error!(error = %e, "HTTP gateway failed");
                    if let Some(reporter) = &reporter {
                        reporter.report(e);
                    }
                })
        }));
        self.shutdown = Some(tx);

        info!(addr = %local, %upstream, "HTTP gateway accepting requests");
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await??;
        }
        Ok(())
    }

    fn attach_exit_reporter(&mut self, reporter: ExitReporter) {
        self.reporter = Some(reporter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Status::unauthenticated("no auth token"), StatusCode::UNAUTHORIZED),
            (Status::not_found("Task not found: 7"), StatusCode::NOT_FOUND),
            (Status::invalid_argument("task is required"), StatusCode::BAD_REQUEST),
            (Status::unavailable("down"), StatusCode::SERVICE_UNAVAILABLE),
            (Status::internal("internal error"), StatusCode::INTERNAL_SERVER_ERROR),
            (Status::unknown("?"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (status, expected) in cases {
            assert_eq!(status_to_app_error(status).into_response().status(), expected);
        }
    }

    #[test]
    fn test_forward_copies_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));

        let request = forward(&headers, ListTasksRequest {}).unwrap();

        assert_eq!(
            request.metadata().get("authorization").and_then(|v| v.to_str().ok()),
            Some("Bearer abc")
        );
    }

    #[test]
    fn test_forward_without_authorization_sends_none() {
        let request = forward(&HeaderMap::new(), ListTasksRequest {}).unwrap();
        assert!(request.metadata().get("authorization").is_none());
    }

    #[test]
    fn test_loopback_rewrites_wildcard_only() {
        let wildcard: SocketAddr = "0.0.0.0:50051".parse().unwrap();
        let v6: SocketAddr = "[::]:50051".parse().unwrap();
        let concrete: SocketAddr = "10.0.0.5:50051".parse().unwrap();

        assert_eq!(loopback(wildcard), "127.0.0.1:50051".parse().unwrap());
        assert_eq!(loopback(v6), "[::1]:50051".parse().unwrap());
        assert_eq!(loopback(concrete), concrete);
    }
}
