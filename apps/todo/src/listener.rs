use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use eyre::{Result, eyre};
use grpc_client::BearerAuth;
use rpc::todo::v1::todo_service_server::{TodoService, TodoServiceServer};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Server;
use tracing::{error, info};

use crate::error::ServerError;
use crate::lifecycle::{Component, ExitReporter};

pub const RPC_COMPONENT: &str = "rpc-listener";

/// Address a listener publishes once bound
pub type BoundAddr = Arc<OnceLock<SocketAddr>>;

/// Serves the todo RPC service behind the bearer gate
pub struct RpcListener<S>
where
    S: TodoService,
{
    addr: String,
    handler: Option<S>,
    gate: BearerAuth,
    bound: BoundAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), tonic::transport::Error>>>,
    reporter: Option<ExitReporter>,
}

impl<S> RpcListener<S>
where
    S: TodoService,
{
    pub fn new(addr: impl Into<String>, handler: S, gate: BearerAuth) -> Self {
        Self {
            addr: addr.into(),
            handler: Some(handler),
            gate,
            bound: Arc::new(OnceLock::new()),
            shutdown: None,
            task: None,
            reporter: None,
        }
    }

    /// Resolves to the bound address after [`Component::start`]
    pub fn local_addr(&self) -> BoundAddr {
        Arc::clone(&self.bound)
    }
}

#[async_trait]
impl<S> Component for RpcListener<S>
where
    S: TodoService,
{
    fn name(&self) -> &str {
        RPC_COMPONENT
    }

    async fn start(&mut self) -> Result<()> {
        let handler = self
            .handler
            .take()
            .ok_or_else(|| eyre!("{RPC_COMPONENT} already started"))?;

        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|source| ServerError::BindFailure {
                addr: self.addr.clone(),
                source,
            })?;
        let local = listener.local_addr()?;
        let _ = self.bound.set(local);

        let service = InterceptedService::new(
            TodoServiceServer::new(handler)
                .accept_compressed(CompressionEncoding::Zstd)
                .send_compressed(CompressionEncoding::Zstd),
            self.gate.clone(),
        );

        let (tx, rx) = oneshot::channel::<()>();
        let incoming = TcpListenerStream::new(listener);
        let reporter = self.reporter.clone();
        self.task = Some(tokio::spawn(async move {
            Server::builder()
                .add_service(service)
                .serve_with_incoming_shutdown(incoming, async {
                    let _ = rx.await;
                })
                .await
                .inspect_err(|e| {
                    error!(error = %e, "RPC listener failed");
                    if let Some(reporter) = &reporter {
                        reporter.report(e);
                    }
                })
        }));
        self.shutdown = Some(tx);

        info!(addr = %local, "RPC listener accepting calls");
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            // Waits for in-flight calls; the lifecycle bounds how long
            task.await??;
        }
        Ok(())
    }

    fn attach_exit_reporter(&mut self, reporter: ExitReporter) {
        self.reporter = Some(reporter);
    }
}
