use database::postgres::DatabaseConnection;
use domain_todo::{PgTaskRepository, TaskService};
use eyre::{Result, WrapErr};
use grpc_client::BearerAuth;
use tracing::info;

use crate::config::AppConfig;
use crate::gateway::HttpGateway;
use crate::lifecycle::Lifecycle;
use crate::listener::RpcListener;
use crate::service::TodoServiceImpl;
use crate::storage;

/// Register the RPC listener and HTTP gateway on top of an open store.
pub fn assemble(config: &AppConfig, db: DatabaseConnection, lifecycle: &mut Lifecycle) -> Result<()> {
    let handler = TodoServiceImpl::new(TaskService::new(PgTaskRepository::new(db)));

    let listener = RpcListener::new(
        config.grpc.address(),
        handler,
        BearerAuth::new(config.auth_token.expose()),
    );
    let gateway = HttpGateway::new(config.http.address(), listener.local_addr());

    lifecycle.register(listener)?;
    lifecycle.register(gateway)?;
    Ok(())
}

/// Run the server until SIGINT/SIGTERM.
///
/// Startup order: storage, RPC listener, HTTP gateway. Shutdown runs in reverse.
pub async fn run(config: AppConfig) -> Result<()> {
    let mut lifecycle = Lifecycle::new(config.shutdown_timeout);

    info!(
        grpc = %config.grpc.address(),
        http = %config.http.address(),
        "Starting todo server"
    );

    let db = storage::connect(config.database.clone(), config.probe, &mut lifecycle)
        .await
        .wrap_err("Failed to connect to PostgreSQL")?;

    assemble(&config, db, &mut lifecycle)?;

    lifecycle
        .run_until(axum_helpers::shutdown_signal())
        .await
        .wrap_err("Todo server failed")?;

    info!("Todo server stopped");
    Ok(())
}
