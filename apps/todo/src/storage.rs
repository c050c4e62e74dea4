use database::common::ProbeSchedule;
use database::postgres::{self, DatabaseConnection, PostgresConfig};
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::lifecycle::{Hook, Lifecycle};

pub const STORAGE_COMPONENT: &str = "postgres";

/// Open the store, wait until it answers, and register its close hook.
pub async fn connect(
    config: PostgresConfig,
    schedule: ProbeSchedule,
    lifecycle: &mut Lifecycle,
) -> ServerResult<DatabaseConnection> {
    let db = postgres::connect_lazy(config)
        .await
        .map_err(database::DatabaseError::from)?;
    provide(db, schedule, lifecycle).await
}

/// Probe an already opened handle; on success it is owned by `lifecycle`.
///
/// Nothing is registered when the store never becomes reachable.
pub async fn provide(
    db: DatabaseConnection,
    schedule: ProbeSchedule,
    lifecycle: &mut Lifecycle,
) -> ServerResult<DatabaseConnection> {
    postgres::wait_until_ready(&db, schedule).await?;

    let handle = db.clone();
    lifecycle
        .register(Hook::new(STORAGE_COMPONENT).on_stop(move || async move {
            postgres::close(handle, STORAGE_COMPONENT)
                .await
                .map_err(eyre::Report::from)
        }))
        .map_err(|e| ServerError::Lifecycle(e.to_string()))?;

    info!("Storage ready");
    Ok(db)
}
