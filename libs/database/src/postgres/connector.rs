use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::{error, info, instrument};

use super::{PostgresConfig, check_health};
use crate::common::{DatabaseError, DatabaseResult, ProbeSchedule, retry_until_deadline};

/// Build a lazily connected pool. Nothing touches the network until the first statement.
pub async fn connect_lazy(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    info!(host = %config.host, port = config.port, database = %config.database, "Opening PostgreSQL pool");
    Database::connect(config.into_connect_options()).await
}

/// Probe `db` until it answers or the schedule runs out.
///
/// Fails with [`DatabaseError::StorageUnavailable`] carrying the last probe error.
#[instrument(skip(db), fields(interval = ?schedule.interval, timeout = ?schedule.timeout))]
pub async fn wait_until_ready(db: &DatabaseConnection, schedule: ProbeSchedule) -> DatabaseResult<()> {
    retry_until_deadline(|| check_health(db), schedule)
        .await
        .map_err(|exceeded| DatabaseError::StorageUnavailable {
            attempts: exceeded.attempts,
            waited: exceeded.waited,
            last_error: exceeded
                .last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "probe did not complete".to_string()),
        })
}

/// Connect lazily, then block until the store is reachable.
///
/// # Example
/// ```ignore
/// use database::common::ProbeSchedule;
/// use database::postgres::{PostgresConfig, connect_when_ready};
///
/// let db = connect_when_ready(PostgresConfig::from_env()?, ProbeSchedule::default()).await?;
/// ```
pub async fn connect_when_ready(
    config: PostgresConfig,
    schedule: ProbeSchedule,
) -> DatabaseResult<DatabaseConnection> {
    let db = connect_lazy(config).await?;
    wait_until_ready(&db, schedule).await?;
    info!("PostgreSQL is reachable");
    Ok(db)
}

/// Close the pool, logging the outcome under `name`.
pub async fn close(db: DatabaseConnection, name: &str) -> DatabaseResult<()> {
    match db.close().await {
        Ok(()) => {
            info!("PostgreSQL connection '{}' closed successfully", name);
            Ok(())
        }
        Err(e) => {
            error!("Error closing PostgreSQL connection '{}': {}", name, e);
            Err(e.into())
        }
    }
}
