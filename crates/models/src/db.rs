use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::{error, info};

/// Connect with explicit pool settings from `configs`.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    // an in-memory SQLite database lives only as long as its connection
    if !cfg.is_sqlite() {
        opt.idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs));
    }

    match Database::connect(opt).await {
        Ok(db) => {
            info!(event = "db_connected", backend = ?db.get_database_backend(), "database connection established");
            Ok(db)
        }
        Err(e) => {
            error!(event = "db_connect_failed", error = %e, "database connection failed");
            Err(e.into())
        }
    }
}
