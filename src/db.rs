use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Connects the pool, retrying while the database is still starting up,
/// then applies the embedded migrations.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let options = cfg.connect_options()?;
    let attempts = cfg.connect_retries.max(1);

    let mut attempt = 1;
    let db = loop {
        let res = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .idle_timeout(cfg.idle_timeout())
            .max_lifetime(cfg.max_lifetime())
            .acquire_timeout(cfg.acquire_timeout())
            .connect_with(options.clone())
            .await;

        match res {
            Ok(db) => break db,
            Err(e) if attempt < attempts => {
                warn!(error = %e, attempt, attempts, "database connect failed; retrying");
                tokio::time::sleep(cfg.retry_interval()).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("connect to database after {attempts} attempts"));
            }
        }
    };
    info!(database = %cfg.redacted(), "connected to database");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;

    Ok(db)
}
