//! Subcommand implementations

pub mod schema;
pub mod serve;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use neighborhood_server::db::{create_lazy_pool, wait_until_ready, DbSettings, ReadinessPolicy};
use sqlx::PgPool;

pub use schema::{run_schema, SchemaArgs};
pub use serve::{run_serve, ServeArgs};

/// Database connection arguments shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Database host, optionally with :port
    #[arg(long, env = "DB_HOST")]
    pub db_host: String,

    /// Database name (empty uses the server default)
    #[arg(long, env = "DB_NAME", default_value = "")]
    pub db_name: String,

    /// Milliseconds between startup connectivity checks
    #[arg(long, env = "DB_CONNECT_INTERVAL_MS", default_value_t = 200)]
    pub connect_interval_ms: u64,

    /// Connectivity checks before giving up
    #[arg(
        long,
        env = "DB_CONNECT_ATTEMPTS",
        default_value_t = 150,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub connect_attempts: u32,

    /// Milliseconds a single connectivity check may take
    #[arg(long, env = "DB_CONNECT_TIMEOUT_MS", default_value_t = 200)]
    pub connect_timeout_ms: u64,
}

impl DbArgs {
    pub fn settings(&self) -> DbSettings {
        DbSettings {
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            host: self.db_host.clone(),
            name: self.db_name.clone(),
        }
    }

    pub fn readiness(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            interval: Duration::from_millis(self.connect_interval_ms),
            max_attempts: self.connect_attempts,
            attempt_timeout: Duration::from_millis(self.connect_timeout_ms),
        }
    }
}

/// Open the pool and block until the database answers.
pub async fn connect(db: &DbArgs) -> Result<PgPool> {
    let pool = create_lazy_pool(&db.settings());
    tracing::info!(host = %db.db_host, database = %db.db_name, "waiting for database");

    let attempts = wait_until_ready(&pool, db.readiness())
        .await
        .context("Failed to reach database")?;

    tracing::info!(attempts, "database ready");
    Ok(pool)
}
