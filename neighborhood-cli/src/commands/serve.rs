//! HTTP server command
//!
//! Connects to the database, prepares the gateway, and serves until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use neighborhood_server::db::schema;
use neighborhood_server::{run_server, Gateway, ServerConfig};

use super::{connect, DbArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Create the house and tree tables before serving if they are missing
    #[arg(long)]
    pub init_schema: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let pool = connect(&args.db).await?;

    if args.init_schema {
        if let Err(err) = schema::apply(&pool).await {
            pool.close().await;
            return Err(err).context("Failed to apply schema");
        }
        tracing::info!("schema applied");
    }

    // Gateway::new closes the pool itself when preparation fails.

    let gateway = Gateway::new(pool)
        .await
        .context("Failed to initialize gateway")?;

    let config = ServerConfig {
        bind_addr: args.bind,
    };

    // Run server (blocks until shutdown)
    run_server(gateway, config).await.context("Server error")?;

    Ok(())
}
