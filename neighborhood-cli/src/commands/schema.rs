//! Schema command: create the house and tree tables

use anyhow::{Context, Result};
use clap::Parser;
use neighborhood_server::db::schema;

use super::{connect, DbArgs};

/// Arguments for the schema command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

pub async fn run_schema(args: SchemaArgs) -> Result<()> {
    let pool = connect(&args.db).await?;

    let applied = schema::apply(&pool).await.context("Failed to apply schema");
    pool.close().await;
    applied?;

    tracing::info!("schema is up to date");
    Ok(())
}
