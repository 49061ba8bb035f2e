//! `GET /` answers as long as the process is serving; the store is not
//! consulted.

use axum::{routing::get, Json, Router};
use serde::Serialize;

pub const STATUS: &str = "so healthy right now!";

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

async fn report_health() -> Json<HealthReport> {
    Json(HealthReport {
        status: STATUS,
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(report_health))
}
