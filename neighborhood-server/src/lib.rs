//! neighborhood-server: houses, the trees planted at them, and storms
//!
//! Layers, leaves first:
//! - [`models`]: entity records and validated client input
//! - [`db`]: the persistence [`Gateway`] and schema bootstrap
//! - [`http`]: axum routes translating requests into gateway calls

pub mod db;
pub mod http;
pub mod models;

pub use db::{Gateway, GatewayError};
pub use http::{run_server, ServerConfig};
