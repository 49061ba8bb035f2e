//! Database layer - connection pool, schema, and the persistence gateway
//!
//! # Design Principles
//!
//! - One pool per process, owned by the [`Gateway`]
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-step operations

pub mod error;
pub mod gateway;
pub mod pool;
pub mod schema;

pub use error::{ErrorKind, GatewayError};
pub use gateway::{pick_uniform, Gateway, Query};
pub use pool::{create_lazy_pool, wait_until_ready, DbSettings, NotReady, ReadinessPolicy};
