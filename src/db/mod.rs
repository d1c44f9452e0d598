//! Database module: pooled store access and the access table.
//!
//! Layout:
//! - `pool.rs`: connection pool construction and the shared handle
//! - `schema.rs`: SQL text for the access table
//! - `models.rs`: Rust structs mirroring table rows
//! - `access.rs`: table creation, counting and population

pub mod access;
pub mod models;
pub mod pool;
pub mod schema;

pub use access::AccessTable;
pub use models::AccessRecord;
pub use pool::{ConnectionHandle, ConnectionManager, PoolLimits};
pub use schema::ACCESS_TABLE;
