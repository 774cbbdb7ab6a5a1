//! salon-db - Database session layer for the salon backend
//!
//! This crate provides the `Session` trait the migration engine talks to,
//! and its DuckDB implementation. A DuckDB schema plays the role of the
//! keyspace.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbSession;
pub use error::{DbError, DbResult};
pub use traits::Session;
