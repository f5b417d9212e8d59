//! rc-db - Adapter layer for relcheck
//!
//! This crate provides the `Adapter` trait the relation checks are written
//! against, the result-table types returned by queries, and a DuckDB
//! implementation.

pub mod connection;
pub mod duckdb;
pub mod error;
pub mod table;
pub mod traits;

pub use connection::ConnectionScope;
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use table::{Datum, ResultTable};
pub use traits::{rows_different_sql, Adapter, AdapterResponse, Column};
