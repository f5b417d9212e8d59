//! rc-core - Core library for relcheck
//!
//! This crate provides the relation identifier model, the reconstruction of
//! quote-aware relations from dotted names, SQL quoting helpers, and
//! configuration parsing shared by the other relcheck crates.

pub mod config;
pub mod error;
pub mod relation;
pub(crate) mod serde_helpers;
pub mod sql_utils;

pub use config::{Config, DatabaseConfig, DbType};
pub use error::{CoreError, CoreResult};
pub use relation::{
    Policy, Relation, RelationComponent, RelationDefaults, RelationPart, RelationStyle,
    RelationType,
};
