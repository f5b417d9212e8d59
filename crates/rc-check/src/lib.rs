//! rc-check - Relation checks for relcheck
//!
//! This crate reconstructs relations from the plain names used in test
//! expectations and checks materialized relations against them: their kind
//! (table or view) and their row-for-row content.

pub mod checks;
pub mod error;

pub use checks::{
    check_relation_types, check_relations_equal, check_rows_different_result, relation_from_name,
};
pub use error::{CheckError, CheckResult};
