//! Error types for rc-check

use rc_core::{CoreError, RelationType};
use rc_db::DbError;
use thiserror::Error;

/// Relation check errors
#[derive(Error, Debug)]
pub enum CheckError {
    /// C001: The check was called with too few relations
    #[error("[C001] Not enough relations to compare: need at least 2, got {0}")]
    NotEnoughRelations(usize),

    /// C002: A relation was materialized as a different kind
    #[error("[C002] Got an unexpected relation type of {observed} for relation {name}, expected {expected}")]
    RelationTypeMismatch {
        name: String,
        observed: String,
        expected: RelationType,
    },

    /// C003: The rows-different query returned the wrong number of rows
    #[error("[C003] Invalid sql query from get_rows_different_sql: incorrect number of rows ({0})")]
    InvalidRowCount(usize),

    /// C004: The rows-different query returned the wrong number of columns
    #[error("[C004] Invalid sql query from get_rows_different_sql: incorrect number of cols ({0})")]
    InvalidColumnCount(usize),

    /// C005: Row counts differ
    #[error("[C005] Got {difference} difference in row count between {basis} and {relation}")]
    RowCountDifference {
        difference: i64,
        basis: String,
        relation: String,
    },

    /// C006: Row contents differ
    #[error("[C006] Got {count} different rows between {basis} and {relation}")]
    RowsMismatched {
        count: i64,
        basis: String,
        relation: String,
    },

    /// C007: A rows-different result cell is not a whole number
    #[error("[C007] Unexpected {column} value from get_rows_different_sql: {value}")]
    UnexpectedValue { column: &'static str, value: String },

    /// Relation name could not be reconstructed
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Adapter failure, propagated unchanged
    #[error(transparent)]
    Db(#[from] DbError),
}

impl CheckError {
    /// True when the check was misused rather than an expectation failing
    pub fn is_processing_error(&self) -> bool {
        matches!(self, CheckError::NotEnoughRelations(_))
    }

    /// True when the database state did not match the expectation
    pub fn is_assertion_failure(&self) -> bool {
        matches!(
            self,
            CheckError::RelationTypeMismatch { .. }
                | CheckError::InvalidRowCount(_)
                | CheckError::InvalidColumnCount(_)
                | CheckError::RowCountDifference { .. }
                | CheckError::RowsMismatched { .. }
                | CheckError::UnexpectedValue { .. }
        )
    }
}

/// Result type alias for CheckError
pub type CheckResult<T> = Result<T, CheckError>;
