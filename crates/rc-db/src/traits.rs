//! Adapter trait definition

use crate::connection::ConnectionScope;
use crate::error::DbResult;
use crate::table::ResultTable;
use async_trait::async_trait;
use rc_core::sql_utils::quote_with;
use rc_core::{Relation, RelationDefaults, RelationStyle};

/// A column of a relation, as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
}

/// Execution metadata returned alongside a result table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterResponse {
    /// Rows affected by a statement, or rows fetched by a query
    pub rows_affected: usize,
}

/// Backend contract the relation checks are written against.
///
/// Implementations must be Send + Sync for async operation. Every check
/// receives the adapter explicitly.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Backend type identifier for logging
    fn adapter_type(&self) -> &'static str;

    /// Default database and schema from the connection credentials
    fn relation_defaults(&self) -> RelationDefaults;

    /// Quote character and default policies for relations of this backend
    fn relation_style(&self) -> RelationStyle;

    /// Quote an identifier the way this backend does
    fn quote(&self, identifier: &str) -> String {
        quote_with(self.relation_style().quote_character, identifier)
    }

    /// Acquire a named connection, released when the scope drops
    fn connection_named(&self, name: &str) -> DbResult<ConnectionScope<'_>>;

    /// List relations in a schema-level relation, bypassing any cache
    async fn list_relations_without_caching(&self, schema: &Relation) -> DbResult<Vec<Relation>>;

    /// Columns of a relation in ordinal order
    async fn get_columns_in_relation(&self, relation: &Relation) -> DbResult<Vec<Column>>;

    /// SQL returning one row of (row count difference, mismatched rows)
    /// between two relations over the given columns
    fn get_rows_different_sql(
        &self,
        basis: &Relation,
        compare: &Relation,
        column_names: &[String],
    ) -> String {
        rows_different_sql(basis, compare, column_names, |c| self.quote(c))
    }

    /// Execute SQL, fetching the result rows when `fetch` is set
    async fn execute(&self, sql: &str, fetch: bool) -> DbResult<(AdapterResponse, ResultTable)>;
}

/// Build the standard "rows different" comparison query.
///
/// The result is a single row with two columns: `row_count_difference`
/// (rows in `basis` minus rows in `compare`) and `num_mismatched` (rows
/// present on one side but not the other, compared as sets).
pub fn rows_different_sql<Q>(
    basis: &Relation,
    compare: &Relation,
    column_names: &[String],
    quote: Q,
) -> String
where
    Q: Fn(&str) -> String,
{
    let columns = if column_names.is_empty() {
        "*".to_string()
    } else {
        column_names
            .iter()
            .map(|c| quote(c))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "WITH diff_count AS (
    SELECT 1 AS id, COUNT(*) AS num_missing FROM (
        (SELECT {columns} FROM {basis} EXCEPT SELECT {columns} FROM {compare})
        UNION ALL
        (SELECT {columns} FROM {compare} EXCEPT SELECT {columns} FROM {basis})
    ) AS a
), table_a AS (
    SELECT COUNT(*) AS num_rows FROM {basis}
), table_b AS (
    SELECT COUNT(*) AS num_rows FROM {compare}
), row_count_diff AS (
    SELECT 1 AS id, table_a.num_rows - table_b.num_rows AS difference
    FROM table_a, table_b
)
SELECT
    row_count_diff.difference AS row_count_difference,
    diff_count.num_missing AS num_mismatched
FROM row_count_diff
JOIN diff_count USING (id)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::sql_utils::quote_ident;

    fn rel(schema: &str, name: &str) -> Relation {
        Relation::new(
            None,
            Some(schema.to_string()),
            Some(name.to_string()),
            &RelationStyle::default(),
        )
    }

    #[test]
    fn test_rows_different_sql_references_both_relations() {
        let sql = rows_different_sql(
            &rel("main", "base"),
            &rel("main", "table_model"),
            &["id".to_string(), "name".to_string()],
            quote_ident,
        );

        assert!(sql.contains(r#"SELECT "id", "name" FROM "main"."base" EXCEPT"#));
        assert!(sql.contains(r#"FROM "main"."table_model" EXCEPT SELECT"#));
        assert!(sql.contains("AS row_count_difference"));
        assert!(sql.contains("AS num_mismatched"));
    }

    #[test]
    fn test_rows_different_sql_without_columns_selects_star() {
        let sql = rows_different_sql(&rel("s", "a"), &rel("s", "b"), &[], quote_ident);
        assert!(sql.contains(r#"SELECT * FROM "s"."a" EXCEPT SELECT * FROM "s"."b""#));
    }
}
