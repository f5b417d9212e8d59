//! DuckDB adapter implementation

use crate::connection::ConnectionScope;
use crate::error::{DbError, DbResult};
use crate::table::{Datum, ResultTable};
use crate::traits::{Adapter, AdapterResponse, Column};
use async_trait::async_trait;
use duckdb::Connection;
use rc_core::sql_utils::escape_sql_string;
use rc_core::{DatabaseConfig, Policy, Relation, RelationDefaults, RelationStyle, RelationType};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    config: DatabaseConfig,
    quote_policy: Policy,
    active: Mutex<Option<String>>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        Self::from_config(&DatabaseConfig::in_memory())
    }

    /// Open the database described by a connection config.
    ///
    /// Without a configured database name, the catalog name of the opened
    /// database (`memory`, or the file stem) is used.
    pub fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let conn = if config.path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(&config.path))
        }
        .map_err(|e| DbError::ConnectionError(format!("{}: {}", config.path, e)))?;

        let mut config = config.clone();
        if config.name.is_none() {
            let catalog: String =
                conn.query_row("SELECT current_database()", [], |row| row.get(0))?;
            config.name = Some(catalog);
        }

        Ok(Self {
            conn: Mutex::new(conn),
            config,
            quote_policy: Policy::default(),
            active: Mutex::new(None),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        Self::from_config(&DatabaseConfig {
            path: path.to_string(),
            ..DatabaseConfig::default()
        })
    }

    /// Override the default quote policy applied to relations
    pub fn with_quote_policy(mut self, policy: Policy) -> Self {
        self.quote_policy = policy;
        self
    }

    /// Connection configuration this backend was opened with
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Label of the currently held named connection, if any
    pub fn active_connection(&self) -> Option<String> {
        self.active.lock().ok().and_then(|a| a.clone())
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn log_sql(&self, sql: &str) {
        let label = self
            .active_connection()
            .unwrap_or_else(|| "<unnamed>".to_string());
        log::debug!("[{}] {}", label, sql);
    }

    fn claim(&self, name: &str) -> DbResult<()> {
        let mut active = self
            .active
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        if let Some(held) = active.as_ref() {
            return Err(DbError::ConnectionInUse {
                held: held.clone(),
                requested: name.to_string(),
            });
        }
        *active = Some(name.to_string());
        Ok(())
    }

    /// Free the active label, first switching back to `restore_schema`
    fn release(&self, restore_schema: Option<String>) {
        if let Some(schema) = restore_schema {
            let sql = format!("SET schema = '{}'", escape_sql_string(&schema));
            if let Err(e) = self.execute_batch_sync(&sql) {
                log::warn!("Failed to restore schema '{}': {}", schema, e);
            }
        }
        match self.active.lock() {
            Ok(mut active) => *active = None,
            Err(e) => log::warn!("Failed to release connection: {}", e),
        }
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        self.log_sql(sql);
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        self.log_sql(sql);
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Run a query and collect every row.
    ///
    /// DuckDB panics on `stmt.column_count()` before execution, so rows are
    /// collected first and column metadata read afterwards.
    fn fetch_sync(&self, sql: &str) -> DbResult<ResultTable> {
        self.log_sql(sql);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;

        let rows: Vec<Vec<Datum>> = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count)
                    .map(|i| row.get::<_, duckdb::types::Value>(i).map(Datum::from))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let column_count = stmt.column_count();
        let columns: Vec<String> = (0..column_count)
            .map(|i| {
                stmt.column_name(i)
                    .map_or("?".to_string(), |v| v.to_string())
            })
            .collect();

        Ok(ResultTable::new(columns, rows))
    }

    fn current_schema_sync(&self) -> DbResult<String> {
        let conn = self.lock()?;
        let schema: String = conn.query_row("SELECT current_schema()", [], |row| row.get(0))?;
        Ok(schema)
    }

    /// Query count synchronously
    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let wrapped = format!("SELECT COUNT(*) FROM ({})", sql);
        self.log_sql(&wrapped);
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&wrapped, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, relation: &Relation) -> DbResult<bool> {
        let Some(identifier) = relation.identifier() else {
            return Ok(false);
        };
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE {} AND {}",
            self.schema_filter(relation),
            name_predicate("table_name", identifier, relation.quote_policy().identifier)
        );
        self.log_sql(&sql);
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// `information_schema` predicate selecting the relation's catalog and schema.
    ///
    /// A database part that is excluded from rendering resolves against the
    /// session's current database, and an absent schema against the
    /// session's current schema.
    fn schema_filter(&self, relation: &Relation) -> String {
        let quote = relation.quote_policy();
        let catalog = match relation.database() {
            Some(db) if relation.include_policy().database => {
                name_predicate("table_catalog", db, quote.database)
            }
            _ => "table_catalog = current_database()".to_string(),
        };
        let schema = match relation.schema() {
            Some(s) => name_predicate("table_schema", s, quote.schema),
            None => "table_schema = current_schema()".to_string(),
        };
        format!("{} AND {}", catalog, schema)
    }

    /// Execute multiple SQL statements
    pub async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    /// Create table from SELECT statement
    pub async fn create_table_as(&self, name: &str, select: &str, replace: bool) -> DbResult<()> {
        let sql = if replace {
            format!("CREATE OR REPLACE TABLE {} AS {}", name, select)
        } else {
            format!("CREATE TABLE {} AS {}", name, select)
        };
        self.execute_sync(&sql)?;
        Ok(())
    }

    /// Create view from SELECT statement
    pub async fn create_view_as(&self, name: &str, select: &str, replace: bool) -> DbResult<()> {
        let sql = if replace {
            format!("CREATE OR REPLACE VIEW {} AS {}", name, select)
        } else {
            format!("CREATE VIEW {} AS {}", name, select)
        };
        self.execute_sync(&sql)?;
        Ok(())
    }

    /// Check if a table or view exists
    pub async fn relation_exists(&self, relation: &Relation) -> DbResult<bool> {
        self.relation_exists_sync(relation)
    }

    /// Execute query returning its row count
    pub async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    /// Load CSV file into table
    pub async fn load_csv(&self, table: &str, path: &str) -> DbResult<()> {
        let sql = format!(
            "CREATE OR REPLACE TABLE {} AS SELECT * FROM read_csv_auto('{}')",
            table,
            escape_sql_string(path)
        );
        self.execute_sync(&sql)
            .map_err(|e| DbError::CsvError(format!("{}: {}", path, e)))?;
        Ok(())
    }

    /// Drop a table or view if it exists
    pub async fn drop_if_exists(&self, name: &str) -> DbResult<()> {
        // DuckDB refuses DROP VIEW on a table and vice versa, so the
        // mismatching statement is expected to fail.
        let _ = self.execute_sync(&format!("DROP VIEW IF EXISTS {}", name));
        let _ = self.execute_sync(&format!("DROP TABLE IF EXISTS {}", name));
        Ok(())
    }

    /// Create a schema if it does not exist
    pub async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", schema);
        self.execute_sync(&sql)?;
        Ok(())
    }
}

/// Map an `information_schema.tables.table_type` value to a relation type
fn relation_type_from_table_type(table_type: &str) -> RelationType {
    match table_type {
        "BASE TABLE" | "LOCAL TEMPORARY" => RelationType::Table,
        "VIEW" => RelationType::View,
        _ => RelationType::External,
    }
}

/// Catalog predicate for one name part. Unquoted parts compare
/// case-insensitively, the way DuckDB resolves unquoted identifiers.
fn name_predicate(column: &str, value: &str, quoted: bool) -> String {
    if quoted {
        format!("{} = '{}'", column, escape_sql_string(value))
    } else {
        format!("lower({}) = lower('{}')", column, escape_sql_string(value))
    }
}

fn text_cell(row: &[Datum], index: usize) -> Option<String> {
    row.get(index).and_then(Datum::as_str).map(String::from)
}

#[async_trait]
impl Adapter for DuckDbBackend {
    fn adapter_type(&self) -> &'static str {
        "duckdb"
    }

    fn relation_defaults(&self) -> RelationDefaults {
        self.config.relation_defaults()
    }

    fn relation_style(&self) -> RelationStyle {
        RelationStyle {
            quote_character: '"',
            quote_policy: self.quote_policy,
            include_policy: Policy::default(),
        }
    }

    fn connection_named(&self, name: &str) -> DbResult<ConnectionScope<'_>> {
        self.claim(name)?;
        let Some(schema) = &self.config.schema else {
            return Ok(ConnectionScope::new(name, move || self.release(None)));
        };

        let previous = match self.current_schema_sync() {
            Ok(previous) => previous,
            Err(e) => {
                self.release(None);
                return Err(e);
            }
        };
        let scope = ConnectionScope::new(name, move || self.release(Some(previous)));
        self.execute_batch_sync(&format!(
            "SET schema = '{}'",
            escape_sql_string(schema)
        ))?;
        Ok(scope)
    }

    async fn list_relations_without_caching(&self, schema: &Relation) -> DbResult<Vec<Relation>> {
        let sql = format!(
            "SELECT table_catalog, table_schema, table_name, table_type \
             FROM information_schema.tables WHERE {} ORDER BY table_name",
            self.schema_filter(schema)
        );
        let table = self.fetch_sync(&sql)?;
        let style = self.relation_style();

        Ok(table
            .rows
            .iter()
            .map(|row| {
                let relation_type = text_cell(row, 3)
                    .map(|t| relation_type_from_table_type(&t))
                    .unwrap_or(RelationType::External);
                Relation::new(
                    text_cell(row, 0),
                    text_cell(row, 1),
                    text_cell(row, 2),
                    &style,
                )
                .with_type(relation_type)
            })
            .collect())
    }

    async fn get_columns_in_relation(&self, relation: &Relation) -> DbResult<Vec<Column>> {
        let identifier = relation
            .identifier()
            .ok_or_else(|| DbError::TableNotFound(relation.render()))?;
        let sql = format!(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE {} AND {} ORDER BY ordinal_position",
            self.schema_filter(relation),
            name_predicate("table_name", identifier, relation.quote_policy().identifier)
        );
        let table = self.fetch_sync(&sql)?;
        if table.is_empty() {
            return Err(DbError::TableNotFound(relation.render()));
        }

        Ok(table
            .rows
            .iter()
            .filter_map(|row| {
                Some(Column {
                    name: text_cell(row, 0)?,
                    data_type: text_cell(row, 1).unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn execute(&self, sql: &str, fetch: bool) -> DbResult<(AdapterResponse, ResultTable)> {
        if fetch {
            let table = self.fetch_sync(sql)?;
            let response = AdapterResponse {
                rows_affected: table.len(),
            };
            Ok((response, table))
        } else {
            let rows_affected = self.execute_sync(sql)?;
            Ok((AdapterResponse { rows_affected }, ResultTable::default()))
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
