//! End-to-end checks against a seeded and built DuckDB project
//!
//! Each test writes a relcheck.yml and a seed CSV into a temp directory,
//! loads the seed, materializes a handful of models, and then uses the
//! relation checks the way an adapter test suite would.

use rc_check::{check_relation_types, check_relations_equal, relation_from_name, CheckError};
use rc_core::{Config, RelationType};
use rc_db::{Adapter, DuckDbBackend};
use std::path::PathBuf;
use tempfile::TempDir;

const SCHEMA: &str = "test_schema";

const SEED_BASE_CSV: &str = "id,name,some_date
1,Easton,1981-05-20T06:46:51
2,Lillian,1978-09-03T18:10:33
3,Jeremiah,1982-03-11T03:59:51
4,Nolan,1976-05-06T20:21:35
5,Hannah,1982-06-23T05:41:26
6,Eleanor,1991-08-10T23:12:21
7,Lily,1971-03-29T14:58:02
8,Jonathan,1988-02-26T02:55:24
9,Adrian,1994-02-09T13:14:23
10,Nora,1976-03-01T16:51:39
";

/// A model in the test project and how it is materialized
struct Model {
    name: &'static str,
    materialized: Materialized,
}

enum Materialized {
    View,
    Table,
    /// Taken from the `materialized_var` config variable, default table
    FromVar,
}

const MODELS: &[Model] = &[
    Model {
        name: "view_model",
        materialized: Materialized::View,
    },
    Model {
        name: "table_model",
        materialized: Materialized::Table,
    },
    Model {
        name: "swappable",
        materialized: Materialized::FromVar,
    },
];

struct TestProject {
    dir: TempDir,
    config: Config,
    adapter: DuckDbBackend,
}

impl TestProject {
    async fn setup() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("seeds")).unwrap();
        std::fs::write(dir.path().join("seeds").join("base.csv"), SEED_BASE_CSV).unwrap();
        write_config(&dir, None);

        let config = Config::load_from_dir(dir.path()).unwrap();
        let adapter = DuckDbBackend::from_config(&config.get_database_config(None).unwrap())
            .unwrap();
        adapter.create_schema_if_not_exists(SCHEMA).await.unwrap();

        Self {
            dir,
            config,
            adapter,
        }
    }

    fn seed_path(&self) -> PathBuf {
        self.dir.path().join("seeds").join("base.csv")
    }

    /// Load every seed, returning how many were loaded
    async fn seed(&self) -> usize {
        let path = self.seed_path();
        self.adapter
            .load_csv(&format!("{SCHEMA}.base"), path.to_str().unwrap())
            .await
            .unwrap();
        1
    }

    /// Materialize every model, returning how many were built
    async fn run(&self) -> usize {
        let _conn = self.adapter.connection_named("_build").unwrap();
        for model in MODELS {
            let target = format!("{SCHEMA}.{}", model.name);
            let select = format!("SELECT * FROM {SCHEMA}.base");
            let as_view = match model.materialized {
                Materialized::View => true,
                Materialized::Table => false,
                Materialized::FromVar => {
                    self.config.get_var_str(None, "materialized_var").as_deref() == Some("view")
                }
            };

            self.adapter.drop_if_exists(&target).await.unwrap();
            if as_view {
                self.adapter.create_view_as(&target, &select, false).await.unwrap();
            } else {
                self.adapter.create_table_as(&target, &select, false).await.unwrap();
            }
        }
        MODELS.len()
    }

    fn update_materialized_var(&mut self, value: &str) {
        write_config(&self.dir, Some(value));
        self.config = Config::load_from_dir(self.dir.path()).unwrap();
    }

    async fn count_rows(&self, name: &str) -> i64 {
        let relation = relation_from_name(&self.adapter, name).unwrap();
        let _conn = self.adapter.connection_named("_count").unwrap();
        let (_, table) = self
            .adapter
            .execute(&format!("SELECT COUNT(*) AS num_rows FROM {relation}"), true)
            .await
            .unwrap();
        table.rows[0][0].as_i64().unwrap()
    }
}

fn write_config(dir: &TempDir, materialized_var: Option<&str>) {
    let db_path = dir.path().join("warehouse.duckdb");
    let mut yaml = format!(
        "database:\n  type: duckdb\n  path: \"{}\"\n  schema: {SCHEMA}\n",
        db_path.display()
    );
    if let Some(value) = materialized_var {
        yaml.push_str(&format!("vars:\n  materialized_var: {value}\n"));
    }
    std::fs::write(dir.path().join("relcheck.yml"), yaml).unwrap();
}

async fn built_project() -> TestProject {
    let project = TestProject::setup().await;
    assert_eq!(project.seed().await, 1);
    assert_eq!(project.run().await, 3);
    project
}

#[tokio::test]
async fn test_base() {
    let mut project = built_project().await;

    check_relations_equal(
        &project.adapter,
        &["base", "view_model", "table_model", "swappable"],
    )
    .await
    .unwrap();

    assert_eq!(project.count_rows("base").await, 10);

    check_relation_types(
        &project.adapter,
        &[
            ("base", RelationType::Table),
            ("view_model", RelationType::View),
            ("table_model", RelationType::Table),
            ("swappable", RelationType::Table),
        ],
    )
    .await
    .unwrap();

    // "swappable" becomes a view once the variable changes
    project.update_materialized_var("view");
    assert_eq!(project.run().await, 3);

    check_relation_types(
        &project.adapter,
        &[
            ("base", RelationType::Table),
            ("view_model", RelationType::View),
            ("table_model", RelationType::Table),
            ("swappable", RelationType::View),
        ],
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_schema_qualified_and_quoted_names() {
    let project = built_project().await;

    check_relations_equal(
        &project.adapter,
        &[
            "test_schema.base",
            r#""test_schema"."table_model""#,
            r#"test_schema."view_model""#,
            "TEST_SCHEMA.Table_Model",
        ],
    )
    .await
    .unwrap();
    assert_eq!(project.count_rows(r#""test_schema"."base""#).await, 10);
}

#[tokio::test]
async fn test_extra_row_is_detected() {
    let project = built_project().await;
    project
        .adapter
        .execute_batch(&format!(
            "INSERT INTO {SCHEMA}.table_model VALUES (11, 'Extra', TIMESTAMP '2000-01-01 00:00:00')"
        ))
        .await
        .unwrap();

    let err = check_relations_equal(&project.adapter, &["base", "view_model", "table_model"])
        .await
        .unwrap_err();
    match err {
        CheckError::RowCountDifference {
            difference,
            relation,
            ..
        } => {
            assert_eq!(difference, -1);
            assert_eq!(relation, "table_model");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_stale_type_expectation_fails() {
    let mut project = built_project().await;
    project.update_materialized_var("view");
    project.run().await;

    let err = check_relation_types(&project.adapter, &[("swappable", RelationType::Table)])
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unexpected relation type of view"));
    assert!(msg.contains("expected table"));
}

#[tokio::test]
async fn test_single_relation_is_rejected_before_querying() {
    let project = TestProject::setup().await;

    // Nothing has been seeded, so any query would fail
    let err = check_relations_equal(&project.adapter, &["base"])
        .await
        .unwrap_err();
    assert!(err.is_processing_error());
}

#[tokio::test]
async fn test_unbuilt_model_type_is_not_checked() {
    let project = TestProject::setup().await;
    project.seed().await;

    check_relation_types(
        &project.adapter,
        &[("base", RelationType::Table), ("view_model", RelationType::View)],
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_connections_released_between_checks() {
    let project = built_project().await;

    check_relations_equal(&project.adapter, &["base", "table_model"])
        .await
        .unwrap();
    check_relation_types(&project.adapter, &[("table_model", RelationType::Table)])
        .await
        .unwrap();

    assert_eq!(project.adapter.active_connection(), None);

    // Defaulted database part is the file's catalog name
    let base = relation_from_name(&project.adapter, "base").unwrap();
    assert_eq!(base.database(), Some("warehouse"));
    assert!(!base.include_policy().database);

    // The equality check can run again immediately
    check_relations_equal(&project.adapter, &["table_model", "view_model"])
        .await
        .unwrap();
}
