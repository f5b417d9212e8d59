//! Relation type and relation equality checks

use crate::error::{CheckError, CheckResult};
use rc_core::{CoreResult, Relation, RelationType};
use rc_db::{Adapter, Datum, ResultTable};
use std::collections::HashSet;

/// Connection label held while listing relations
const TYPES_CONNECTION: &str = "__test";

/// Connection label held while comparing relation contents
const EQUAL_CONNECTION: &str = "_test";

/// Reconstruct a relation, including quoting, from a dotted name using the
/// adapter's credentials and quoting conventions.
pub fn relation_from_name(adapter: &dyn Adapter, name: &str) -> CoreResult<Relation> {
    Relation::from_name(
        name,
        &adapter.relation_defaults(),
        &adapter.relation_style(),
        |s| adapter.quote(s),
    )
}

/// Check that each named relation was materialized as the expected kind.
///
/// Relations are listed once per distinct schema. An expected name with no
/// listed relation of the same identifier is not checked; a warning is
/// logged instead.
pub async fn check_relation_types(
    adapter: &dyn Adapter,
    expected: &[(&str, RelationType)],
) -> CheckResult<()> {
    let mut expected_relations = Vec::with_capacity(expected.len());
    let mut schemas = Vec::new();
    let mut seen = HashSet::new();

    for (name, relation_type) in expected {
        let relation = relation_from_name(adapter, name)?;
        let schema = relation.without_identifier();
        if seen.insert(schema.clone()) {
            schemas.push(schema);
        }
        expected_relations.push((*name, relation, *relation_type));
    }

    let mut found = Vec::new();
    {
        let _conn = adapter.connection_named(TYPES_CONNECTION)?;
        for schema in &schemas {
            found.extend(adapter.list_relations_without_caching(schema).await?);
        }
    }
    log::debug!(
        "[{}] Listed {} relations across {} schemas",
        adapter.adapter_type(),
        found.len(),
        schemas.len()
    );

    for (name, relation, expected_type) in &expected_relations {
        let mut matched = false;
        for listed in found.iter().filter(|r| identifier_matches(relation, r)) {
            matched = true;
            let observed = listed.relation_type();
            if observed != Some(*expected_type) {
                return Err(CheckError::RelationTypeMismatch {
                    name: name.to_string(),
                    observed: observed.map_or_else(|| "unknown".to_string(), |t| t.to_string()),
                    expected: *expected_type,
                });
            }
        }
        if !matched {
            log::warn!(
                "No relation matching '{}' was listed; its type ({}) was not checked",
                name,
                expected_type
            );
        }
    }

    Ok(())
}

/// Check that every named relation holds the same rows as the first one.
///
/// The first name is the basis; each following relation is compared to it
/// over the basis columns with the adapter's rows-different query.
pub async fn check_relations_equal(adapter: &dyn Adapter, names: &[&str]) -> CheckResult<()> {
    if names.len() < 2 {
        return Err(CheckError::NotEnoughRelations(names.len()));
    }
    let relations = names
        .iter()
        .map(|name| relation_from_name(adapter, name))
        .collect::<CoreResult<Vec<_>>>()?;
    let Some((basis, compares)) = relations.split_first() else {
        return Err(CheckError::NotEnoughRelations(0));
    };

    let _conn = adapter.connection_named(EQUAL_CONNECTION)?;
    let columns: Vec<String> = adapter
        .get_columns_in_relation(basis)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    for relation in compares {
        log::debug!(
            "[{}] Comparing {} against {}",
            adapter.adapter_type(),
            relation,
            basis
        );
        let sql = adapter.get_rows_different_sql(basis, relation, &columns);
        let (_, table) = adapter.execute(&sql, true).await?;
        check_rows_different_result(&table, basis, relation)?;
    }

    Ok(())
}

/// Interpret the result of a rows-different query.
///
/// The result must be exactly one row of two whole numbers, the row count
/// difference and the number of mismatched rows, and both must be zero.
pub fn check_rows_different_result(
    table: &ResultTable,
    basis: &Relation,
    relation: &Relation,
) -> CheckResult<()> {
    let num_rows = table.len();
    if num_rows != 1 {
        return Err(CheckError::InvalidRowCount(num_rows));
    }
    let row = &table.rows[0];
    if row.len() != 2 {
        return Err(CheckError::InvalidColumnCount(row.len()));
    }

    let difference = whole_number(&row[0], "row_count_difference")?;
    if difference != 0 {
        return Err(CheckError::RowCountDifference {
            difference,
            basis: basis.to_string(),
            relation: relation.to_string(),
        });
    }

    let count = whole_number(&row[1], "num_mismatched")?;
    if count != 0 {
        return Err(CheckError::RowsMismatched {
            count,
            basis: basis.to_string(),
            relation: relation.to_string(),
        });
    }

    Ok(())
}

/// Unquoted identifiers resolve case-insensitively; quoted ones must match
/// exactly.
fn identifier_matches(expected: &Relation, listed: &Relation) -> bool {
    match (expected.identifier(), listed.identifier()) {
        (Some(e), Some(l)) if expected.quote_policy().identifier => e == l,
        (Some(e), Some(l)) => e.eq_ignore_ascii_case(l),
        _ => false,
    }
}

fn whole_number(datum: &Datum, column: &'static str) -> CheckResult<i64> {
    match datum {
        Datum::Int(n) => Ok(*n),
        Datum::Float(x) if x.fract() == 0.0 && x.is_finite() => Ok(*x as i64),
        other => Err(CheckError::UnexpectedValue {
            column,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "checks_test.rs"]
mod tests;
