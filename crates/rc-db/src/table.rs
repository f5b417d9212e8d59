//! Query result tables

use serde::Serialize;
use std::fmt;

/// A single cell of a fetched result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Datum {
    /// Integer value, if this cell holds one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Datum::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "null"),
            Datum::Bool(b) => write!(f, "{}", b),
            Datum::Int(n) => write!(f, "{}", n),
            Datum::Float(x) => write!(f, "{}", x),
            Datum::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<duckdb::types::Value> for Datum {
    fn from(value: duckdb::types::Value) -> Self {
        use duckdb::types::Value;
        match value {
            Value::Null => Datum::Null,
            Value::Boolean(b) => Datum::Bool(b),
            Value::TinyInt(n) => Datum::Int(n.into()),
            Value::SmallInt(n) => Datum::Int(n.into()),
            Value::Int(n) => Datum::Int(n.into()),
            Value::BigInt(n) => Datum::Int(n),
            Value::UTinyInt(n) => Datum::Int(n.into()),
            Value::USmallInt(n) => Datum::Int(n.into()),
            Value::UInt(n) => Datum::Int(n.into()),
            Value::UBigInt(n) => match i64::try_from(n) {
                Ok(n) => Datum::Int(n),
                Err(_) => Datum::Text(n.to_string()),
            },
            Value::HugeInt(n) => match i64::try_from(n) {
                Ok(n) => Datum::Int(n),
                Err(_) => Datum::Text(n.to_string()),
            },
            Value::Float(x) => Datum::Float(x.into()),
            Value::Double(x) => Datum::Float(x),
            Value::Text(s) => Datum::Text(s),
            other => Datum::Text(format!("{:?}", other)),
        }
    }
}

/// Rows returned by a fetching query, with their column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Datum>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Datum>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckdb::types::Value;

    #[test]
    fn test_integer_values_widen_to_int() {
        assert_eq!(Datum::from(Value::TinyInt(-3)), Datum::Int(-3));
        assert_eq!(Datum::from(Value::Int(7)), Datum::Int(7));
        assert_eq!(Datum::from(Value::BigInt(0)), Datum::Int(0));
        assert_eq!(Datum::from(Value::HugeInt(42)), Datum::Int(42));
        assert_eq!(Datum::from(Value::UBigInt(5)), Datum::Int(5));
    }

    #[test]
    fn test_out_of_range_integer_becomes_text() {
        let big = i128::from(i64::MAX) + 1;
        assert_eq!(
            Datum::from(Value::HugeInt(big)),
            Datum::Text(big.to_string())
        );
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(Datum::from(Value::Null), Datum::Null);
        assert_eq!(Datum::from(Value::Boolean(true)), Datum::Bool(true));
        assert_eq!(Datum::from(Value::Double(1.5)), Datum::Float(1.5));
        assert_eq!(
            Datum::from(Value::Text("a".to_string())),
            Datum::Text("a".to_string())
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Datum::Int(3).as_i64(), Some(3));
        assert_eq!(Datum::Text("3".to_string()).as_i64(), None);
        assert_eq!(Datum::Text("x".to_string()).as_str(), Some("x"));
        assert_eq!(Datum::Null.to_string(), "null");
    }

    #[test]
    fn test_result_table_shape() {
        let table = ResultTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Datum::Int(0), Datum::Int(1)]],
        );
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
        assert_eq!(table.rows[0].len(), 2);
    }
}
