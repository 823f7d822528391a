//! Column types and runtime values.
//!
//! A [`Value`] is immutable once constructed. Equality is strict per variant;
//! ordering across Integer/Float goes through [`Value::compare`].

use crate::error::{TdbError, TdbResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Text,
}

impl DataType {
    /// Canonical SQL spelling used in error messages and `CREATE TABLE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Integer => "INT",
            DataType::Float => "FLOAT",
            DataType::Text => "STRING",
        }
    }

    /// Map a SQL type name to a column type.
    ///
    /// Length/precision suffixes such as `VARCHAR(32)` are ignored.
    pub fn from_sql_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let base = upper.split('(').next().unwrap_or_default().trim();
        match base {
            "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" | "INT64" | "INT32" => {
                Some(DataType::Integer)
            }
            "FLOAT" | "REAL" | "DOUBLE" | "DOUBLE PRECISION" | "DECIMAL" | "NUMERIC"
            | "FLOAT64" => Some(DataType::Float),
            "STRING" | "TEXT" | "VARCHAR" | "CHAR" | "CHARACTER VARYING" => Some(DataType::Text),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
        }
    }

    /// Coerce this value to an integer index key.
    ///
    /// Floats are truncated toward zero, text is trimmed and parsed.
    pub fn to_key(&self) -> TdbResult<i64> {
        match self {
            Value::Integer(v) => Ok(*v),
            Value::Float(v) => truncate_float(*v).ok_or_else(|| TdbError::KeyCoercion {
                value: v.to_string(),
                reason: "float is not finite or out of integer range".to_string(),
            }),
            Value::Text(s) => s.trim().parse::<i64>().map_err(|e| TdbError::KeyCoercion {
                value: s.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Numeric view of the value; text is trimmed and parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Convert to the destination column type.
    pub fn coerce_to(&self, target: DataType) -> TdbResult<Value> {
        let mismatch = || TdbError::TypeMismatch {
            column: String::new(),
            expected: target.to_string(),
            actual: format!("{self}"),
        };
        match (self, target) {
            (Value::Integer(_), DataType::Integer)
            | (Value::Float(_), DataType::Float)
            | (Value::Text(_), DataType::Text) => Ok(self.clone()),
            (Value::Float(v), DataType::Integer) => {
                truncate_float(*v).map(Value::Integer).ok_or_else(mismatch)
            }
            (Value::Text(s), DataType::Integer) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| mismatch()),
            (Value::Integer(v), DataType::Float) => Ok(Value::Float(*v as f64)),
            (Value::Text(s), DataType::Float) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| mismatch()),
            (Value::Integer(_) | Value::Float(_), DataType::Text) => {
                Ok(Value::Text(self.to_string()))
            }
        }
    }

    /// Variant-aware ordering: Integer and Float compare numerically,
    /// Text compares lexicographically, text against a number is unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Truncate toward zero, rejecting NaN/inf and values outside `i64`.
pub(crate) fn truncate_float(v: f64) -> Option<i64> {
    let t = v.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}
