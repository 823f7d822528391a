//! API 트레이트 정의

use crate::catalog::{Column, Row};
use crate::error::{TdbError, TdbResult};
use crate::value::{DataType, Value};

/// Rust 타입 → 컬럼 타입
pub trait ColumnType {
    const DATA_TYPE: DataType;
}

/// Value에서 Rust 타입으로 변환하는 트레이트
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> TdbResult<Self>;
}

/// Rust 타입을 Value로 변환하는 트레이트
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// 행에서 구조체로 변환하는 트레이트
pub trait FromRow: Sized {
    fn from_row(row: &[Value]) -> TdbResult<Self>;
}

/// 구조체를 행으로 변환하는 트레이트
pub trait IntoRow {
    fn into_row(self) -> Row;
}

/// A struct stored as one table row; usually derived with
/// `#[derive(TableRecord)]`.
pub trait TableRecord: FromRow + IntoRow {
    const TABLE_NAME: &'static str;

    fn columns() -> Vec<Column>;
}

fn mismatch(expected: DataType, value: &Value) -> TdbError {
    TdbError::TypeMismatch {
        column: String::new(),
        expected: expected.to_string(),
        actual: value.data_type().to_string(),
    }
}

// 기본 타입 구현
impl ColumnType for i64 {
    const DATA_TYPE: DataType = DataType::Integer;
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> TdbResult<Self> {
        match value {
            Value::Integer(v) => Ok(*v),
            other => Err(mismatch(DataType::Integer, other)),
        }
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl ColumnType for i32 {
    const DATA_TYPE: DataType = DataType::Integer;
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> TdbResult<Self> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|e| TdbError::TypeMismatch {
            column: String::new(),
            expected: "INT (32-bit)".to_string(),
            actual: format!("{wide}: {e}"),
        })
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Integer(self.into())
    }
}

impl ColumnType for f64 {
    const DATA_TYPE: DataType = DataType::Float;
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> TdbResult<Self> {
        match value {
            Value::Float(v) => Ok(*v),
            other => Err(mismatch(DataType::Float, other)),
        }
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl ColumnType for String {
    const DATA_TYPE: DataType = DataType::Text;
}

impl FromValue for String {
    fn from_value(value: &Value) -> TdbResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(mismatch(DataType::Text, other)),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

/// Read one field of a derived record; errors name the column.
#[doc(hidden)]
pub fn column_value<T: FromValue>(row: &[Value], idx: usize, column: &str) -> TdbResult<T> {
    let value = row.get(idx).ok_or_else(|| TdbError::Schema(format!(
        "row has {} values, column '{column}' is at position {idx}",
        row.len()
    )))?;
    T::from_value(value).map_err(|e| match e {
        TdbError::TypeMismatch {
            expected, actual, ..
        } => TdbError::TypeMismatch {
            column: column.to_string(),
            expected,
            actual,
        },
        other => other,
    })
}
