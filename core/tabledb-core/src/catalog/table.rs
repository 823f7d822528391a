//! Table: fixed schema, append-ordered row storage and one ordered index.

use crate::error::{TdbError, TdbResult};
use crate::index::{BPlusTree, Locator};
use crate::value::{DataType, Value};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A row is one value per schema column, in schema order.
pub type Row = Vec<Value>;

/// Column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub indexed: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            indexed: false,
        }
    }

    /// Column that keys the table's ordered index.
    pub fn primary_key(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            indexed: true,
            ..Self::new(name, data_type)
        }
    }
}

/// 테이블 — 스키마, 행 저장소, B+Tree 인덱스
///
/// Rows are addressed by position. The index maps the indexed column's key
/// to that position, and every mutation path in the engine keeps
/// `index.search(key(row)) == position(row)`.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    indexed: Option<usize>,
    rows: Vec<Row>,
    index: BPlusTree,
}

impl Table {
    /// Build an empty table.
    ///
    /// Rejects an empty schema and duplicate column names. When several
    /// columns are marked indexed only the first one keeps the flag.
    pub fn new(name: impl Into<String>, mut columns: Vec<Column>) -> TdbResult<Self> {
        let name = name.into();
        if columns.is_empty() {
            return Err(TdbError::Schema(format!("table '{name}' has no columns")));
        }

        let mut seen = AHashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TdbError::Schema(format!(
                    "duplicate column '{}' in table '{name}'",
                    column.name
                )));
            }
        }

        let indexed = columns.iter().position(|c| c.indexed);
        if let Some(first) = indexed {
            for column in columns.iter_mut().skip(first + 1).filter(|c| c.indexed) {
                warn!(
                    table = %name,
                    column = %column.name,
                    "second indexed column ignored; only one index per table"
                );
                column.indexed = false;
            }
        }

        Ok(Self {
            name,
            columns,
            indexed,
            rows: Vec::new(),
            index: BPlusTree::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, locator: Locator) -> Option<&Row> {
        self.rows.get(locator)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn index(&self) -> &BPlusTree {
        &self.index
    }

    /// Position of `name` in the schema.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Like [`column_index`](Self::column_index), failing with `ColumnNotFound`.
    pub fn require_column(&self, name: &str) -> TdbResult<usize> {
        self.column_index(name)
            .ok_or_else(|| TdbError::column_not_found(&self.name, name))
    }

    /// Position of the indexed column, if the table has one.
    pub fn indexed_column(&self) -> Option<usize> {
        self.indexed
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Check arity and per-column value types.
    pub fn validate_row(&self, values: &[Value]) -> TdbResult<()> {
        if values.len() != self.columns.len() {
            return Err(TdbError::ColumnCountMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(values) {
            check_type(column, value)?;
        }
        Ok(())
    }

    /// Index key of `row`; `None` when the table has no indexed column.
    pub fn key_of(&self, row: &[Value]) -> Option<TdbResult<i64>> {
        let idx = self.indexed?;
        Some(
            row.get(idx)
                .ok_or_else(|| TdbError::Index(format!("row too short for '{}'", self.name)))
                .and_then(Value::to_key),
        )
    }

    /// Point lookup through the index.
    pub fn lookup(&self, key: i64) -> Option<&Row> {
        self.indexed?;
        self.index.search(key).and_then(|loc| self.rows.get(loc))
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Row>, &mut BPlusTree) {
        (&mut self.rows, &mut self.index)
    }
}

/// Value must carry exactly the column's declared type.
pub(crate) fn check_type(column: &Column, value: &Value) -> TdbResult<()> {
    if value.data_type() == column.data_type {
        Ok(())
    } else {
        Err(TdbError::TypeMismatch {
            column: column.name.clone(),
            expected: column.data_type.to_string(),
            actual: value.data_type().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        Table::new(
            "users",
            vec![
                Column::primary_key("id", DataType::Integer),
                Column::new("name", DataType::Text),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_column_index() {
        let t = users();
        assert_eq!(t.column_index("id"), Some(0));
        assert_eq!(t.column_index("name"), Some(1));
        assert_eq!(t.column_index("age"), None);
        assert!(matches!(
            t.require_column("age"),
            Err(TdbError::ColumnNotFound { .. })
        ));
        assert_eq!(t.indexed_column(), Some(0));
    }

    #[test]
    fn test_rejects_bad_schema() {
        assert!(matches!(Table::new("t", vec![]), Err(TdbError::Schema(_))));
        let dup = Table::new(
            "t",
            vec![
                Column::new("a", DataType::Integer),
                Column::new("a", DataType::Text),
            ],
        );
        assert!(matches!(dup, Err(TdbError::Schema(_))));
    }

    #[test]
    fn test_first_indexed_column_wins() {
        let t = Table::new(
            "t",
            vec![
                Column::new("a", DataType::Text),
                Column::primary_key("b", DataType::Integer),
                Column::primary_key("c", DataType::Integer),
            ],
        )
        .unwrap();
        assert_eq!(t.indexed_column(), Some(1));
        assert!(!t.columns()[2].indexed);
    }

    #[test]
    fn test_validate_row() {
        let t = users();
        assert!(t.validate_row(&[1.into(), "a".into()]).is_ok());
        assert!(matches!(
            t.validate_row(&[1.into()]),
            Err(TdbError::ColumnCountMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        assert!(matches!(
            t.validate_row(&["1".into(), "a".into()]),
            Err(TdbError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_key_of() {
        let t = users();
        assert_eq!(t.key_of(&[7.into(), "x".into()]).unwrap().unwrap(), 7);
        let plain = Table::new("p", vec![Column::new("a", DataType::Integer)]).unwrap();
        assert!(plain.key_of(&[1.into()]).is_none());
    }
}
