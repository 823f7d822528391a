//! Query results handed to callers and formatters.

use crate::catalog::Row;
use crate::error::TdbResult;
use crate::value::{DataType, Value};
use arrow::array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType as ArrowType, Field, Schema};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered headers plus row tuples, one value per header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub headers: Vec<String>,
    pub column_types: Vec<DataType>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(headers: Vec<String>, column_types: Vec<DataType>) -> Self {
        Self {
            headers,
            column_types,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with every value rendered through `Display`.
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    /// Arrow RecordBatch (Int64 / Float64 / Utf8 columns).
    pub fn to_record_batch(&self) -> TdbResult<RecordBatch> {
        let fields: Vec<Field> = self
            .headers
            .iter()
            .zip(&self.column_types)
            .map(|(name, ty)| Field::new(name, arrow_type(*ty), false))
            .collect();

        let columns: Vec<ArrayRef> = self
            .column_types
            .iter()
            .enumerate()
            .map(|(i, ty)| self.column_array(i, *ty))
            .collect();

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }

    /// Boxed text table, same layout as the REPL prints.
    pub fn pretty(&self) -> TdbResult<String> {
        let batch = self.to_record_batch()?;
        Ok(arrow::util::pretty::pretty_format_batches(&[batch])?.to_string())
    }

    pub fn to_json(&self) -> TdbResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn column_array(&self, i: usize, ty: DataType) -> ArrayRef {
        let cells = self.rows.iter().map(move |row| row.get(i));
        match ty {
            DataType::Integer => Arc::new(Int64Array::from_iter_values(cells.map(|v| match v {
                Some(Value::Integer(n)) => *n,
                Some(other) => other.to_key().unwrap_or_default(),
                None => 0,
            }))),
            DataType::Float => Arc::new(Float64Array::from_iter_values(
                cells.map(|v| v.and_then(Value::as_f64).unwrap_or_default()),
            )),
            DataType::Text => Arc::new(StringArray::from_iter_values(
                cells.map(|v| v.map(ToString::to_string).unwrap_or_default()),
            )),
        }
    }
}

fn arrow_type(ty: DataType) -> ArrowType {
    match ty {
        DataType::Integer => ArrowType::Int64,
        DataType::Float => ArrowType::Float64,
        DataType::Text => ArrowType::Utf8,
    }
}

/// Outcome of insert/update/delete.
///
/// `index_errors` lists index-maintenance failures that happened after the
/// row change was applied; they were logged and did not undo the change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MutationSummary {
    pub affected: usize,
    pub index_errors: Vec<String>,
}

impl MutationSummary {
    pub fn new(affected: usize) -> Self {
        Self {
            affected,
            index_errors: Vec::new(),
        }
    }

    /// True when the index was kept fully in step with the rows.
    pub fn index_consistent(&self) -> bool {
        self.index_errors.is_empty()
    }
}

/// Result of one executed statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionResult {
    Created { table: String },
    Mutated(MutationSummary),
    Rows(ResultSet),
}

impl ExecutionResult {
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            ExecutionResult::Rows(rs) => Some(rs),
            _ => None,
        }
    }

    pub fn affected(&self) -> Option<usize> {
        match self {
            ExecutionResult::Mutated(summary) => Some(summary.affected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    fn sample() -> ResultSet {
        let mut rs = ResultSet::new(
            vec!["id".into(), "name".into(), "score".into()],
            vec![DataType::Integer, DataType::Text, DataType::Float],
        );
        rs.rows.push(vec![1.into(), "a".into(), 0.5.into()]);
        rs.rows.push(vec![2.into(), "b".into(), 1.5.into()]);
        rs
    }

    #[test]
    fn test_rendered_rows() {
        assert_eq!(
            sample().rendered_rows(),
            vec![vec!["1", "a", "0.5"], vec!["2", "b", "1.5"]]
        );
    }

    #[test]
    fn test_to_record_batch() {
        let batch = sample().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 3);
        let ids = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(ids.value(1), 2);
        assert_eq!(batch.schema().field(1).name(), "name");
        assert_eq!(batch.column(1).len(), 2);
    }

    #[test]
    fn test_pretty_contains_values() {
        let text = sample().pretty().unwrap();
        assert!(text.contains("| id |"));
        assert!(text.contains("| 2  | b"));
    }

    #[test]
    fn test_empty_result() {
        let rs = ResultSet::new(vec!["id".into()], vec![DataType::Integer]);
        assert!(rs.is_empty());
        assert_eq!(rs.to_record_batch().unwrap().num_rows(), 0);
    }

    #[test]
    fn test_json() {
        let json = sample().to_json().unwrap();
        let back: ResultSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
