//! Error types for the tabledb engine.
//!
//! All public APIs return `TdbResult<T>`; library code does not panic.

use thiserror::Error;

/// Unified error type for all tabledb operations.
#[derive(Debug, Error)]
pub enum TdbError {
    /// Generic schema definition or validation error
    #[error("schema error: {0}")]
    Schema(String),

    /// Requested table does not exist
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// A table with this name is already registered
    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Requested column does not exist in the table
    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Row arity does not match the table schema
    #[error("column count mismatch for table '{table}': expected {expected}, got {actual}")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Type mismatch between a column and a supplied value
    #[error("type mismatch for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    /// A value could not be coerced to an integer index key
    #[error("cannot coerce '{value}' to an index key: {reason}")]
    KeyCoercion { value: String, reason: String },

    /// Duplicate key on the indexed column
    #[error("constraint violation: duplicate key {key} on '{table}.{column}'")]
    ConstraintViolation {
        table: String,
        column: String,
        key: i64,
    },

    /// Duplicate key rejected by the ordered index itself
    #[error("duplicate key {0} in index")]
    DuplicateKey(i64),

    /// Index maintenance failure
    #[error("index error: {0}")]
    Index(String),

    /// SQL parsing error
    #[error("SQL parse error: {message}\nSQL: {sql}")]
    SqlParse { message: String, sql: String },

    /// Unsupported SQL feature
    #[error("SQL feature not supported: {feature}\nHint: {hint}")]
    SqlNotSupported { feature: String, hint: String },

    /// Apache Arrow error (result set conversion)
    #[error("arrow error: {source}")]
    Arrow {
        #[from]
        source: arrow::error::ArrowError,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid engine configuration
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for all tabledb operations.
pub type TdbResult<T> = Result<T, TdbError>;

/// Coarse error classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown table/column, arity mismatch
    Schema,
    /// Value cannot be coerced to the column's declared type
    Type,
    /// Duplicate key on the indexed column
    Constraint,
    /// Key coercion/removal failure during index maintenance
    Index,
    /// Front-end (SQL text) failure
    Sql,
    /// Arrow, serde or config failure
    Internal,
}

impl TdbError {
    /// Classify this error into one of the reportable kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TdbError::Schema(_)
            | TdbError::TableNotFound(_)
            | TdbError::TableAlreadyExists(_)
            | TdbError::ColumnNotFound { .. }
            | TdbError::ColumnCountMismatch { .. } => ErrorKind::Schema,
            TdbError::TypeMismatch { .. } | TdbError::KeyCoercion { .. } => ErrorKind::Type,
            TdbError::ConstraintViolation { .. } => ErrorKind::Constraint,
            TdbError::DuplicateKey(_) | TdbError::Index(_) => ErrorKind::Index,
            TdbError::SqlParse { .. } | TdbError::SqlNotSupported { .. } => ErrorKind::Sql,
            TdbError::Arrow { .. } | TdbError::Serialization(_) | TdbError::Config(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub(crate) fn column_not_found(table: &str, column: &str) -> Self {
        TdbError::ColumnNotFound {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl From<serde_json::Error> for TdbError {
    fn from(err: serde_json::Error) -> Self {
        TdbError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_table_not_found() {
        let err = TdbError::TableNotFound("users".to_string());
        assert_eq!(err.to_string(), "table 'users' not found");
    }

    #[test]
    fn error_display_column_not_found() {
        let err = TdbError::column_not_found("users", "age");
        assert_eq!(err.to_string(), "column 'age' not found in table 'users'");
    }

    #[test]
    fn error_display_type_mismatch() {
        let err = TdbError::TypeMismatch {
            column: "id".to_string(),
            expected: "INT".to_string(),
            actual: "STRING".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch for column 'id': expected INT, got STRING"
        );
    }

    #[test]
    fn error_display_constraint_violation() {
        let err = TdbError::ConstraintViolation {
            table: "users".to_string(),
            column: "id".to_string(),
            key: 7,
        };
        assert!(err.to_string().contains("duplicate key 7"));
        assert!(err.to_string().contains("users.id"));
    }

    #[test]
    fn error_display_sql_not_supported() {
        let err = TdbError::SqlNotSupported {
            feature: "LEFT JOIN".to_string(),
            hint: "Use INNER JOIN".to_string(),
        };
        assert!(err.to_string().contains("not supported"));
        assert!(err.to_string().contains("LEFT JOIN"));
    }

    #[test]
    fn error_kinds() {
        assert_eq!(
            TdbError::TableNotFound("t".into()).kind(),
            ErrorKind::Schema
        );
        assert_eq!(
            TdbError::KeyCoercion {
                value: "abc".into(),
                reason: "not a number".into()
            }
            .kind(),
            ErrorKind::Type
        );
        assert_eq!(
            TdbError::ConstraintViolation {
                table: "t".into(),
                column: "id".into(),
                key: 1
            }
            .kind(),
            ErrorKind::Constraint
        );
        assert_eq!(TdbError::DuplicateKey(1).kind(), ErrorKind::Index);
        assert_eq!(TdbError::Config("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn tdb_result_err() {
        let result: TdbResult<i32> = Err(TdbError::Index("missing".into()));
        assert!(result.is_err());
    }
}
