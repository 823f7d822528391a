//! Structured filter requests consumed by the query engine.
//!
//! Both the SQL planner and direct API callers build these; the engine never
//! sees SQL text.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a single predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::GtEq => ">=",
            CompareOp::LtEq => "<=",
        }
    }

    /// Operator with its operands swapped (`5 < x` ≡ `x > 5`).
    pub fn mirrored(&self) -> Self {
        match self {
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::GtEq => CompareOp::LtEq,
            CompareOp::LtEq => CompareOp::GtEq,
            other => *other,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a predicate folds into the accumulated result of the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Connective {
    #[default]
    And,
    Or,
}

/// `column op value`, tagged with its connective.
///
/// The connective of the first predicate in a list is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
    pub connective: Connective,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
            connective: Connective::And,
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Eq, value)
    }

    pub fn not_eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::NotEq, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Gt, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Lt, value)
    }

    pub fn gt_eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::GtEq, value)
    }

    pub fn lt_eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::LtEq, value)
    }

    /// Combine with the accumulated result using OR.
    pub fn or(mut self) -> Self {
        self.connective = Connective::Or;
        self
    }

    /// Combine with the accumulated result using AND (the default).
    pub fn and(mut self) -> Self {
        self.connective = Connective::And;
        self
    }
}

/// Equality condition of an inner join: `left_table.left_column = right_table.right_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPredicate {
    pub left_table: String,
    pub left_column: String,
    pub right_table: String,
    pub right_column: String,
}

impl JoinPredicate {
    pub fn new(
        left_table: impl Into<String>,
        left_column: impl Into<String>,
        right_table: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self {
            left_table: left_table.into(),
            left_column: left_column.into(),
            right_table: right_table.into(),
            right_column: right_column.into(),
        }
    }

    /// Same condition with the two sides exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            left_table: self.right_table.clone(),
            left_column: self.right_column.clone(),
            right_table: self.left_table.clone(),
            right_column: self.left_column.clone(),
        }
    }
}

/// Columns to return from a select.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    All,
    Columns(Vec<String>),
}

impl Projection {
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Columns(names.into_iter().map(Into::into).collect())
    }
}

/// `SET column = value` of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}
