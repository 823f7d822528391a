//! SQL 플래너 타입 정의

use crate::catalog::{Column, Row};
use crate::sql::predicate::{Assignment, JoinPredicate, Predicate, Projection};
use serde::{Deserialize, Serialize};

/// 논리 플랜: one structured request for the query engine.
///
/// Literal values are already typed for their destination columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogicalPlan {
    /// CREATE TABLE
    CreateTable { table: String, columns: Vec<Column> },
    /// INSERT INTO ... VALUES, rows in schema column order
    Insert { table: String, rows: Vec<Row> },
    /// Single-table SELECT
    Select {
        table: String,
        projection: Projection,
        predicates: Vec<Predicate>,
    },
    /// Two-table inner equi-join
    Join {
        left: String,
        right: String,
        on: JoinPredicate,
        predicates: Vec<Predicate>,
        projection: Projection,
    },
    /// UPDATE
    Update {
        table: String,
        assignments: Vec<Assignment>,
        predicates: Vec<Predicate>,
    },
    /// DELETE
    Delete {
        table: String,
        predicates: Vec<Predicate>,
    },
}

impl LogicalPlan {
    /// Table the plan primarily targets (the left table for joins).
    pub fn table(&self) -> &str {
        match self {
            LogicalPlan::CreateTable { table, .. }
            | LogicalPlan::Insert { table, .. }
            | LogicalPlan::Select { table, .. }
            | LogicalPlan::Update { table, .. }
            | LogicalPlan::Delete { table, .. } => table,
            LogicalPlan::Join { left, .. } => left,
        }
    }
}
