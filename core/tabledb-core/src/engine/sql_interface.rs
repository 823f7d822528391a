//! SQL Execution Pipeline — SQL query execution methods

use crate::engine::Database;
use crate::engine::result::ExecutionResult;
use crate::error::TdbResult;
use crate::sql::planner::{LogicalPlan, LogicalPlanner};
use tracing::{debug, instrument};

impl Database {
    /// SQL 문자열을 실행합니다.
    ///
    /// Statements separated by `;` run in order; each one is planned against
    /// the catalog as left by the previous one. The first failure stops the
    /// batch, earlier statements stay applied.
    ///
    /// # 예제
    ///
    /// ```rust
    /// use tabledb_core::Database;
    ///
    /// # fn main() -> tabledb_core::TdbResult<()> {
    /// let mut db = Database::open_in_memory()?;
    /// let results = db.execute_sql(
    ///     "CREATE TABLE T (id INT PRIMARY KEY, name STRING);
    ///      INSERT INTO T VALUES (3, 'c'), (1, 'a'), (2, 'b');
    ///      SELECT * FROM T WHERE id >= 2",
    /// )?;
    /// assert_eq!(results[2].rows().map(|rs| rs.row_count()), Some(2));
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub fn execute_sql(&mut self, sql: &str) -> TdbResult<Vec<ExecutionResult>> {
        let statements = self.sql_parser.parse(sql)?;
        let mut results = Vec::with_capacity(statements.len());
        for statement in &statements {
            let plan = LogicalPlanner::new(&self.catalog).plan(statement)?;
            debug!(table = plan.table(), "executing plan");
            results.push(self.execute_plan(plan)?);
        }
        Ok(results)
    }

    /// 논리 플랜을 실행합니다.
    pub fn execute_plan(&mut self, plan: LogicalPlan) -> TdbResult<ExecutionResult> {
        match plan {
            LogicalPlan::CreateTable { table, columns } => {
                self.create_table(&table, columns)?;
                Ok(ExecutionResult::Created { table })
            }
            LogicalPlan::Insert { table, rows } => {
                Ok(ExecutionResult::Mutated(self.insert_rows(&table, rows)?))
            }
            LogicalPlan::Select {
                table,
                projection,
                predicates,
            } => Ok(ExecutionResult::Rows(
                self.select(&table, &predicates, &projection)?,
            )),
            LogicalPlan::Join {
                left,
                right,
                on,
                predicates,
                projection,
            } => Ok(ExecutionResult::Rows(self.select_join(
                &left,
                &right,
                std::slice::from_ref(&on),
                &predicates,
                &projection,
            )?)),
            LogicalPlan::Update {
                table,
                assignments,
                predicates,
            } => Ok(ExecutionResult::Mutated(
                self.update(&table, &assignments, &predicates)?,
            )),
            LogicalPlan::Delete { table, predicates } => Ok(ExecutionResult::Mutated(
                self.delete_rows(&table, &predicates)?,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TdbError;
    use crate::value::Value;

    #[test]
    fn test_execute_sql_batch() {
        let mut db = Database::open_in_memory().unwrap();
        let results = db
            .execute_sql(
                "CREATE TABLE T (id INT PRIMARY KEY, name STRING);
                 INSERT INTO T VALUES (1, 'a'), (2, 'b');
                 UPDATE T SET name = 'z' WHERE id = 2;
                 SELECT name FROM T WHERE id = 2",
            )
            .unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(
            results[0],
            ExecutionResult::Created {
                table: "T".to_string()
            }
        );
        assert_eq!(results[1].affected(), Some(2));
        assert_eq!(results[2].affected(), Some(1));
        let rs = results[3].rows().unwrap();
        assert_eq!(rs.rows, vec![vec![Value::from("z")]]);
    }

    #[test]
    fn test_execute_sql_stops_at_first_error() {
        let mut db = Database::open_in_memory().unwrap();
        let err = db
            .execute_sql(
                "CREATE TABLE T (id INT PRIMARY KEY);
                 INSERT INTO T VALUES (1);
                 INSERT INTO T VALUES (1);
                 INSERT INTO T VALUES (2)",
            )
            .unwrap_err();
        assert!(matches!(err, TdbError::ConstraintViolation { .. }));
        assert_eq!(db.table("T").unwrap().len(), 1);
    }
}
