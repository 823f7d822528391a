//! Nested-loop inner equi-join.

use crate::catalog::Table;
use crate::engine::Database;
use crate::engine::result::ResultSet;
use crate::error::{TdbError, TdbResult};
use crate::sql::predicate::{JoinPredicate, Predicate, Projection};
use tracing::{debug, instrument};

impl Database {
    /// 두 테이블을 조인합니다 (nested loop, O(|left|·|right|)).
    ///
    /// Only the first join predicate is used; its sides may name the tables
    /// in either order. Each combined row is `left ‖ right` and must satisfy
    /// every one of `predicates`: connectives are ignored here, unlike
    /// [`Database::select`]. Predicates resolve against the left table's
    /// schema, so a WHERE on a right-only column matches nothing.
    ///
    /// Headers are `table.column`. Projected names may be qualified or
    /// bare; a bare name resolves against the left table first.
    #[instrument(skip(self, on, predicates, projection))]
    pub fn select_join(
        &self,
        left: &str,
        right: &str,
        on: &[JoinPredicate],
        predicates: &[Predicate],
        projection: &Projection,
    ) -> TdbResult<ResultSet> {
        let lt = self.catalog.table(left)?;
        let rt = self.catalog.table(right)?;

        let join = on
            .first()
            .ok_or_else(|| TdbError::Schema("join requires an equality condition".to_string()))?;
        if on.len() > 1 {
            debug!(ignored = on.len() - 1, "extra join predicates ignored");
        }
        let join = normalise(join, left, right)?;
        let lc = lt.require_column(&join.left_column)?;
        let rc = rt.require_column(&join.right_column)?;

        let columns = resolve_join_projection(lt, rt, projection)?;
        let combined_columns: Vec<_> = lt.columns().iter().chain(rt.columns()).collect();
        let mut result = ResultSet::new(
            columns
                .iter()
                .map(|&i| {
                    let table = if i < lt.columns().len() { left } else { right };
                    format!("{table}.{}", combined_columns[i].name)
                })
                .collect(),
            columns.iter().map(|&i| combined_columns[i].data_type).collect(),
        );

        for lrow in lt.rows() {
            for rrow in rt.rows() {
                if lrow[lc] != rrow[rc] {
                    continue;
                }
                let combined: Vec<_> = lrow.iter().chain(rrow).cloned().collect();
                if predicates
                    .iter()
                    .all(|p| self.evaluator.evaluate(&combined, p, lt.columns()))
                {
                    result
                        .rows
                        .push(columns.iter().map(|&i| combined[i].clone()).collect());
                }
            }
        }

        debug!(rows = result.row_count(), "join finished");
        Ok(result)
    }
}

/// Orient the join predicate so its left side names `left`.
fn normalise(join: &JoinPredicate, left: &str, right: &str) -> TdbResult<JoinPredicate> {
    if join.left_table == left && join.right_table == right {
        Ok(join.clone())
    } else if join.left_table == right && join.right_table == left {
        Ok(join.swapped())
    } else {
        Err(TdbError::Schema(format!(
            "join condition {}.{} = {}.{} does not link '{left}' and '{right}'",
            join.left_table, join.left_column, join.right_table, join.right_column
        )))
    }
}

/// Projection → positions in the combined `left ‖ right` row.
fn resolve_join_projection(lt: &Table, rt: &Table, projection: &Projection) -> TdbResult<Vec<usize>> {
    let offset = lt.columns().len();
    match projection {
        Projection::All => Ok((0..offset + rt.columns().len()).collect()),
        Projection::Columns(names) if names.is_empty() => Err(TdbError::Schema(
            "projection names no columns".to_string(),
        )),
        Projection::Columns(names) => names
            .iter()
            .map(|name| match name.split_once('.') {
                Some((table, column)) if table == lt.name() => lt.require_column(column),
                Some((table, column)) if table == rt.name() => {
                    rt.require_column(column).map(|i| offset + i)
                }
                Some((table, column)) => Err(TdbError::column_not_found(table, column)),
                None => lt
                    .column_index(name)
                    .or_else(|| rt.column_index(name).map(|i| offset + i))
                    .ok_or_else(|| {
                        TdbError::column_not_found(&format!("{}|{}", lt.name(), rt.name()), name)
                    }),
            })
            .collect(),
    }
}
