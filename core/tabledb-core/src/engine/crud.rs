//! Database CRUD Operations — Create, Read, Update, Delete methods
//!
//! Every mutation validates the whole request before touching rows. Index
//! maintenance that fails after rows were changed is logged, reported in
//! [`MutationSummary::index_errors`], and does not undo the change.

use crate::catalog::table::check_type;
use crate::catalog::{Column, Row, Table};
use crate::config::EngineConfig;
use crate::engine::Database;
use crate::engine::result::{MutationSummary, ResultSet};
use crate::error::{TdbError, TdbResult};
use crate::index::{BPlusTree, KeyRange, Locator};
use crate::sql::evaluator::PredicateEvaluator;
use crate::sql::predicate::{Assignment, Connective, Predicate, Projection};
use crate::value::{DataType, Value};
use ahash::AHashSet;
use tracing::{debug, info, instrument, warn};

impl Database {
    // ════════════════════════════════════════════
    // CREATE Operations
    // ════════════════════════════════════════════

    /// 테이블을 생성합니다.
    ///
    /// 이름이 이미 존재하거나 스키마가 잘못되면 실패합니다.
    #[instrument(skip(self, columns))]
    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> TdbResult<()> {
        let table = self.catalog.create_table(name, columns)?;
        info!(
            columns = table.columns().len(),
            indexed = ?table.indexed_column().map(|i| &table.columns()[i].name),
            "table created"
        );
        Ok(())
    }

    /// 한 행을 삽입합니다.
    ///
    /// 인덱스 컬럼 값이 이미 존재하는 키면 `ConstraintViolation`으로 거부됩니다.
    pub fn insert_into(&mut self, table: &str, values: Vec<Value>) -> TdbResult<MutationSummary> {
        self.insert_rows(table, vec![values])
    }

    /// 여러 행을 삽입합니다.
    ///
    /// All rows are checked (arity, types, key coercion, duplicate keys
    /// against the index and within the batch) before any is appended.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn insert_rows(&mut self, table: &str, rows: Vec<Row>) -> TdbResult<MutationSummary> {
        let t = self.catalog.table_mut(table)?;

        let mut keys = Vec::with_capacity(rows.len());
        let mut batch_keys = AHashSet::with_capacity(rows.len());
        for row in &rows {
            t.validate_row(row)?;
            let key = t.key_of(row).transpose()?;
            if let Some(k) = key {
                if t.index().search(k).is_some() || !batch_keys.insert(k) {
                    return Err(constraint_violation(t, k));
                }
            }
            keys.push(key);
        }

        let affected = rows.len();
        let (storage, index) = t.parts_mut();
        append_batch(storage, index, rows, &keys)?;

        debug!(affected, "rows inserted");
        Ok(MutationSummary::new(affected))
    }

    // ════════════════════════════════════════════
    // READ Operations
    // ════════════════════════════════════════════

    /// 조건에 맞는 행을 저장 순서대로 반환합니다.
    ///
    /// Projected names may be qualified with the table name (`T.id`).
    #[instrument(skip(self, predicates, projection))]
    pub fn select(
        &self,
        table: &str,
        predicates: &[Predicate],
        projection: &Projection,
    ) -> TdbResult<ResultSet> {
        let t = self.catalog.table(table)?;
        let columns = resolve_projection(t, projection)?;

        let mut result = ResultSet::new(
            columns.iter().map(|&i| t.columns()[i].name.clone()).collect(),
            columns.iter().map(|&i| t.columns()[i].data_type).collect(),
        );
        for pos in matching_positions(t, predicates, &self.evaluator, &self.config) {
            let row = &t.rows()[pos];
            result
                .rows
                .push(columns.iter().map(|&i| row[i].clone()).collect());
        }

        debug!(rows = result.row_count(), "select finished");
        Ok(result)
    }

    // ════════════════════════════════════════════
    // UPDATE Operations
    // ════════════════════════════════════════════

    /// 조건에 맞는 행을 제자리에서 수정합니다.
    ///
    /// Rejected before any change: unknown columns, values of the wrong
    /// type, an uncoercible new key, and a new indexed-column value that
    /// would be shared by several rows. An update matching no row changes
    /// nothing and succeeds. Rows keep their positions, so a changed key is
    /// re-registered at the same locator.
    #[instrument(skip(self, assignments, predicates))]
    pub fn update(
        &mut self,
        table: &str,
        assignments: &[Assignment],
        predicates: &[Predicate],
    ) -> TdbResult<MutationSummary> {
        let evaluator = self.evaluator;
        let config = self.config;
        let t = self.catalog.table_mut(table)?;

        let mut targets = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let idx = t.require_column(&assignment.column)?;
            check_type(&t.columns()[idx], &assignment.value)?;
            targets.push((idx, &assignment.value));
        }

        let positions = matching_positions(t, predicates, &evaluator, &config);
        if positions.is_empty() {
            return Ok(MutationSummary::new(0));
        }

        // last assignment to the indexed column wins
        let indexed = t.indexed_column();
        let new_key = match indexed.and_then(|i| targets.iter().rev().find(|(idx, _)| *idx == i)) {
            Some((_, value)) => Some(value.to_key()?),
            None => None,
        };

        if let Some(k) = new_key {
            if positions.len() > 1 {
                return Err(constraint_violation(t, k));
            }
            if let Some(owner) = t.index().search(k) {
                if !positions.contains(&owner) {
                    return Err(constraint_violation(t, k));
                }
            }
        }

        let mut summary = MutationSummary::new(positions.len());
        let table_name = t.name().to_string();
        let (storage, index) = t.parts_mut();
        for &pos in &positions {
            if let (Some(idx), Some(_)) = (indexed, new_key) {
                match storage[pos][idx].to_key() {
                    Ok(old) => {
                        if index.remove(old).is_none() {
                            record_index_error(
                                &mut summary,
                                &table_name,
                                format!("old key {old} of row {pos} was not in the index"),
                            );
                        }
                    }
                    Err(e) => record_index_error(&mut summary, &table_name, e.to_string()),
                }
            }

            let row = &mut storage[pos];
            for (idx, value) in &targets {
                row[*idx] = (*value).clone();
            }

            if let Some(k) = new_key {
                if let Err(e) = index.insert(k, pos) {
                    record_index_error(&mut summary, &table_name, e.to_string());
                }
            }
        }

        debug!(affected = summary.affected, "rows updated");
        Ok(summary)
    }

    // ════════════════════════════════════════════
    // DELETE Operations
    // ════════════════════════════════════════════

    /// 조건에 맞는 행을 삭제합니다.
    ///
    /// Matches are erased from the highest position down. Surviving rows
    /// after the first erased position are re-pointed in the index, so
    /// `index.search(key(row)) == position(row)` keeps holding.
    #[instrument(skip(self, predicates))]
    pub fn delete_rows(
        &mut self,
        table: &str,
        predicates: &[Predicate],
    ) -> TdbResult<MutationSummary> {
        let evaluator = self.evaluator;
        let config = self.config;
        let t = self.catalog.table_mut(table)?;

        for predicate in predicates {
            t.require_column(&predicate.column)?;
        }

        let positions = matching_positions(t, predicates, &evaluator, &config);
        let mut summary = MutationSummary::new(positions.len());
        let Some(&first) = positions.first() else {
            return Ok(summary);
        };

        let indexed = t.indexed_column();
        let table_name = t.name().to_string();
        let (storage, index) = t.parts_mut();

        let mut doomed = vec![false; storage.len()];
        for &pos in positions.iter().rev() {
            doomed[pos] = true;
            let Some(idx) = indexed else { continue };
            match storage[pos][idx].to_key() {
                Ok(key) => {
                    if index.remove(key).is_none() {
                        record_index_error(
                            &mut summary,
                            &table_name,
                            format!("key {key} of deleted row {pos} was not in the index"),
                        );
                    }
                }
                Err(e) => record_index_error(&mut summary, &table_name, e.to_string()),
            }
        }
        let mut cursor = 0;
        storage.retain(|_| {
            let keep = !doomed[cursor];
            cursor += 1;
            keep
        });

        if let Some(idx) = indexed {
            for (pos, row) in storage.iter().enumerate().skip(first) {
                match row[idx].to_key() {
                    Ok(key) => {
                        if index.replace(key, pos).is_none() {
                            record_index_error(
                                &mut summary,
                                &table_name,
                                format!("key {key} missing while re-pointing row {pos}"),
                            );
                        }
                    }
                    Err(e) => record_index_error(&mut summary, &table_name, e.to_string()),
                }
            }
        }

        debug!(affected = summary.affected, "rows deleted");
        Ok(summary)
    }
}

// ════════════════════════════════════════════
// Scan helpers
// ════════════════════════════════════════════

/// Positions of rows matching `predicates`, ascending.
pub(crate) fn matching_positions(
    table: &Table,
    predicates: &[Predicate],
    evaluator: &PredicateEvaluator,
    config: &EngineConfig,
) -> Vec<Locator> {
    let matches = |pos: &Locator| {
        table
            .row(*pos)
            .is_some_and(|row| evaluator.evaluate_all(row, predicates, table.columns()))
    };

    match index_candidates(table, predicates, config) {
        Some(candidates) => {
            debug!(candidates = candidates.len(), "index range scan");
            candidates.into_iter().filter(matches).collect()
        }
        None => (0..table.len()).filter(matches).collect(),
    }
}

/// Candidate locators from the ordered index, sorted into storage order.
///
/// Only used when every match must satisfy one range predicate on an
/// Integer indexed column: no OR connectives after the first predicate.
fn index_candidates(
    table: &Table,
    predicates: &[Predicate],
    config: &EngineConfig,
) -> Option<Vec<Locator>> {
    if !config.index_scan || predicates.is_empty() {
        return None;
    }
    let column = &table.columns()[table.indexed_column()?];
    if column.data_type != DataType::Integer
        || predicates
            .iter()
            .skip(1)
            .any(|p| p.connective == Connective::Or)
    {
        return None;
    }

    let range = predicates
        .iter()
        .filter(|p| p.column == column.name)
        .find_map(|p| KeyRange::from_predicate(p).ok().flatten())?;

    let mut locators = table.index().range_search(range.min, range.max);
    locators.sort_unstable();
    Some(locators)
}

/// Append pre-validated rows and register their keys.
///
/// If the index rejects a key, every row and key of this batch is taken back
/// out before the error is returned.
fn append_batch(
    storage: &mut Vec<Row>,
    index: &mut BPlusTree,
    rows: Vec<Row>,
    keys: &[Option<i64>],
) -> TdbResult<()> {
    let base = storage.len();
    for (row, key) in rows.into_iter().zip(keys) {
        storage.push(row);
        let locator = storage.len() - 1;
        let Some(k) = *key else { continue };
        if let Err(e) = index.insert(k, locator) {
            for added in keys[..locator - base].iter().flatten() {
                index.remove(*added);
            }
            storage.truncate(base);
            warn!(key = k, error = %e, "index rejected batch; rows rolled back");
            return Err(e);
        }
    }
    Ok(())
}

/// Projection → column positions in `table`.
fn resolve_projection(table: &Table, projection: &Projection) -> TdbResult<Vec<usize>> {
    match projection {
        Projection::All => Ok((0..table.columns().len()).collect()),
        Projection::Columns(names) if names.is_empty() => Err(TdbError::Schema(
            "projection names no columns".to_string(),
        )),
        Projection::Columns(names) => names
            .iter()
            .map(|name| match name.split_once('.') {
                Some((qualifier, column)) if qualifier == table.name() => {
                    table.require_column(column)
                }
                Some(_) => Err(TdbError::column_not_found(table.name(), name)),
                None => table.require_column(name),
            })
            .collect(),
    }
}

fn constraint_violation(table: &Table, key: i64) -> TdbError {
    let column = table
        .indexed_column()
        .map(|i| table.columns()[i].name.clone())
        .unwrap_or_default();
    TdbError::ConstraintViolation {
        table: table.name().to_string(),
        column,
        key,
    }
}

fn record_index_error(summary: &mut MutationSummary, table: &str, message: String) {
    warn!(table, error = %message, "index maintenance failed; row change kept");
    summary.index_errors.push(message);
}
