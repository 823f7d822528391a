//! Typed record API on top of the row operations.

use crate::api::TableRecord;
use crate::engine::Database;
use crate::engine::result::MutationSummary;
use crate::error::TdbResult;
use crate::sql::predicate::{Predicate, Projection};

impl Database {
    /// `T`의 스키마로 테이블을 생성합니다.
    pub fn create_table_for<T: TableRecord>(&mut self) -> TdbResult<()> {
        self.create_table(T::TABLE_NAME, T::columns())
    }

    /// 레코드 하나를 삽입합니다.
    pub fn insert_record<T: TableRecord>(&mut self, record: T) -> TdbResult<MutationSummary> {
        self.insert_into(T::TABLE_NAME, record.into_row())
    }

    /// Insert several records; none is stored if any fails validation.
    pub fn insert_records<T, I>(&mut self, records: I) -> TdbResult<MutationSummary>
    where
        T: TableRecord,
        I: IntoIterator<Item = T>,
    {
        let rows = records.into_iter().map(T::into_row).collect();
        self.insert_rows(T::TABLE_NAME, rows)
    }

    /// 조건에 맞는 레코드를 저장 순서대로 읽습니다.
    pub fn select_records<T: TableRecord>(&self, predicates: &[Predicate]) -> TdbResult<Vec<T>> {
        let result = self.select(T::TABLE_NAME, predicates, &Projection::All)?;
        result.rows.iter().map(|row| T::from_row(row)).collect()
    }
}
