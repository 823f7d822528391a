//! Database struct definition

use crate::catalog::{Catalog, Table};
use crate::config::EngineConfig;
use crate::error::TdbResult;
use crate::sql::evaluator::PredicateEvaluator;
use crate::sql::parser::SqlParser;

/// tabledb 데이터베이스 엔진
///
/// 인메모리 테이블 카탈로그와 쿼리 엔진을 관리하는 메인 API입니다.
///
/// # 데이터 흐름
///
/// - **INSERT**: 검증 후 행을 추가하고 B+Tree 인덱스에 (key, position) 등록
/// - **SELECT**: 인덱스 범위 스캔 또는 전체 스캔 → PredicateEvaluator 필터
/// - **UPDATE**: 행을 제자리에서 수정, 인덱스 키가 바뀌면 같은 위치로 재등록
/// - **DELETE**: 내림차순으로 삭제 후 남은 행의 인덱스 위치 재조정
///
/// # 예제
///
/// ```rust
/// use tabledb_core::{Column, DataType, Database, Predicate, Projection};
///
/// # fn main() -> tabledb_core::TdbResult<()> {
/// let mut db = Database::open_in_memory()?;
/// db.create_table(
///     "users",
///     vec![
///         Column::primary_key("id", DataType::Integer),
///         Column::new("name", DataType::Text),
///     ],
/// )?;
/// db.insert_into("users", vec![1.into(), "Alice".into()])?;
/// let rs = db.select("users", &[Predicate::eq("id", 1)], &Projection::All)?;
/// assert_eq!(rs.row_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Database {
    /// Table registry; owns every table and its index
    pub(crate) catalog: Catalog,

    /// Predicate evaluation (float tolerance from config)
    pub(crate) evaluator: PredicateEvaluator,

    pub(crate) config: EngineConfig,

    /// SQL parser (cached)
    pub(crate) sql_parser: SqlParser,
}

impl Database {
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Borrow a table, failing with `TableNotFound`.
    pub fn table(&self, name: &str) -> TdbResult<&Table> {
        self.catalog.table(name)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.catalog.table_names()
    }
}
