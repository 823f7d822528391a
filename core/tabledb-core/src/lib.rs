//! # tabledb — Embeddable In-Memory Table Store
//!
//! tabledb는 타입이 있는 테이블, 테이블당 하나의 B+Tree 인덱스(order 4),
//! 그리고 조건 필터·조인·갱신·삭제를 수행하는 쿼리 엔진으로 구성된
//! 단일 프로세스 인메모리 데이터 저장소입니다.
//!
//! ## 주요 특징
//!
//! - **B+Tree 인덱스**: 정수 키 → 행 위치, 리프 체인 기반 범위 스캔
//! - **좌결합 조건 평가**: AND/OR 연결자를 선언 순서대로 접어 평가 (우선순위 없음)
//! - **인덱스 일관성**: 모든 변경 경로에서 `index.search(key) == position` 유지
//! - **SQL 프런트엔드**: CREATE TABLE, INSERT, SELECT (INNER JOIN), UPDATE, DELETE
//! - **타입 레코드 API**: `#[derive(TableRecord)]`
//!
//! ## 빠른 시작
//!
//! ### 기본 사용 (CRUD)
//!
//! ```rust
//! use tabledb_core::{Assignment, Column, DataType, Database, Predicate, Projection};
//!
//! # fn main() -> tabledb_core::TdbResult<()> {
//! let mut db = Database::open_in_memory()?;
//! db.create_table(
//!     "T",
//!     vec![
//!         Column::primary_key("id", DataType::Integer),
//!         Column::new("name", DataType::Text),
//!     ],
//! )?;
//!
//! // 데이터 삽입
//! db.insert_into("T", vec![3.into(), "c".into()])?;
//! db.insert_into("T", vec![1.into(), "a".into()])?;
//! db.insert_into("T", vec![2.into(), "b".into()])?;
//!
//! // 데이터 조회 (저장 순서 유지)
//! let rs = db.select("T", &[Predicate::gt_eq("id", 2)], &Projection::All)?;
//! assert_eq!(rs.row_count(), 2);
//!
//! // 갱신 / 삭제
//! db.update("T", &[Assignment::new("name", "z")], &[Predicate::eq("id", 1)])?;
//! db.delete_rows("T", &[Predicate::lt("id", 2)])?;
//! # Ok(())
//! # }
//! ```
//!
//! ### SQL
//!
//! ```rust
//! use tabledb_core::Database;
//!
//! # fn main() -> tabledb_core::TdbResult<()> {
//! let mut db = Database::open_in_memory()?;
//! db.execute_sql(
//!     "CREATE TABLE A (id INT PRIMARY KEY, x INT);
//!      CREATE TABLE B (id INT PRIMARY KEY, a_id INT);
//!      INSERT INTO A VALUES (1, 10), (2, 20);
//!      INSERT INTO B VALUES (1, 1), (2, 2)",
//! )?;
//! let results = db.execute_sql("SELECT * FROM A JOIN B ON A.id = B.a_id")?;
//! println!("{}", results[0].rows().map(|rs| rs.pretty()).transpose()?.unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## 모듈 구조
//!
//! - [`index`] — B+Tree 인덱스와 키 범위 추정
//! - [`catalog`] — 테이블 레지스트리, 스키마, 행 저장소
//! - [`sql`] — 조건 타입, PredicateEvaluator, SQL 파서/플래너
//! - [`engine`] — 데이터베이스 엔진 ([`Database`])
//! - [`api`] — 타입 레코드 트레이트
//! - [`config`] — 엔진 설정

// Lets `#[derive(TableRecord)]` output (`::tabledb_core::...`) resolve inside this crate too.
extern crate self as tabledb_core;

pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod sql;
pub mod value;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use catalog::{Catalog, Column, Row, Table};
pub use config::EngineConfig;
pub use engine::{Database, ExecutionResult, MutationSummary, ResultSet};
pub use error::{ErrorKind, TdbError, TdbResult};
pub use index::{BPlusTree, KeyRange, Locator};
pub use sql::{
    Assignment, CompareOp, Connective, JoinPredicate, LogicalPlan, Predicate, PredicateEvaluator,
    Projection,
};
pub use value::{DataType, Value};

// Re-export derive macros
pub use tabledb_derive::TableRecord;
