//! SQL 플래너 모듈
//!
//! sqlparser AST를 엔진이 실행하는 LogicalPlan으로 변환합니다.

pub mod logical;
pub mod types;

pub use logical::LogicalPlanner;
pub use types::LogicalPlan;
