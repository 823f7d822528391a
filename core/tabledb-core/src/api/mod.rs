//! API 모듈 — 타입 기반 레코드 API
//!
//! ColumnType, FromValue, IntoValue, FromRow, IntoRow, TableRecord 트레이트 제공

pub mod traits;

pub use traits::{ColumnType, FromRow, FromValue, IntoRow, IntoValue, TableRecord, column_value};
