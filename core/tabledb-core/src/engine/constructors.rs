//! Database Constructors — factory methods for creating Database instances

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::engine::Database;
use crate::error::{TdbError, TdbResult};
use crate::sql::evaluator::PredicateEvaluator;
use crate::sql::parser::SqlParser;
use tracing::{info, instrument};

impl Database {
    /// 기본 설정으로 인메모리 데이터베이스를 생성합니다.
    ///
    /// # 예제
    ///
    /// ```rust
    /// use tabledb_core::Database;
    ///
    /// # fn main() -> tabledb_core::TdbResult<()> {
    /// let db = Database::open_in_memory()?;
    /// assert!(db.table_names().is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn open_in_memory() -> TdbResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// 지정된 설정으로 데이터베이스를 생성합니다.
    #[instrument]
    pub fn with_config(config: EngineConfig) -> TdbResult<Self> {
        if !(config.float_epsilon.is_finite() && config.float_epsilon > 0.0) {
            return Err(TdbError::Config(format!(
                "float_epsilon must be positive and finite, got {}",
                config.float_epsilon
            )));
        }
        info!(index_scan = config.index_scan, "Opening in-memory database");
        Ok(Self {
            catalog: Catalog::new(),
            evaluator: PredicateEvaluator::new(config.float_epsilon),
            config,
            sql_parser: SqlParser::new(),
        })
    }

    /// 환경 변수(`TDB_INDEX_SCAN`, `TDB_FLOAT_EPSILON`)로 설정을 읽어 생성합니다.
    pub fn from_env() -> TdbResult<Self> {
        Self::with_config(EngineConfig::from_env()?)
    }
}

impl Default for Database {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            catalog: Catalog::new(),
            evaluator: PredicateEvaluator::new(config.float_epsilon),
            config,
            sql_parser: SqlParser::new(),
        }
    }
}
