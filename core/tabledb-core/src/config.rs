// 엔진 설정
//
// 기본값 → JSON → 환경 변수 순서로 덮어쓸 수 있다.

use crate::error::{TdbError, TdbResult};
use crate::sql::evaluator::DEFAULT_FLOAT_EPSILON;
use serde::{Deserialize, Serialize};

/// Environment variable toggling the index-accelerated scan.
pub const ENV_INDEX_SCAN: &str = "TDB_INDEX_SCAN";
/// Environment variable overriding the Float equality tolerance.
pub const ENV_FLOAT_EPSILON: &str = "TDB_FLOAT_EPSILON";

/// 엔진 동작 설정
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Use the ordered index to narrow candidate rows for filters on the
    /// indexed column. Results are identical either way.
    pub index_scan: bool,

    /// Absolute tolerance for Float `=` / `!=`.
    pub float_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index_scan: true,
            float_epsilon: DEFAULT_FLOAT_EPSILON,
        }
    }
}

impl EngineConfig {
    pub fn with_index_scan(mut self, enabled: bool) -> Self {
        self.index_scan = enabled;
        self
    }

    /// Set the Float tolerance; must be positive and finite.
    pub fn with_float_epsilon(mut self, epsilon: f64) -> TdbResult<Self> {
        validate_epsilon(epsilon)?;
        self.float_epsilon = epsilon;
        Ok(self)
    }

    /// Parse from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> TdbResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        validate_epsilon(config.float_epsilon)?;
        Ok(config)
    }

    /// 환경 변수에서 로드 (`TDB_INDEX_SCAN`, `TDB_FLOAT_EPSILON`)
    pub fn from_env() -> TdbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> TdbResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_INDEX_SCAN) {
            config.index_scan = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => true,
                "0" | "false" | "off" | "no" => false,
                other => {
                    return Err(TdbError::Config(format!(
                        "{ENV_INDEX_SCAN}: expected a boolean, got '{other}'"
                    )));
                }
            };
        }

        if let Some(value) = lookup(ENV_FLOAT_EPSILON) {
            let epsilon = value.trim().parse::<f64>().map_err(|e| {
                TdbError::Config(format!("{ENV_FLOAT_EPSILON}: {e}"))
            })?;
            config = config.with_float_epsilon(epsilon)?;
        }

        Ok(config)
    }
}

fn validate_epsilon(epsilon: f64) -> TdbResult<()> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(TdbError::Config(format!(
            "float_epsilon must be positive and finite, got {epsilon}"
        )))
    }
}
