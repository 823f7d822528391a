//! Key-range estimation for index-accelerated scans.

use crate::error::TdbResult;
use crate::sql::{CompareOp, Predicate};

/// Inclusive `[min, max]` range of index keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    pub min: i64,
    pub max: i64,
}

impl KeyRange {
    pub const FULL: KeyRange = KeyRange {
        min: i64::MIN,
        max: i64::MAX,
    };

    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Translate one comparison on the indexed column into a key range.
    ///
    /// `!=` selects two disjoint ranges and is not estimable (`Ok(None)`).
    /// Strict bounds saturate at the integer domain: `> i64::MAX` yields an
    /// empty range.
    pub fn from_predicate(predicate: &Predicate) -> TdbResult<Option<KeyRange>> {
        let v = predicate.value.to_key()?;
        let range = match predicate.op {
            CompareOp::Eq => KeyRange::new(v, v),
            CompareOp::Gt => match v.checked_add(1) {
                Some(lo) => KeyRange::new(lo, i64::MAX),
                None => KeyRange::empty(),
            },
            CompareOp::GtEq => KeyRange::new(v, i64::MAX),
            CompareOp::Lt => match v.checked_sub(1) {
                Some(hi) => KeyRange::new(i64::MIN, hi),
                None => KeyRange::empty(),
            },
            CompareOp::LtEq => KeyRange::new(i64::MIN, v),
            CompareOp::NotEq => return Ok(None),
        };
        Ok(Some(range))
    }

    /// A range containing no key (`min > max`).
    pub fn empty() -> Self {
        Self { min: 1, max: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, key: i64) -> bool {
        key >= self.min && key <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_ranges_per_operator() {
        let r = |p: Predicate| KeyRange::from_predicate(&p).unwrap();
        assert_eq!(r(Predicate::eq("id", 5)), Some(KeyRange::new(5, 5)));
        assert_eq!(r(Predicate::gt("id", 5)), Some(KeyRange::new(6, i64::MAX)));
        assert_eq!(r(Predicate::gt_eq("id", 5)), Some(KeyRange::new(5, i64::MAX)));
        assert_eq!(r(Predicate::lt("id", 5)), Some(KeyRange::new(i64::MIN, 4)));
        assert_eq!(r(Predicate::lt_eq("id", 5)), Some(KeyRange::new(i64::MIN, 5)));
        assert_eq!(r(Predicate::not_eq("id", 5)), None);
    }

    #[test]
    fn test_value_coercion() {
        let p = Predicate::gt_eq("id", Value::Float(2.9));
        assert_eq!(
            KeyRange::from_predicate(&p).unwrap(),
            Some(KeyRange::new(2, i64::MAX))
        );
        let bad = Predicate::eq("id", "abc");
        assert!(KeyRange::from_predicate(&bad).is_err());
    }

    #[test]
    fn test_saturation() {
        let gt_max = KeyRange::from_predicate(&Predicate::gt("id", i64::MAX))
            .unwrap()
            .unwrap();
        assert!(gt_max.is_empty());
        let lt_min = KeyRange::from_predicate(&Predicate::lt("id", i64::MIN))
            .unwrap()
            .unwrap();
        assert!(lt_min.is_empty());
        assert!(KeyRange::FULL.contains(0));
    }
}
