//! Predicate evaluation against a single row.
//!
//! Evaluation fails closed: an unknown column, an operator the column type
//! does not support, or a value that cannot be coerced makes the predicate
//! false. Nothing propagates out as an error.

use crate::catalog::Column;
use crate::sql::predicate::{CompareOp, Connective, Predicate};
use crate::value::{DataType, Value};
use std::cmp::Ordering;

/// Default absolute tolerance for Float `=` / `!=`.
pub const DEFAULT_FLOAT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct PredicateEvaluator {
    float_epsilon: f64,
}

impl Default for PredicateEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_FLOAT_EPSILON)
    }
}

impl PredicateEvaluator {
    pub fn new(float_epsilon: f64) -> Self {
        Self { float_epsilon }
    }

    pub fn float_epsilon(&self) -> f64 {
        self.float_epsilon
    }

    /// Evaluate one predicate against `row`, resolving the column in `schema`.
    pub fn evaluate(&self, row: &[Value], predicate: &Predicate, schema: &[Column]) -> bool {
        let Some(idx) = schema.iter().position(|c| c.name == predicate.column) else {
            return false;
        };
        let Some(cell) = row.get(idx) else {
            return false;
        };
        match schema[idx].data_type {
            DataType::Integer => self.eval_integer(cell, predicate),
            DataType::Float => self.eval_float(cell, predicate),
            DataType::Text => eval_text(cell, predicate),
        }
    }

    /// Left fold over `predicates`; each predicate's connective decides how it
    /// joins the result so far. No precedence: `[A, B or, C and]` is `(A ∨ B) ∧ C`.
    /// An empty list matches every row.
    pub fn evaluate_all(&self, row: &[Value], predicates: &[Predicate], schema: &[Column]) -> bool {
        let Some((first, rest)) = predicates.split_first() else {
            return true;
        };
        rest.iter()
            .fold(self.evaluate(row, first, schema), |acc, p| {
                match p.connective {
                    Connective::Or => acc || self.evaluate(row, p, schema),
                    Connective::And => acc && self.evaluate(row, p, schema),
                }
            })
    }

    fn eval_integer(&self, cell: &Value, predicate: &Predicate) -> bool {
        let Value::Integer(a) = cell else {
            return false;
        };
        let Ok(b) = predicate.value.to_key() else {
            return false;
        };
        ordering_matches(a.cmp(&b), predicate.op)
    }

    fn eval_float(&self, cell: &Value, predicate: &Predicate) -> bool {
        let a = match cell {
            Value::Float(v) => *v,
            Value::Integer(v) => *v as f64,
            Value::Text(_) => return false,
        };
        let Some(b) = predicate.value.as_f64() else {
            return false;
        };
        let close = (a - b).abs() < self.float_epsilon;
        match predicate.op {
            CompareOp::Eq => close,
            CompareOp::NotEq => !close,
            CompareOp::Gt => a > b,
            CompareOp::Lt => a < b,
            CompareOp::GtEq => a >= b,
            CompareOp::LtEq => a <= b,
        }
    }
}

fn eval_text(cell: &Value, predicate: &Predicate) -> bool {
    let Value::Text(a) = cell else {
        return false;
    };
    let b = predicate.value.to_string();
    let ord = a.trim().cmp(b.trim());
    match predicate.op {
        CompareOp::Eq | CompareOp::NotEq | CompareOp::Gt | CompareOp::Lt => {
            ordering_matches(ord, predicate.op)
        }
        CompareOp::GtEq | CompareOp::LtEq => false,
    }
}

fn ordering_matches(ord: Ordering, op: CompareOp) -> bool {
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::NotEq => ord != Ordering::Equal,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::GtEq => ord != Ordering::Less,
        CompareOp::LtEq => ord != Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<Column> {
        vec![
            Column::primary_key("id", DataType::Integer),
            Column::new("score", DataType::Float),
            Column::new("name", DataType::Text),
        ]
    }

    fn row(id: i64, score: f64, name: &str) -> Vec<Value> {
        vec![id.into(), score.into(), name.into()]
    }

    #[test]
    fn test_integer_operators() {
        let ev = PredicateEvaluator::default();
        let s = schema();
        let r = row(5, 0.0, "x");
        assert!(ev.evaluate(&r, &Predicate::eq("id", 5), &s));
        assert!(ev.evaluate(&r, &Predicate::not_eq("id", 4), &s));
        assert!(ev.evaluate(&r, &Predicate::gt("id", 4), &s));
        assert!(ev.evaluate(&r, &Predicate::lt_eq("id", 5), &s));
        assert!(!ev.evaluate(&r, &Predicate::lt("id", 5), &s));
        // value coercion: float truncated, text parsed
        assert!(ev.evaluate(&r, &Predicate::eq("id", 5.7), &s));
        assert!(ev.evaluate(&r, &Predicate::eq("id", " 5 "), &s));
        assert!(!ev.evaluate(&r, &Predicate::eq("id", "five"), &s));
    }

    #[test]
    fn test_float_tolerance() {
        let ev = PredicateEvaluator::default();
        let s = schema();
        let r = row(1, 0.1 + 0.2, "x");
        assert!(ev.evaluate(&r, &Predicate::eq("score", 0.3), &s));
        assert!(!ev.evaluate(&r, &Predicate::not_eq("score", 0.3), &s));
        assert!(ev.evaluate(&r, &Predicate::gt("score", 0.2), &s));
        assert!(!ev.evaluate(&r, &Predicate::eq("score", 0.31), &s));

        let loose = PredicateEvaluator::new(0.05);
        assert!(loose.evaluate(&r, &Predicate::eq("score", 0.31), &s));
    }

    #[test]
    fn test_text_operators() {
        let ev = PredicateEvaluator::default();
        let s = schema();
        let r = row(1, 0.0, "  bob ");
        assert!(ev.evaluate(&r, &Predicate::eq("name", "bob"), &s));
        assert!(ev.evaluate(&r, &Predicate::gt("name", "alice"), &s));
        assert!(ev.evaluate(&r, &Predicate::lt("name", "carol"), &s));
        assert!(ev.evaluate(&r, &Predicate::not_eq("name", "bobby"), &s));
        // >= and <= are not defined for text
        assert!(!ev.evaluate(&r, &Predicate::gt_eq("name", "bob"), &s));
        assert!(!ev.evaluate(&r, &Predicate::lt_eq("name", "bob"), &s));
    }

    #[test]
    fn test_unknown_column_is_false() {
        let ev = PredicateEvaluator::default();
        assert!(!ev.evaluate(&row(1, 0.0, "a"), &Predicate::eq("nope", 1), &schema()));
    }

    #[test]
    fn test_evaluate_all_left_fold() {
        let ev = PredicateEvaluator::default();
        let s = schema();
        let r = row(1, 0.0, "a");
        let a_false = Predicate::eq("id", 2);
        let a_true = Predicate::eq("id", 1);
        let b_true = Predicate::eq("name", "a");
        let b_false = Predicate::eq("name", "z");

        assert!(ev.evaluate_all(&r, &[], &s));
        // A false, B true with OR: rescued
        assert!(ev.evaluate_all(&r, &[a_false.clone(), b_true.clone().or()], &s));
        // A true, B false with AND: fails
        assert!(!ev.evaluate_all(&r, &[a_true.clone(), b_false.clone().and()], &s));
        // A false, B true with AND: fails
        assert!(!ev.evaluate_all(&r, &[a_false.clone(), b_true.clone()], &s));
        // no precedence: (true OR x) AND false == false
        assert!(!ev.evaluate_all(&r, &[a_true, b_false.clone().or(), a_false.clone()], &s));
        // (false AND x) OR true == true
        assert!(ev.evaluate_all(&r, &[a_false, b_false, b_true.or()], &s));
    }

    #[test]
    fn test_first_connective_ignored() {
        let ev = PredicateEvaluator::default();
        let s = schema();
        let r = row(1, 0.0, "a");
        assert!(ev.evaluate_all(&r, &[Predicate::eq("id", 1).or()], &s));
    }
}
