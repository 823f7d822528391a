// SQL 모듈 진입점
pub mod evaluator;
pub mod parser;
pub mod planner;
pub mod predicate;

pub use evaluator::PredicateEvaluator;
pub use parser::SqlParser;
pub use planner::{LogicalPlan, LogicalPlanner};
pub use predicate::{Assignment, CompareOp, Connective, JoinPredicate, Predicate, Projection};
