//! Database Engine Module

pub mod constructors;
pub mod crud;
pub mod database;
pub mod join;
pub mod records;
pub mod result;
pub mod sql_interface;

pub use database::Database;
pub use result::{ExecutionResult, MutationSummary, ResultSet};
