//! Registry of tables by name.
//!
//! The catalog exclusively owns every [`Table`]; lookups hand out borrows.
//! Tables live until the catalog is dropped (there is no DROP TABLE).

pub mod table;

pub use table::{Column, Row, Table};

use crate::error::{TdbError, TdbResult};
use ahash::AHashMap;

#[derive(Debug, Default)]
pub struct Catalog {
    tables: AHashMap<String, Table>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new table. Fails if the name is taken or the schema is invalid.
    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> TdbResult<&Table> {
        if self.tables.contains_key(name) {
            return Err(TdbError::TableAlreadyExists(name.to_string()));
        }
        let table = Table::new(name, columns)?;
        Ok(self.tables.entry(name.to_string()).or_insert(table))
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Lookup failing with `TableNotFound`.
    pub fn table(&self, name: &str) -> TdbResult<&Table> {
        self.get(name)
            .ok_or_else(|| TdbError::TableNotFound(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> TdbResult<&mut Table> {
        self.get_mut(name)
            .ok_or_else(|| TdbError::TableNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Registered table names, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
