//! Transform registry keyed by table name

use std::collections::HashMap;

use super::tables::*;
use super::traits::*;

/// Table name to transform lookup.
pub struct TransformRegistry {
    transforms: HashMap<&'static str, Box<dyn TableTransform>>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformRegistry {
    /// Create a registry with the built-in transforms
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Box::new(PackagesTransform));
        registry.register(Box::new(MembersTransform));

        registry
    }

    /// Create a registry with no transforms
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Register a transform, returning the one it replaces for the same table
    pub fn register(&mut self, transform: Box<dyn TableTransform>) -> Option<Box<dyn TableTransform>> {
        self.transforms.insert(transform.table(), transform)
    }

    pub fn get(&self, table: &str) -> Option<&dyn TableTransform> {
        self.transforms.get(table).map(|t| t.as_ref())
    }

    /// Take the transform for `table` out of the registry
    pub fn resolve(mut self, table: &str) -> Option<Box<dyn TableTransform>> {
        self.transforms.remove(table)
    }

    /// Registered table names, sorted
    pub fn tables(&self) -> Vec<&'static str> {
        let mut tables: Vec<_> = self.transforms.keys().copied().collect();
        tables.sort_unstable();
        tables
    }
}
