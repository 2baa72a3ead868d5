//! Table-to-normalizer resolution.
//!
//! The source-of-truth store feeds rows from named tables, and each
//! table has exactly one [`DocumentNormalizer`]. The map is populated
//! once at process start — resolution afterwards is a plain lookup, with
//! no runtime type inspection involved.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::PolicyConfig;
use crate::normalize::{DocumentNormalizer, ImageNormalizer};
use crate::policy::{TableAuthorityScorer, TableCategoryClassifier};

/// Handler map from source-table identifier to its normalizer.
#[derive(Default)]
pub struct NormalizerRegistry {
    by_table: HashMap<String, Arc<dyn DocumentNormalizer>>,
}

impl NormalizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `image` normalizer wired to the
    /// table-backed policy collaborators from `config`.
    pub fn with_defaults(config: &PolicyConfig) -> Self {
        let mut registry = Self::new();
        let categories = Arc::new(TableCategoryClassifier::new(&config.categories));
        let authority = Arc::new(TableAuthorityScorer::new(&config.authority));
        registry.register(Arc::new(ImageNormalizer::new(categories, authority)));
        registry
    }

    /// Register a normalizer under its table name. A later registration
    /// for the same table replaces the earlier one.
    pub fn register(&mut self, normalizer: Arc<dyn DocumentNormalizer>) {
        debug!(table = normalizer.table(), "registered document normalizer");
        self.by_table
            .insert(normalizer.table().to_string(), normalizer);
    }

    /// Resolve the normalizer for a table, or `None` for unknown tables.
    pub fn get(&self, table: &str) -> Option<Arc<dyn DocumentNormalizer>> {
        self.by_table.get(table).cloned()
    }

    /// Registered table names, sorted.
    pub fn tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = self.by_table.keys().map(String::as_str).collect();
        tables.sort_unstable();
        tables
    }

    pub fn len(&self) -> usize {
        self.by_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_table.is_empty()
    }
}
