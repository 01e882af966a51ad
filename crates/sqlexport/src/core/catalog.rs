//! Dialect registry for explicit dependency injection.
//!
//! The [`DialectCatalog`] maps dialect names to [`Dialect`] implementations.
//! It is explicitly constructed and handed to callers rather than living in
//! global state, keeping initialization deterministic and catalogs easy to
//! mock in tests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ExportError, Result};

use super::traits::Dialect;

/// Registry of target dialects.
///
/// # Example
///
/// ```rust,ignore
/// let catalog = DialectCatalog::with_builtins();
/// let dialect = catalog.require("postgres")?;
/// ```
#[derive(Default)]
pub struct DialectCatalog {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl DialectCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with all built-in target dialects registered.
    pub fn with_builtins() -> Self {
        use crate::dialects::{
            FirebirdDialect, MssqlDialect, MysqlDialect, OracleDialect, PostgresDialect,
            SqliteDialect,
        };

        let mut catalog = Self::new();
        catalog.register(Arc::new(MssqlDialect::new()));
        catalog.register(Arc::new(OracleDialect::new()));
        catalog.register(Arc::new(MysqlDialect::new()));
        catalog.register(Arc::new(PostgresDialect::new()));
        catalog.register(Arc::new(SqliteDialect::new()));
        catalog.register(Arc::new(FirebirdDialect::new()));
        catalog
    }

    /// Register a dialect under its own name.
    pub fn register(&mut self, dialect: Arc<dyn Dialect>) {
        self.dialects
            .insert(dialect.name().to_ascii_lowercase(), dialect);
    }

    /// Look up a dialect by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Look up a dialect, failing with a Config error for unknown names.
    pub fn require(&self, name: &str) -> Result<Arc<dyn Dialect>> {
        self.get(name).ok_or_else(|| {
            ExportError::config(format!(
                "unknown dialect '{}' (available: {})",
                name,
                self.names().join(", ")
            ))
        })
    }

    /// Registered dialect names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
