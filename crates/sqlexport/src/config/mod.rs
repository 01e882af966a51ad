//! Export configuration loading.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_true() -> bool {
    true
}

/// Selection of what an export run emits.
///
/// The absence of a configuration means "export everything":
/// [`ExportOptions::default`] enables every section and constraint class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Emit DDL (CREATE TABLE, keys, indexes).
    #[serde(default = "default_true")]
    pub schema: bool,

    /// Emit DML (INSERT statements streamed from the row source).
    #[serde(default = "default_true")]
    pub data: bool,

    /// Emit PRIMARY KEY constraints.
    #[serde(default = "default_true")]
    pub primary_keys: bool,

    /// Emit FOREIGN KEY constraints.
    #[serde(default = "default_true")]
    pub foreign_keys: bool,

    /// Emit CREATE INDEX statements.
    #[serde(default = "default_true")]
    pub indexes: bool,

    /// Emit DEFAULT clauses on columns.
    #[serde(default = "default_true")]
    pub defaults: bool,

    /// Emit identity specifications and identity column values.
    #[serde(default = "default_true")]
    pub identities: bool,

    /// Provider-specific settings the core carries but never interprets
    /// (e.g. a target file directory or character set).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            schema: true,
            data: true,
            primary_keys: true,
            foreign_keys: true,
            indexes: true,
            defaults: true,
            identities: true,
            extensions: BTreeMap::new(),
        }
    }
}

impl ExportOptions {
    /// Load options from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse options from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Schema sections only, no data.
    pub fn schema_only() -> Self {
        Self {
            data: false,
            ..Self::default()
        }
    }

    /// Data only, no schema sections.
    pub fn data_only() -> Self {
        Self {
            schema: false,
            ..Self::default()
        }
    }
}
