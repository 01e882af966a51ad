//! Error types for the export library.

use thiserror::Error;

/// Main error type for script-export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Configuration error (unknown dialect, invalid options file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema model violation (duplicate names, empty entity names,
    /// key columns that do not exist on their table).
    #[error("Schema integrity error: {0}")]
    SchemaIntegrity(String),

    /// A value cannot be rendered as a literal of its declared type.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// IO error (writing the output sink, reading a row cursor).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error (export options files).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ExportError {
    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        ExportError::Config(message.into())
    }

    /// Create a SchemaIntegrity error.
    pub fn schema(message: impl Into<String>) -> Self {
        ExportError::SchemaIntegrity(message.into())
    }

    /// Create a DataFormat error.
    pub fn data_format(message: impl Into<String>) -> Self {
        ExportError::DataFormat(message.into())
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
