//! # sqlexport
//!
//! Multi-dialect SQL schema and data export script generator.
//!
//! This library turns a dialect-neutral schema model into syntactically
//! correct DDL/DML text for SQL Server, Oracle, MySQL, PostgreSQL, SQLite,
//! or Firebird, with support for:
//!
//! - **One normalized schema model** shared by every target dialect
//! - **Selective export** of schema, data, and constraint classes
//! - **Streamed data export** from an external row source
//! - **Schema assembly** from an external metadata collaborator
//!
//! ## Example
//!
//! ```rust,no_run
//! use sqlexport::{Database, DialectCatalog, ExportOptions, ScriptGenerator};
//!
//! fn main() -> sqlexport::Result<()> {
//!     let database = Database::new("world")?;
//!     let catalog = DialectCatalog::with_builtins();
//!     let dialect = catalog.require("postgres")?;
//!
//!     let mut script = Vec::new();
//!     let mut generator =
//!         ScriptGenerator::new(dialect.as_ref(), ExportOptions::default(), &mut script);
//!     generator.generate(&database)?;
//!     println!("{}", String::from_utf8_lossy(&script));
//!     Ok(())
//! }
//! ```

pub mod assembly;
pub mod config;
pub mod core;
pub mod dialects;
pub mod engine;
pub mod error;
pub mod memory;

// Re-exports for convenient access
pub use assembly::{assemble, MetadataMap, MetadataProvider};
pub use config::ExportOptions;
pub use core::{
    Column, ColumnAttributes, DataType, Database, Dialect, DialectCatalog, ForeignKey,
    ForeignKeyRule, IdentitySpec, Index, Named, NamedCollection, PrimaryKey, RowSet, RowSource,
    SchemaVisitor, ScriptValue, Table, TypeKind,
};
pub use engine::{ScriptGenerator, ScriptWriter};
pub use error::{ExportError, Result};
pub use memory::{MemoryMetadata, MemoryRows};
