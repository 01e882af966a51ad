//! Core abstractions: the schema model, value types, traits, and registry.

pub mod catalog;
pub mod collection;
pub mod schema;
pub mod traits;
pub mod value;

pub use catalog::DialectCatalog;
pub use collection::{Named, NamedCollection};
pub use schema::{
    Column, ColumnAttributes, DataType, Database, ForeignKey, ForeignKeyRule, IdentitySpec,
    Index, PrimaryKey, Table, TypeKind,
};
pub use traits::{Dialect, RowSet, RowSource, SchemaVisitor};
pub use value::ScriptValue;
