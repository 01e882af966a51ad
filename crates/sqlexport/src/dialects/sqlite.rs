//! SQLite dialect.
//!
//! SQLite has no ALTER TABLE ... ADD CONSTRAINT, so every constraint is
//! declared inline in CREATE TABLE, and the file itself is the database so
//! no creation preamble exists.

use crate::core::collection::Named;
use crate::core::schema::{Column, Index, Table, TypeKind};
use crate::core::traits::{wrap_ident, Dialect};

use super::{decimal_spelling, sized};

/// SQLite dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Create a new SQLite dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn escape(&self, ident: &str) -> String {
        wrap_ident(ident, '"', '"')
    }

    fn type_name(
        &self,
        kind: TypeKind,
        native: &str,
        size: i32,
        precision: i32,
        scale: i32,
    ) -> String {
        match kind {
            TypeKind::Boolean
            | TypeKind::Int8
            | TypeKind::Int16
            | TypeKind::Int32
            | TypeKind::Int64
            | TypeKind::UInt8
            | TypeKind::UInt16
            | TypeKind::UInt32
            | TypeKind::UInt64 => "integer".to_string(),
            TypeKind::Float32 | TypeKind::Float64 => "real".to_string(),
            TypeKind::Currency => "numeric".to_string(),
            TypeKind::Decimal => decimal_spelling("numeric", precision, scale),
            TypeKind::Date => "date".to_string(),
            TypeKind::Time => "time".to_string(),
            TypeKind::DateTime => "datetime".to_string(),
            TypeKind::Char | TypeKind::NChar => sized("char", size),
            TypeKind::VarChar | TypeKind::NVarChar => {
                if size > 0 {
                    format!("varchar({})", size)
                } else {
                    "text".to_string()
                }
            }
            TypeKind::Text | TypeKind::Xml | TypeKind::Json => "text".to_string(),
            TypeKind::Blob | TypeKind::Bit | TypeKind::RowVersion | TypeKind::Geometry => {
                "blob".to_string()
            }
            TypeKind::Guid => "char(36)".to_string(),
            TypeKind::Unknown => native.to_string(),
        }
    }

    fn require_inline_constraints(&self) -> bool {
        true
    }

    fn identity_type_name(&self, _column: &Column) -> Option<String> {
        // Auto-increment works only through the rowid; force the column
        // onto it regardless of the original type kind.
        Some("integer NOT NULL UNIQUE".to_string())
    }

    fn index_name(&self, table: &Table, index: &Index) -> String {
        // Index names share one global namespace; derive a slug from the
        // table and member columns.
        let slug = format!("{}_{}_idx", table.name(), index.columns().join("_"));
        self.escape(&slug)
    }
}
