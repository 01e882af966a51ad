//! Microsoft SQL Server dialect.

use crate::core::schema::{IdentitySpec, TypeKind};
use crate::core::traits::{hex_string, wrap_ident, Dialect};

use super::{decimal_spelling, sized};

/// Microsoft SQL Server dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create a new SQL Server dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn escape(&self, ident: &str) -> String {
        wrap_ident(ident, '[', ']')
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
            TypeKind::Boolean => "bit".to_string(),
            // No signed one-byte integer; widen to smallint.
            TypeKind::Int8 => "smallint".to_string(),
            TypeKind::Int16 => "smallint".to_string(),
            TypeKind::Int32 => "int".to_string(),
            TypeKind::Int64 => "bigint".to_string(),
            TypeKind::UInt8 => "tinyint".to_string(),
            TypeKind::UInt16 => "int".to_string(),
            TypeKind::UInt32 => "bigint".to_string(),
            TypeKind::UInt64 => "decimal(20, 0)".to_string(),
            TypeKind::Float32 => "real".to_string(),
            TypeKind::Float64 => "float".to_string(),
            TypeKind::Currency => "money".to_string(),
            TypeKind::Decimal => decimal_spelling("decimal", precision, scale),
            TypeKind::Date => "date".to_string(),
            TypeKind::Time => "time".to_string(),
            TypeKind::DateTime => "datetime".to_string(),
            TypeKind::Char => sized("char", size),
            TypeKind::NChar => sized("nchar", size),
            TypeKind::VarChar => {
                if size > 0 {
                    format!("varchar({})", size)
                } else {
                    "varchar(max)".to_string()
                }
            }
            TypeKind::NVarChar => {
                if size > 0 {
                    format!("nvarchar({})", size)
                } else {
                    "nvarchar(max)".to_string()
                }
            }
            TypeKind::Text => "nvarchar(max)".to_string(),
            TypeKind::Blob => "varbinary(max)".to_string(),
            TypeKind::Bit => {
                if size <= 1 {
                    "bit".to_string()
                } else {
                    format!("binary({})", (size + 7) / 8)
                }
            }
            TypeKind::Guid => "uniqueidentifier".to_string(),
            TypeKind::RowVersion => "timestamp".to_string(),
            TypeKind::Xml => "xml".to_string(),
            TypeKind::Json => "nvarchar(max)".to_string(),
            TypeKind::Geometry => "geometry".to_string(),
            TypeKind::Unknown => native.to_string(),
        }
    }

    fn supports_db_creation(&self) -> bool {
        true
    }

    fn supports_generated_row_version(&self) -> bool {
        true
    }

    fn statement_delimiter(&self) -> &'static str {
        ";\nGO"
    }

    fn identity_clause(&self, identity: IdentitySpec) -> Option<String> {
        Some(format!(
            " IDENTITY({}, {})",
            identity.seed, identity.increment
        ))
    }

    fn blob_literal(&self, bytes: &[u8]) -> String {
        format!("0x{}", hex_string(bytes))
    }
}
