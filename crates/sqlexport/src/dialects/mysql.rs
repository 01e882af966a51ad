//! MySQL / MariaDB dialect.

use crate::core::schema::{IdentitySpec, Table, TypeKind};
use crate::core::traits::{wrap_ident, Dialect};

use super::{decimal_spelling, sized};

/// MySQL dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn escape(&self, ident: &str) -> String {
        wrap_ident(ident, '`', '`')
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
            TypeKind::Boolean => "tinyint(1)".to_string(),
            TypeKind::Int8 => "tinyint".to_string(),
            TypeKind::Int16 => "smallint".to_string(),
            TypeKind::Int32 => "int".to_string(),
            TypeKind::Int64 => "bigint".to_string(),
            TypeKind::UInt8 => "tinyint unsigned".to_string(),
            TypeKind::UInt16 => "smallint unsigned".to_string(),
            TypeKind::UInt32 => "int unsigned".to_string(),
            TypeKind::UInt64 => "bigint unsigned".to_string(),
            TypeKind::Float32 => "float".to_string(),
            TypeKind::Float64 => "double".to_string(),
            TypeKind::Currency => "decimal(19, 4)".to_string(),
            TypeKind::Decimal => decimal_spelling("decimal", precision, scale),
            TypeKind::Date => "date".to_string(),
            TypeKind::Time => "time".to_string(),
            TypeKind::DateTime => "datetime".to_string(),
            TypeKind::Char | TypeKind::NChar => sized("char", size),
            TypeKind::VarChar | TypeKind::NVarChar => {
                if size > 0 {
                    format!("varchar({})", size)
                } else {
                    "longtext".to_string()
                }
            }
            TypeKind::Text => "longtext".to_string(),
            TypeKind::Blob => "longblob".to_string(),
            TypeKind::Bit => format!("bit({})", size.max(1)),
            TypeKind::Guid => "char(36)".to_string(),
            TypeKind::RowVersion => "timestamp".to_string(),
            TypeKind::Xml => "longtext".to_string(),
            TypeKind::Json => "json".to_string(),
            TypeKind::Geometry => "geometry".to_string(),
            TypeKind::Unknown => native.to_string(),
        }
    }

    fn supports_db_creation(&self) -> bool {
        true
    }

    fn identity_clause(&self, _identity: IdentitySpec) -> Option<String> {
        // Seed/increment are server-level settings; only the attribute is
        // expressible per column.
        Some(" AUTO_INCREMENT".to_string())
    }

    fn table_suffix(&self, _table: &Table) -> Option<String> {
        Some(" ENGINE=InnoDB".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ScriptValue;

    #[test]
    fn test_escape() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.escape("users"), "`users`");
        assert_eq!(dialect.escape("a`b"), "`a``b`");
    }

    #[test]
    fn test_type_names() {
        let dialect = MysqlDialect::new();
        assert_eq!(
            dialect.type_name(TypeKind::Boolean, "", 0, 0, 0),
            "tinyint(1)"
        );
        assert_eq!(
            dialect.type_name(TypeKind::UInt64, "", 0, 0, 0),
            "bigint unsigned"
        );
        assert_eq!(
            dialect.type_name(TypeKind::Decimal, "", 0, 10, 2),
            "decimal(10, 2)"
        );
        assert_eq!(
            dialect.type_name(TypeKind::VarChar, "", 120, 0, 0),
            "varchar(120)"
        );
        assert_eq!(dialect.type_name(TypeKind::Text, "", 0, 0, 0), "longtext");
        assert_eq!(dialect.type_name(TypeKind::Guid, "", 0, 0, 0), "char(36)");
    }

    #[test]
    fn test_identity_clause() {
        let dialect = MysqlDialect::new();
        assert_eq!(
            dialect.identity_clause(IdentitySpec {
                seed: 100,
                increment: 1
            }),
            Some(" AUTO_INCREMENT".to_string())
        );
    }

    #[test]
    fn test_boolean_literal() {
        let dialect = MysqlDialect::new();
        assert_eq!(
            dialect
                .format_value(&ScriptValue::Bool(true), TypeKind::Boolean)
                .unwrap(),
            "1"
        );
    }

    #[test]
    fn test_table_suffix() {
        let dialect = MysqlDialect::new();
        let table = Table::new("users", "").unwrap();
        assert_eq!(
            dialect.table_suffix(&table),
            Some(" ENGINE=InnoDB".to_string())
        );
    }
}
