//! PostgreSQL dialect.

use crate::core::collection::Named;
use crate::core::schema::{Column, DataType, Database, TypeKind};
use crate::core::traits::{hex_string, quote_literal, wrap_ident, Dialect};

use super::{decimal_spelling, sized};

/// PostgreSQL dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
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
            TypeKind::Boolean => "boolean".to_string(),
            // No unsigned types; widen by one step instead.
            TypeKind::Int8 | TypeKind::Int16 | TypeKind::UInt8 => "smallint".to_string(),
            TypeKind::Int32 | TypeKind::UInt16 => "integer".to_string(),
            TypeKind::Int64 | TypeKind::UInt32 => "bigint".to_string(),
            TypeKind::UInt64 => "numeric(20, 0)".to_string(),
            TypeKind::Float32 => "real".to_string(),
            TypeKind::Float64 => "double precision".to_string(),
            TypeKind::Currency => "numeric(19, 4)".to_string(),
            TypeKind::Decimal => decimal_spelling("numeric", precision, scale),
            TypeKind::Date => "date".to_string(),
            TypeKind::Time => "time".to_string(),
            TypeKind::DateTime => "timestamp".to_string(),
            TypeKind::Char | TypeKind::NChar => sized("char", size),
            TypeKind::VarChar | TypeKind::NVarChar => {
                if size > 0 {
                    format!("varchar({})", size)
                } else {
                    "text".to_string()
                }
            }
            TypeKind::Text => "text".to_string(),
            TypeKind::Blob => "bytea".to_string(),
            TypeKind::Bit => {
                if size <= 1 {
                    "boolean".to_string()
                } else {
                    format!("bit({})", size)
                }
            }
            TypeKind::Guid => "uuid".to_string(),
            TypeKind::RowVersion => "bytea".to_string(),
            TypeKind::Xml => "xml".to_string(),
            TypeKind::Json => "json".to_string(),
            TypeKind::Geometry => "text".to_string(),
            TypeKind::Unknown => native.to_string(),
        }
    }

    fn supports_db_creation(&self) -> bool {
        true
    }

    fn database_preamble(&self, database: &Database) -> Vec<String> {
        // No USE statement; the executor connects to the new database.
        vec![format!("CREATE DATABASE {}", self.escape(database.name()))]
    }

    fn identity_type_name(&self, column: &Column) -> Option<String> {
        let spelling = match column.kind {
            TypeKind::Int64 | TypeKind::UInt32 | TypeKind::UInt64 => "bigserial",
            _ => "serial",
        };
        Some(spelling.to_string())
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    fn blob_literal(&self, bytes: &[u8]) -> String {
        format!("'\\x{}'", hex_string(bytes))
    }

    fn data_type_definition(&self, data_type: &DataType) -> Option<String> {
        if data_type.is_enum {
            let values = data_type
                .values
                .iter()
                .map(|v| quote_literal(v))
                .collect::<Vec<_>>()
                .join(", ");
            return Some(format!(
                "CREATE TYPE {} AS ENUM ({})",
                self.escape(data_type.name()),
                values
            ));
        }

        let mut definition = format!(
            "CREATE DOMAIN {} AS {}",
            self.escape(data_type.name()),
            self.type_name(
                data_type.kind,
                &data_type.native_type,
                data_type.size,
                data_type.precision,
                data_type.scale,
            )
        );
        if let Some(default) = &data_type.default_value {
            definition.push_str(&format!(" DEFAULT {}", default));
        }
        if !data_type.nullable {
            definition.push_str(" NOT NULL");
        }
        Some(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ScriptValue;

    #[test]
    fn test_escape() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.escape("users"), "\"users\"");
        assert_eq!(dialect.escape("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_type_names() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.type_name(TypeKind::Boolean, "", 0, 0, 0), "boolean");
        assert_eq!(dialect.type_name(TypeKind::Int32, "", 0, 0, 0), "integer");
        assert_eq!(dialect.type_name(TypeKind::UInt32, "", 0, 0, 0), "bigint");
        assert_eq!(
            dialect.type_name(TypeKind::Float64, "", 0, 0, 0),
            "double precision"
        );
        assert_eq!(
            dialect.type_name(TypeKind::Decimal, "", 0, 12, 3),
            "numeric(12, 3)"
        );
        assert_eq!(dialect.type_name(TypeKind::VarChar, "", 0, 0, 0), "text");
        assert_eq!(dialect.type_name(TypeKind::Guid, "", 0, 0, 0), "uuid");
        assert_eq!(dialect.type_name(TypeKind::Blob, "", 0, 0, 0), "bytea");
    }

    #[test]
    fn test_identity_substitution() {
        let dialect = PostgresDialect::new();
        let mut big = Column::new("id", TypeKind::Int64, "bigint").unwrap();
        big.set_identity(1, 1);
        assert_eq!(
            dialect.identity_type_name(&big),
            Some("bigserial".to_string())
        );

        let mut small = Column::new("id", TypeKind::Int32, "int").unwrap();
        small.set_identity(1, 1);
        assert_eq!(
            dialect.identity_type_name(&small),
            Some("serial".to_string())
        );
    }

    #[test]
    fn test_boolean_literal() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect
                .format_value(&ScriptValue::Bool(true), TypeKind::Boolean)
                .unwrap(),
            "TRUE"
        );
        assert_eq!(
            dialect
                .format_value(&ScriptValue::Bool(false), TypeKind::Boolean)
                .unwrap(),
            "FALSE"
        );
    }

    #[test]
    fn test_blob_literal() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.blob_literal(&[0xDE, 0xAD]), "'\\xDEAD'");
    }

    #[test]
    fn test_enum_data_type() {
        let dialect = PostgresDialect::new();
        let mut mood = DataType::new("mood", TypeKind::VarChar, "varchar").unwrap();
        mood.is_enum = true;
        mood.values = vec!["sad".to_string(), "ok".to_string(), "happy".to_string()];
        assert_eq!(
            dialect.data_type_definition(&mood).unwrap(),
            "CREATE TYPE \"mood\" AS ENUM ('sad', 'ok', 'happy')"
        );
    }

    #[test]
    fn test_domain_data_type() {
        let dialect = PostgresDialect::new();
        let mut code = DataType::new("country_code", TypeKind::Char, "char").unwrap();
        code.size = 3;
        code.nullable = false;
        code.default_value = Some("'XXX'".to_string());
        assert_eq!(
            dialect.data_type_definition(&code).unwrap(),
            "CREATE DOMAIN \"country_code\" AS char(3) DEFAULT 'XXX' NOT NULL"
        );
    }

    #[test]
    fn test_preamble_has_no_use() {
        let dialect = PostgresDialect::new();
        let db = Database::new("world").unwrap();
        assert_eq!(
            dialect.database_preamble(&db),
            vec!["CREATE DATABASE \"world\"".to_string()]
        );
    }
}
