//! Firebird dialect.

use crate::core::collection::Named;
use crate::core::schema::{DataType, ForeignKey, IdentitySpec, Index, Table, TypeKind};
use crate::core::traits::{quote_literal, wrap_ident, Dialect};

use super::{decimal_spelling, sized};

/// Firebird dialect implementation.
///
/// The database must pre-exist; constraint names live in one global
/// namespace, so key names are synthesized from the table and the key's
/// position.
#[derive(Debug, Clone, Default)]
pub struct FirebirdDialect;

impl FirebirdDialect {
    /// Create a new Firebird dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for FirebirdDialect {
    fn name(&self) -> &'static str {
        "firebird"
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
            TypeKind::Int8 | TypeKind::Int16 | TypeKind::UInt8 => "smallint".to_string(),
            TypeKind::Int32 | TypeKind::UInt16 => "integer".to_string(),
            TypeKind::Int64 | TypeKind::UInt32 => "bigint".to_string(),
            TypeKind::UInt64 => "decimal(18, 0)".to_string(),
            TypeKind::Float32 => "float".to_string(),
            TypeKind::Float64 => "double precision".to_string(),
            TypeKind::Currency => "decimal(18, 4)".to_string(),
            TypeKind::Decimal => decimal_spelling("decimal", precision, scale),
            TypeKind::Date => "date".to_string(),
            TypeKind::Time => "time".to_string(),
            TypeKind::DateTime => "timestamp".to_string(),
            TypeKind::Char | TypeKind::NChar => sized("char", size),
            TypeKind::VarChar | TypeKind::NVarChar => {
                if size > 0 {
                    format!("varchar({})", size)
                } else {
                    "blob sub_type text".to_string()
                }
            }
            TypeKind::Text | TypeKind::Xml | TypeKind::Json => "blob sub_type text".to_string(),
            TypeKind::Blob | TypeKind::Bit | TypeKind::RowVersion | TypeKind::Geometry => {
                "blob".to_string()
            }
            TypeKind::Guid => "char(36)".to_string(),
            TypeKind::Unknown => native.to_string(),
        }
    }

    fn identity_clause(&self, identity: IdentitySpec) -> Option<String> {
        Some(format!(
            " GENERATED ALWAYS AS IDENTITY (START WITH {} INCREMENT BY {})",
            identity.seed, identity.increment
        ))
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    fn index_name(&self, table: &Table, index: &Index) -> String {
        let ordinal = table
            .indexes()
            .index_of(index.name())
            .map_or(1, |position| position + 1);
        self.escape(&format!("{}_IX{}", table.name(), ordinal))
    }

    fn foreign_key_name(&self, table: &Table, key: &ForeignKey) -> String {
        let ordinal = table
            .foreign_keys()
            .index_of(key.name())
            .map_or(1, |position| position + 1);
        self.escape(&format!("{}_FK{}", table.name(), ordinal))
    }

    fn data_type_definition(&self, data_type: &DataType) -> Option<String> {
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
        if data_type.is_enum && !data_type.values.is_empty() {
            let values = data_type
                .values
                .iter()
                .map(|v| quote_literal(v))
                .collect::<Vec<_>>()
                .join(", ");
            definition.push_str(&format!(" CHECK (VALUE IN ({}))", values));
        }
        Some(definition)
    }
}
