//! Oracle dialect.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::core::schema::{IdentitySpec, TypeKind};
use crate::core::traits::{hex_string, wrap_ident, Dialect};

use super::{decimal_spelling, sized};

/// Oracle dialect implementation.
///
/// The schema must pre-exist: Oracle scripts never create the database.
#[derive(Debug, Clone, Default)]
pub struct OracleDialect;

impl OracleDialect {
    /// Create a new Oracle dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
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
            TypeKind::Boolean => "number(1)".to_string(),
            TypeKind::Int8 | TypeKind::UInt8 => "number(3)".to_string(),
            TypeKind::Int16 | TypeKind::UInt16 => "number(5)".to_string(),
            TypeKind::Int32 | TypeKind::UInt32 => "number(10)".to_string(),
            TypeKind::Int64 => "number(19)".to_string(),
            TypeKind::UInt64 => "number(20)".to_string(),
            TypeKind::Float32 => "binary_float".to_string(),
            TypeKind::Float64 => "binary_double".to_string(),
            TypeKind::Currency => "number(19, 4)".to_string(),
            TypeKind::Decimal => decimal_spelling("number", precision, scale),
            // No standalone TIME type; both collapse onto DATE.
            TypeKind::Date | TypeKind::Time => "date".to_string(),
            TypeKind::DateTime => "timestamp".to_string(),
            TypeKind::Char => sized("char", size),
            TypeKind::NChar => sized("nchar", size),
            TypeKind::VarChar => {
                if size > 0 {
                    format!("varchar2({})", size)
                } else {
                    "clob".to_string()
                }
            }
            TypeKind::NVarChar => {
                if size > 0 {
                    format!("nvarchar2({})", size)
                } else {
                    "nclob".to_string()
                }
            }
            TypeKind::Text => "clob".to_string(),
            TypeKind::Blob => "blob".to_string(),
            TypeKind::Bit => format!("raw({})", (size.max(1) + 7) / 8),
            TypeKind::Guid => "char(36)".to_string(),
            TypeKind::RowVersion => "raw(8)".to_string(),
            TypeKind::Xml => "xmltype".to_string(),
            TypeKind::Json => "clob".to_string(),
            TypeKind::Geometry => "sdo_geometry".to_string(),
            TypeKind::Unknown => native.to_string(),
        }
    }

    fn supports_on_update(&self) -> bool {
        false
    }

    fn identity_clause(&self, identity: IdentitySpec) -> Option<String> {
        Some(format!(
            " GENERATED ALWAYS AS IDENTITY (START WITH {} INCREMENT BY {})",
            identity.seed, identity.increment
        ))
    }

    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("TO_DATE('{}', 'YYYY-MM-DD')", value.format("%Y-%m-%d"))
    }

    fn time_literal(&self, value: &NaiveTime) -> String {
        format!("TO_DATE('{}', 'HH24:MI:SS')", value.format("%H:%M:%S"))
    }

    fn datetime_literal(&self, value: &NaiveDateTime) -> String {
        format!(
            "TO_TIMESTAMP('{}', 'YYYY-MM-DD HH24:MI:SS')",
            value.format("%Y-%m-%d %H:%M:%S")
        )
    }

    fn blob_literal(&self, bytes: &[u8]) -> String {
        format!("hextoraw('{}')", hex_string(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ScriptValue;

    #[test]
    fn test_type_names() {
        let dialect = OracleDialect::new();
        assert_eq!(dialect.type_name(TypeKind::Int32, "", 0, 0, 0), "number(10)");
        assert_eq!(
            dialect.type_name(TypeKind::Decimal, "", 0, 18, 4),
            "number(18, 4)"
        );
        assert_eq!(
            dialect.type_name(TypeKind::VarChar, "", 200, 0, 0),
            "varchar2(200)"
        );
        assert_eq!(dialect.type_name(TypeKind::VarChar, "", 0, 0, 0), "clob");
        assert_eq!(
            dialect.type_name(TypeKind::Float64, "", 0, 0, 0),
            "binary_double"
        );
    }

    #[test]
    fn test_no_db_creation() {
        let dialect = OracleDialect::new();
        assert!(!dialect.supports_db_creation());
    }

    #[test]
    fn test_on_update_unsupported() {
        let dialect = OracleDialect::new();
        assert!(!dialect.supports_on_update());
    }

    #[test]
    fn test_identity_clause() {
        let dialect = OracleDialect::new();
        assert_eq!(
            dialect
                .identity_clause(IdentitySpec {
                    seed: 5,
                    increment: 2
                })
                .unwrap(),
            " GENERATED ALWAYS AS IDENTITY (START WITH 5 INCREMENT BY 2)"
        );
    }

    #[test]
    fn test_date_literals() {
        let dialect = OracleDialect::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            dialect.date_literal(&date),
            "TO_DATE('2024-03-01', 'YYYY-MM-DD')"
        );
        let stamp = date.and_hms_opt(13, 30, 0).unwrap();
        assert_eq!(
            dialect.datetime_literal(&stamp),
            "TO_TIMESTAMP('2024-03-01 13:30:00', 'YYYY-MM-DD HH24:MI:SS')"
        );
    }

    #[test]
    fn test_blob_literal() {
        let dialect = OracleDialect::new();
        assert_eq!(
            dialect
                .format_value(&ScriptValue::Bytes(vec![0x01, 0xFF]), TypeKind::Blob)
                .unwrap(),
            "hextoraw('01FF')"
        );
    }
}
