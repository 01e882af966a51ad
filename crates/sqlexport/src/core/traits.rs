//! Core traits for dialect-agnostic script generation.
//!
//! This module defines the primary abstractions used by the export engine:
//!
//! - [`Dialect`]: SQL syntax strategy for different database engines
//! - [`SchemaVisitor`]: double-dispatch contract between schema nodes and renderers
//! - [`RowSource`]/[`RowSet`]: streaming seam for table data
//!
//! # Design Patterns
//!
//! - **Strategy**: `Dialect` provides interchangeable syntax rules; the
//!   traversal itself never branches on a dialect name.
//! - **Visitor**: schema nodes `accept` a renderer and dispatch to the
//!   method for their node kind; unsupported kinds default to no-ops.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::collection::Named;
use super::schema::{
    Column, DataType, Database, ForeignKey, ForeignKeyRule, IdentitySpec, Index, PrimaryKey,
    Table, TypeKind,
};
use super::value::ScriptValue;
use crate::error::{ExportError, Result};

/// Quote a string literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Uppercase hex spelling of a byte sequence.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Wrap an identifier in a quoting pair, doubling embedded closers.
///
/// Idempotent: an already wrapped identifier is returned unchanged.
pub fn wrap_ident(name: &str, open: char, close: char) -> String {
    if name.len() >= 2 && name.starts_with(open) && name.ends_with(close) {
        return name.to_string();
    }
    let doubled = name.replace(close, &format!("{}{}", close, close));
    format!("{}{}{}", open, doubled, close)
}

/// SQL syntax strategy for a target database engine.
///
/// Dialects override only these hooks; all traversal and emission-order
/// logic lives in the shared engine. Hooks are pure: they format text and
/// report capabilities, nothing else.
pub trait Dialect: Send + Sync {
    /// Dialect identifier (e.g. "mssql", "postgres").
    fn name(&self) -> &'static str;

    /// Quote an identifier in the dialect's quoting pair.
    fn escape(&self, ident: &str) -> String;

    /// Dialect spelling for a normalized type kind.
    ///
    /// Unrecognized kinds echo the native spelling; this hook never fails.
    fn type_name(
        &self,
        kind: TypeKind,
        native: &str,
        size: i32,
        precision: i32,
        scale: i32,
    ) -> String;

    // ===== Capability flags =====

    /// Whether the script may create the database itself.
    fn supports_db_creation(&self) -> bool {
        false
    }

    /// Whether PRIMARY KEY / FOREIGN KEY constraints must be declared inside
    /// CREATE TABLE (no ALTER TABLE ... ADD CONSTRAINT).
    fn require_inline_constraints(&self) -> bool {
        false
    }

    /// Whether the engine generates row-version column values itself, so
    /// such columns are skipped in INSERT statements.
    fn supports_generated_row_version(&self) -> bool {
        false
    }

    /// Whether the dialect accepts an ON UPDATE clause on foreign keys.
    fn supports_on_update(&self) -> bool {
        true
    }

    /// Statement terminator, possibly including a batch separator.
    fn statement_delimiter(&self) -> &'static str {
        ";"
    }

    // ===== Identity rendering =====

    /// Full type-text substitution for identity columns (e.g. `serial`).
    ///
    /// When this returns a spelling, it replaces the regular type text and
    /// any nullability clause.
    fn identity_type_name(&self, _column: &Column) -> Option<String> {
        None
    }

    /// Trailing identity clause appended after the type (e.g.
    /// ` IDENTITY(1, 1)`).
    fn identity_clause(&self, _identity: IdentitySpec) -> Option<String> {
        None
    }

    // ===== Key naming =====

    /// Rendered name for a primary key constraint.
    fn primary_key_name(&self, _table: &Table, key: &PrimaryKey) -> String {
        self.escape(key.name())
    }

    /// Rendered name for an index.
    ///
    /// Dialects with global index namespaces synthesize a name from the
    /// table and the key's position or member columns instead.
    fn index_name(&self, _table: &Table, index: &Index) -> String {
        self.escape(index.name())
    }

    /// Rendered name for a foreign key constraint.
    fn foreign_key_name(&self, _table: &Table, key: &ForeignKey) -> String {
        self.escape(key.name())
    }

    /// Keyword text for a referential action.
    ///
    /// `None` and `Restrict` are the implicit default action and are never
    /// rendered.
    fn foreign_key_rule_text(&self, rule: ForeignKeyRule) -> Option<&'static str> {
        match rule {
            ForeignKeyRule::None | ForeignKeyRule::Restrict => None,
            ForeignKeyRule::Cascade => Some("CASCADE"),
            ForeignKeyRule::SetNull => Some("SET NULL"),
            ForeignKeyRule::SetDefault => Some("SET DEFAULT"),
        }
    }

    // ===== Script sections =====

    /// CREATE DATABASE / USE statements, when the dialect supports them.
    fn database_preamble(&self, database: &Database) -> Vec<String> {
        if !self.supports_db_creation() {
            return Vec::new();
        }
        let name = self.escape(database.name());
        vec![
            format!("CREATE DATABASE {}", name),
            format!("USE {}", name),
        ]
    }

    /// Text appended after the closing parenthesis of CREATE TABLE.
    fn table_suffix(&self, _table: &Table) -> Option<String> {
        None
    }

    /// CREATE DOMAIN / CREATE TYPE statement for a user-defined data type.
    ///
    /// Dialects without domain support inherit the `None` no-op.
    fn data_type_definition(&self, _data_type: &DataType) -> Option<String> {
        None
    }

    // ===== Literal formatting =====

    /// Boolean literal spelling.
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    /// Date literal.
    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("'{}'", value.format("%Y-%m-%d"))
    }

    /// Time literal.
    fn time_literal(&self, value: &NaiveTime) -> String {
        format!("'{}'", value.format("%H:%M:%S"))
    }

    /// Timestamp literal.
    fn datetime_literal(&self, value: &NaiveDateTime) -> String {
        format!("'{}'", value.format("%Y-%m-%d %H:%M:%S"))
    }

    /// Hex-blob literal for a non-empty byte sequence.
    fn blob_literal(&self, bytes: &[u8]) -> String {
        format!("x'{}'", hex_string(bytes))
    }

    /// Render a value as a literal of its declared kind.
    ///
    /// Total over {absent, boolean, bytes, date/time, numeric, string}:
    /// NULL for absent values, `''` for a zero-length byte sequence, and a
    /// boolean fallback for untyped values that look boolean. A value that
    /// genuinely mismatches its declared kind (e.g. non-numeric text under a
    /// numeric column) is a data-format failure, never silently coerced.
    fn format_value(&self, value: &ScriptValue, kind: TypeKind) -> Result<String> {
        match value {
            ScriptValue::Null => Ok("NULL".to_string()),
            ScriptValue::Bool(b) => Ok(self.boolean_literal(*b).to_string()),
            ScriptValue::Int(i) => Ok(i.to_string()),
            ScriptValue::Float(f) => Ok(f.to_string()),
            ScriptValue::Decimal(d) => Ok(d.to_string()),
            ScriptValue::Bytes(bytes) => {
                if bytes.is_empty() {
                    Ok("''".to_string())
                } else {
                    Ok(self.blob_literal(bytes))
                }
            }
            ScriptValue::Date(d) => Ok(self.date_literal(d)),
            ScriptValue::Time(t) => Ok(self.time_literal(t)),
            ScriptValue::DateTime(dt) => Ok(self.datetime_literal(dt)),
            ScriptValue::Uuid(u) => Ok(quote_literal(&u.to_string())),
            ScriptValue::Text(s) => {
                if kind == TypeKind::Boolean {
                    return match value.looks_boolean() {
                        Some(b) => Ok(self.boolean_literal(b).to_string()),
                        None => Err(ExportError::data_format(format!(
                            "'{}' is not a boolean value",
                            s
                        ))),
                    };
                }
                if kind == TypeKind::Unknown {
                    if let Some(b) = value.looks_boolean() {
                        return Ok(self.boolean_literal(b).to_string());
                    }
                }
                if kind.is_numeric() {
                    return if s.parse::<f64>().is_ok() {
                        Ok(s.clone())
                    } else {
                        Err(ExportError::data_format(format!(
                            "'{}' is not a numeric value",
                            s
                        )))
                    };
                }
                Ok(quote_literal(s))
            }
        }
    }
}

impl std::fmt::Debug for dyn Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialect").field("name", &self.name()).finish()
    }
}

/// Double-dispatch contract between schema nodes and renderers.
///
/// Every method defaults to a no-op so a renderer that does not support a
/// node kind simply skips it.
pub trait SchemaVisitor {
    fn visit_database(&mut self, _database: &Database) -> Result<()> {
        Ok(())
    }

    fn visit_data_type(&mut self, _data_type: &DataType) -> Result<()> {
        Ok(())
    }

    fn visit_table(&mut self, _database: &Database, _table: &Table) -> Result<()> {
        Ok(())
    }

    fn visit_column(&mut self, _table: &Table, _column: &Column) -> Result<()> {
        Ok(())
    }

    fn visit_primary_key(&mut self, _table: &Table, _key: &PrimaryKey) -> Result<()> {
        Ok(())
    }

    fn visit_index(&mut self, _table: &Table, _index: &Index) -> Result<()> {
        Ok(())
    }

    fn visit_foreign_key(
        &mut self,
        _database: &Database,
        _table: &Table,
        _key: &ForeignKey,
    ) -> Result<()> {
        Ok(())
    }
}

impl Database {
    /// Dispatch to the renderer's database method.
    pub fn accept<V: SchemaVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        visitor.visit_database(self)
    }
}

impl DataType {
    pub fn accept<V: SchemaVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        visitor.visit_data_type(self)
    }
}

impl Table {
    pub fn accept<V: SchemaVisitor + ?Sized>(
        &self,
        database: &Database,
        visitor: &mut V,
    ) -> Result<()> {
        visitor.visit_table(database, self)
    }
}

impl Column {
    pub fn accept<V: SchemaVisitor + ?Sized>(&self, table: &Table, visitor: &mut V) -> Result<()> {
        visitor.visit_column(table, self)
    }
}

impl PrimaryKey {
    pub fn accept<V: SchemaVisitor + ?Sized>(&self, table: &Table, visitor: &mut V) -> Result<()> {
        visitor.visit_primary_key(table, self)
    }
}

impl Index {
    pub fn accept<V: SchemaVisitor + ?Sized>(&self, table: &Table, visitor: &mut V) -> Result<()> {
        visitor.visit_index(table, self)
    }
}

impl ForeignKey {
    pub fn accept<V: SchemaVisitor + ?Sized>(
        &self,
        database: &Database,
        table: &Table,
        visitor: &mut V,
    ) -> Result<()> {
        visitor.visit_foreign_key(database, table, self)
    }
}

/// Open row cursor streaming one table's data.
///
/// Implementations release their underlying resources on drop, which the
/// engine relies on for both normal completion and failure paths.
pub trait RowSet {
    /// Next row, with one value per requested column, or `None` when the
    /// cursor is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<ScriptValue>>>;
}

/// External source of table rows consumed during data export.
pub trait RowSource {
    /// Open a cursor over the given columns of a table.
    fn open<'a>(&'a mut self, table: &Table, columns: &[&Column]) -> Result<Box<dyn RowSet + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlainDialect;

    impl Dialect for PlainDialect {
        fn name(&self) -> &'static str {
            "plain"
        }

        fn escape(&self, ident: &str) -> String {
            wrap_ident(ident, '"', '"')
        }

        fn type_name(
            &self,
            _kind: TypeKind,
            native: &str,
            _size: i32,
            _precision: i32,
            _scale: i32,
        ) -> String {
            native.to_string()
        }
    }

    #[test]
    fn test_quote_literal_doubles_quotes() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
        assert_eq!(quote_literal("plain"), "'plain'");
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(hex_string(&[0xDE, 0xAD, 0x01]), "DEAD01");
        assert_eq!(hex_string(&[]), "");
    }

    #[test]
    fn test_wrap_ident_idempotent() {
        assert_eq!(wrap_ident("name", '[', ']'), "[name]");
        assert_eq!(wrap_ident("[name]", '[', ']'), "[name]");
        assert_eq!(wrap_ident("a]b", '[', ']'), "[a]]b]");
    }

    #[test]
    fn test_format_value_null_for_every_kind() {
        let dialect = PlainDialect;
        for kind in [
            TypeKind::Boolean,
            TypeKind::Int32,
            TypeKind::Decimal,
            TypeKind::VarChar,
            TypeKind::Blob,
            TypeKind::DateTime,
            TypeKind::Unknown,
        ] {
            assert_eq!(
                dialect.format_value(&ScriptValue::Null, kind).unwrap(),
                "NULL"
            );
        }
    }

    #[test]
    fn test_format_value_empty_bytes() {
        let dialect = PlainDialect;
        assert_eq!(
            dialect
                .format_value(&ScriptValue::Bytes(vec![]), TypeKind::Blob)
                .unwrap(),
            "''"
        );
        assert_eq!(
            dialect
                .format_value(&ScriptValue::Bytes(vec![0xAB]), TypeKind::Blob)
                .unwrap(),
            "x'AB'"
        );
    }

    #[test]
    fn test_format_value_strings_quoted() {
        let dialect = PlainDialect;
        assert_eq!(
            dialect
                .format_value(&ScriptValue::from("it's"), TypeKind::VarChar)
                .unwrap(),
            "'it''s'"
        );
    }

    #[test]
    fn test_format_value_untyped_boolean_fallback() {
        let dialect = PlainDialect;
        assert_eq!(
            dialect
                .format_value(&ScriptValue::from("true"), TypeKind::Unknown)
                .unwrap(),
            "1"
        );
        // Non-boolean text under an unknown kind stays a quoted string.
        assert_eq!(
            dialect
                .format_value(&ScriptValue::from("maybe"), TypeKind::Unknown)
                .unwrap(),
            "'maybe'"
        );
    }

    #[test]
    fn test_format_value_numeric_mismatch_surfaced() {
        let dialect = PlainDialect;
        assert_eq!(
            dialect
                .format_value(&ScriptValue::from("12.5"), TypeKind::Decimal)
                .unwrap(),
            "12.5"
        );
        let err = dialect
            .format_value(&ScriptValue::from("abc"), TypeKind::Int32)
            .unwrap_err();
        assert!(err.to_string().contains("not a numeric value"));
    }

    #[test]
    fn test_foreign_key_rule_text_defaults() {
        let dialect = PlainDialect;
        assert_eq!(dialect.foreign_key_rule_text(ForeignKeyRule::None), None);
        assert_eq!(
            dialect.foreign_key_rule_text(ForeignKeyRule::Restrict),
            None
        );
        assert_eq!(
            dialect.foreign_key_rule_text(ForeignKeyRule::SetNull),
            Some("SET NULL")
        );
    }
}
