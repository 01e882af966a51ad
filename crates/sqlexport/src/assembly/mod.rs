//! Schema assembly from an external metadata collaborator.
//!
//! The collaborator enumerates tables and per-table entity names, and hands
//! back pre-fetched metadata as case-insensitive key/value maps. Assembly
//! itself issues no queries and touches no data; it only turns metadata
//! into the schema model, bottom-up per table: columns first, then indexes,
//! then foreign keys, then the primary key last so it can reference
//! already-created columns.
//!
//! A missing required key in any metadata map aborts the whole assembly;
//! no partial database is ever returned.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::core::collection::Named;
use crate::core::schema::{Column, DataType, Database, ForeignKeyRule, Table, TypeKind};
use crate::error::{ExportError, Result};

/// Case-insensitive string-keyed metadata map.
///
/// # Documented keys
///
/// Columns require `type`, `native_type`, `size`, `precision`, `scale`,
/// and `required`; optional: `computed`, `identity`, `identity_seed`,
/// `identity_increment`, `default`, `description`.
///
/// Indexes require `columns` (comma-separated, ordered); optional:
/// `unique`, `primary`.
///
/// Foreign keys require `columns`, `related_table`, `related_columns`,
/// `update_rule`, and `delete_rule`.
///
/// Primary keys require `name` and `columns`.
///
/// Data types require `type` and `native_type`; optional: `size`,
/// `precision`, `scale`, `nullable`, `enum`, `enum_values`, `default`.
#[derive(Debug, Clone, Default)]
pub struct MetadataMap {
    entries: HashMap<String, String>,
}

impl MetadataMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair; keys are stored case-insensitively.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .insert(key.into().to_ascii_lowercase(), value.into());
    }

    /// Look up a value by key, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Look up a required value; a missing key aborts assembly.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            ExportError::schema(format!("missing required metadata key '{}'", key))
        })
    }

    /// Required integer value.
    pub fn require_i32(&self, key: &str) -> Result<i32> {
        let raw = self.require(key)?;
        raw.parse().map_err(|_| {
            ExportError::schema(format!("metadata key '{}' is not an integer: '{}'", key, raw))
        })
    }

    /// Required boolean value.
    pub fn require_bool(&self, key: &str) -> Result<bool> {
        parse_bool(key, self.require(key)?)
    }

    /// Optional boolean value; absent means false.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            Some(raw) => parse_bool(key, raw),
            None => Ok(false),
        }
    }

    /// Optional integer value with a default.
    pub fn get_i64_or(&self, key: &str, default: i64) -> Result<i64> {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|_| {
                ExportError::schema(format!(
                    "metadata key '{}' is not an integer: '{}'",
                    key, raw
                ))
            }),
            None => Ok(default),
        }
    }

    /// Required ordered name list (comma-separated).
    pub fn require_list(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .require(key)?
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect())
    }

    /// Optional ordered name list; absent means empty.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for MetadataMap {
    fn from(entries: [(K, V); N]) -> Self {
        let mut map = Self::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "" | "false" | "no" | "0" => Ok(false),
        _ => Err(ExportError::schema(format!(
            "metadata key '{}' is not a boolean: '{}'",
            key, raw
        ))),
    }
}

/// External collaborator handing out pre-fetched schema metadata.
///
/// Implementations wrap whatever reads the vendor system catalogs (or a
/// DDL parser); the assembly step never issues queries itself.
pub trait MetadataProvider {
    /// Enumerate tables as `(name, owner)` pairs, in emission order.
    fn tables(&self) -> Result<Vec<(String, String)>>;

    /// Enumerate user-defined data type names, in emission order.
    fn data_types(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Enumerate column names of a table, in ordinal order.
    fn columns(&self, owner: &str, table: &str) -> Result<Vec<String>>;

    /// Enumerate index names of a table.
    fn indexes(&self, owner: &str, table: &str) -> Result<Vec<String>>;

    /// Enumerate foreign key names of a table.
    fn foreign_keys(&self, owner: &str, table: &str) -> Result<Vec<String>>;

    /// Metadata for one column.
    fn column_metadata(&self, owner: &str, table: &str, column: &str) -> Result<MetadataMap>;

    /// Metadata for one index.
    fn index_metadata(&self, owner: &str, table: &str, index: &str) -> Result<MetadataMap>;

    /// Metadata for one foreign key.
    fn foreign_key_metadata(&self, owner: &str, table: &str, key: &str) -> Result<MetadataMap>;

    /// Metadata for the table's primary key, if it has one.
    fn primary_key_metadata(&self, owner: &str, table: &str) -> Result<Option<MetadataMap>>;

    /// Metadata for one user-defined data type.
    fn data_type_metadata(&self, name: &str) -> Result<MetadataMap> {
        Err(ExportError::schema(format!(
            "no metadata available for data type '{}'",
            name
        )))
    }
}

/// Build a database from the collaborator's metadata.
pub fn assemble(provider: &dyn MetadataProvider, name: &str) -> Result<Database> {
    let mut database = Database::new(name)?;

    for type_name in provider.data_types()? {
        let meta = provider.data_type_metadata(&type_name)?;
        database.add_data_type(assemble_data_type(&type_name, &meta)?)?;
    }

    let tables = provider.tables()?;
    info!(database = name, tables = tables.len(), "assembling schema");

    for (table_name, owner) in tables {
        let table = assemble_table(provider, &owner, &table_name)?;
        database.add_table(table)?;
    }

    Ok(database)
}

fn assemble_data_type(name: &str, meta: &MetadataMap) -> Result<DataType> {
    let kind = TypeKind::parse(meta.require("type")?);
    let mut data_type = DataType::new(name, kind, meta.require("native_type")?)?;
    data_type.size = meta.get_i64_or("size", 0)? as i32;
    data_type.precision = meta.get_i64_or("precision", 0)? as i32;
    data_type.scale = meta.get_i64_or("scale", 0)? as i32;
    data_type.nullable = match meta.get("nullable") {
        Some(raw) => parse_bool("nullable", raw)?,
        None => true,
    };
    data_type.is_enum = meta.get_bool("enum")?;
    data_type.values = meta.get_list("enum_values");
    data_type.default_value = meta.get("default").map(str::to_string);
    Ok(data_type)
}

fn assemble_table(provider: &dyn MetadataProvider, owner: &str, name: &str) -> Result<Table> {
    let mut table = Table::new(name, owner)?;
    debug!("assembling table {}", table.full_name());

    // Columns must exist before any key referencing them can be built.
    for column_name in provider.columns(owner, name)? {
        let meta = provider.column_metadata(owner, name, &column_name)?;
        table.add_column(assemble_column(&column_name, &meta)?)?;
    }

    for index_name in provider.indexes(owner, name)? {
        let meta = provider.index_metadata(owner, name, &index_name)?;
        table.add_index(
            index_name,
            meta.require_list("columns")?,
            meta.get_bool("unique")?,
            meta.get_bool("primary")?,
        )?;
    }

    for key_name in provider.foreign_keys(owner, name)? {
        let meta = provider.foreign_key_metadata(owner, name, &key_name)?;
        table.add_foreign_key(
            key_name,
            meta.require_list("columns")?,
            meta.require("related_table")?,
            meta.require_list("related_columns")?,
            ForeignKeyRule::parse(meta.require("update_rule")?)?,
            ForeignKeyRule::parse(meta.require("delete_rule")?)?,
        )?;
    }

    // The primary key is attached last: it must reference already-created
    // columns.
    if let Some(meta) = provider.primary_key_metadata(owner, name)? {
        table.set_primary_key(meta.require("name")?, meta.require_list("columns")?)?;
    }

    Ok(table)
}

fn assemble_column(name: &str, meta: &MetadataMap) -> Result<Column> {
    let kind = TypeKind::parse(meta.require("type")?);
    let mut column = Column::new(name, kind, meta.require("native_type")?)?;
    column.size = meta.require_i32("size")?;
    column.precision = meta.require_i32("precision")?;
    column.scale = meta.require_i32("scale")?;
    if meta.require_bool("required")? {
        column.set_required();
    }
    if meta.get_bool("computed")? {
        column.set_computed();
    }
    if meta.get_bool("identity")? {
        let seed = meta.get_i64_or("identity_seed", 1)?;
        let increment = meta.get_i64_or("identity_increment", 1)?;
        column.set_identity(seed, increment);
    }
    column.default_value = meta.get("default").map(str::to_string);
    column.description = meta.get("description").map(str::to_string);
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_map_case_insensitive() {
        let meta = MetadataMap::from([("Type", "int32"), ("NATIVE_TYPE", "int")]);
        assert_eq!(meta.get("type"), Some("int32"));
        assert_eq!(meta.get("Native_Type"), Some("int"));
        assert_eq!(meta.require("TYPE").unwrap(), "int32");
    }

    #[test]
    fn test_metadata_map_missing_required_key() {
        let meta = MetadataMap::from([("type", "int32")]);
        let err = meta.require("native_type").unwrap_err();
        assert!(matches!(err, ExportError::SchemaIntegrity(_)));
        assert!(err.to_string().contains("native_type"));
    }

    #[test]
    fn test_metadata_map_lists() {
        let meta = MetadataMap::from([("columns", "a, b ,c")]);
        assert_eq!(meta.require_list("columns").unwrap(), ["a", "b", "c"]);
        assert!(meta.get_list("include").is_empty());
    }

    #[test]
    fn test_metadata_map_bools_and_ints() {
        let meta = MetadataMap::from([("unique", "1"), ("size", "40"), ("bad", "maybe")]);
        assert!(meta.get_bool("unique").unwrap());
        assert!(!meta.get_bool("absent").unwrap());
        assert_eq!(meta.require_i32("size").unwrap(), 40);
        assert!(meta.get_bool("bad").is_err());
        assert!(meta.require_i32("unique").is_ok());
    }

    #[test]
    fn test_assemble_column_identity_defaults() {
        let meta = MetadataMap::from([
            ("type", "int32"),
            ("native_type", "int"),
            ("size", "0"),
            ("precision", "0"),
            ("scale", "0"),
            ("required", "true"),
            ("identity", "true"),
        ]);
        let column = assemble_column("id", &meta).unwrap();
        assert!(column.is_identity());
        let identity = column.identity().unwrap();
        assert_eq!((identity.seed, identity.increment), (1, 1));
        assert!(column.is_required());
    }

    #[test]
    fn test_assemble_column_missing_key_fails() {
        let meta = MetadataMap::from([("type", "int32"), ("native_type", "int")]);
        assert!(assemble_column("id", &meta).is_err());
    }
}
