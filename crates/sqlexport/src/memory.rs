//! In-memory metadata and row providers.
//!
//! These back tests and embedding callers that already hold schema metadata
//! and row data, without any database connectivity.

use std::collections::HashMap;

use crate::assembly::{MetadataMap, MetadataProvider};
use crate::core::collection::Named;
use crate::core::schema::{Column, Table};
use crate::core::traits::{RowSet, RowSource};
use crate::core::value::ScriptValue;
use crate::error::{ExportError, Result};

fn table_key(owner: &str, table: &str) -> String {
    if owner.is_empty() {
        table.to_string()
    } else {
        format!("{}.{}", owner, table)
    }
}

/// Metadata provider over maps populated by the caller.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadata {
    tables: Vec<(String, String)>,
    data_types: Vec<String>,
    columns: HashMap<String, Vec<String>>,
    indexes: HashMap<String, Vec<String>>,
    foreign_keys: HashMap<String, Vec<String>>,
    column_meta: HashMap<String, MetadataMap>,
    index_meta: HashMap<String, MetadataMap>,
    foreign_key_meta: HashMap<String, MetadataMap>,
    primary_keys: HashMap<String, MetadataMap>,
    data_type_meta: HashMap<String, MetadataMap>,
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table in emission order.
    pub fn add_table(&mut self, owner: &str, table: &str) {
        self.tables.push((table.to_string(), owner.to_string()));
    }

    /// Register a column, in ordinal order, with its metadata.
    pub fn add_column(&mut self, owner: &str, table: &str, column: &str, meta: MetadataMap) {
        let key = table_key(owner, table);
        self.columns
            .entry(key.clone())
            .or_default()
            .push(column.to_string());
        self.column_meta.insert(format!("{}#{}", key, column), meta);
    }

    /// Register an index with its metadata.
    pub fn add_index(&mut self, owner: &str, table: &str, index: &str, meta: MetadataMap) {
        let key = table_key(owner, table);
        self.indexes
            .entry(key.clone())
            .or_default()
            .push(index.to_string());
        self.index_meta.insert(format!("{}#{}", key, index), meta);
    }

    /// Register a foreign key with its metadata.
    pub fn add_foreign_key(&mut self, owner: &str, table: &str, key_name: &str, meta: MetadataMap) {
        let key = table_key(owner, table);
        self.foreign_keys
            .entry(key.clone())
            .or_default()
            .push(key_name.to_string());
        self.foreign_key_meta
            .insert(format!("{}#{}", key, key_name), meta);
    }

    /// Register the table's primary key metadata.
    pub fn set_primary_key(&mut self, owner: &str, table: &str, meta: MetadataMap) {
        self.primary_keys.insert(table_key(owner, table), meta);
    }

    /// Register a user-defined data type with its metadata.
    pub fn add_data_type(&mut self, name: &str, meta: MetadataMap) {
        self.data_types.push(name.to_string());
        self.data_type_meta.insert(name.to_string(), meta);
    }

    fn entity_meta(
        map: &HashMap<String, MetadataMap>,
        owner: &str,
        table: &str,
        entity: &str,
    ) -> Result<MetadataMap> {
        map.get(&format!("{}#{}", table_key(owner, table), entity))
            .cloned()
            .ok_or_else(|| {
                ExportError::schema(format!(
                    "no metadata registered for '{}' on table '{}'",
                    entity,
                    table_key(owner, table)
                ))
            })
    }
}

impl MetadataProvider for MemoryMetadata {
    fn tables(&self) -> Result<Vec<(String, String)>> {
        Ok(self.tables.clone())
    }

    fn data_types(&self) -> Result<Vec<String>> {
        Ok(self.data_types.clone())
    }

    fn columns(&self, owner: &str, table: &str) -> Result<Vec<String>> {
        Ok(self
            .columns
            .get(&table_key(owner, table))
            .cloned()
            .unwrap_or_default())
    }

    fn indexes(&self, owner: &str, table: &str) -> Result<Vec<String>> {
        Ok(self
            .indexes
            .get(&table_key(owner, table))
            .cloned()
            .unwrap_or_default())
    }

    fn foreign_keys(&self, owner: &str, table: &str) -> Result<Vec<String>> {
        Ok(self
            .foreign_keys
            .get(&table_key(owner, table))
            .cloned()
            .unwrap_or_default())
    }

    fn column_metadata(&self, owner: &str, table: &str, column: &str) -> Result<MetadataMap> {
        Self::entity_meta(&self.column_meta, owner, table, column)
    }

    fn index_metadata(&self, owner: &str, table: &str, index: &str) -> Result<MetadataMap> {
        Self::entity_meta(&self.index_meta, owner, table, index)
    }

    fn foreign_key_metadata(&self, owner: &str, table: &str, key: &str) -> Result<MetadataMap> {
        Self::entity_meta(&self.foreign_key_meta, owner, table, key)
    }

    fn primary_key_metadata(&self, owner: &str, table: &str) -> Result<Option<MetadataMap>> {
        Ok(self.primary_keys.get(&table_key(owner, table)).cloned())
    }

    fn data_type_metadata(&self, name: &str) -> Result<MetadataMap> {
        self.data_type_meta.get(name).cloned().ok_or_else(|| {
            ExportError::schema(format!("no metadata registered for data type '{}'", name))
        })
    }
}

/// Row source over rows held in memory, keyed by table full name.
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    rows: HashMap<String, Vec<Vec<ScriptValue>>>,
}

impl MemoryRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rows streamed for a table.
    pub fn insert(&mut self, table_full_name: impl Into<String>, rows: Vec<Vec<ScriptValue>>) {
        self.rows.insert(table_full_name.into(), rows);
    }
}

impl RowSource for MemoryRows {
    fn open<'a>(&'a mut self, table: &Table, _columns: &[&Column]) -> Result<Box<dyn RowSet + 'a>> {
        let rows = self
            .rows
            .get(&table.full_name())
            .cloned()
            .unwrap_or_default();
        Ok(Box::new(MemoryRowSet {
            rows: rows.into_iter(),
        }))
    }
}

struct MemoryRowSet {
    rows: std::vec::IntoIter<Vec<ScriptValue>>,
}

impl RowSet for MemoryRowSet {
    fn next_row(&mut self) -> Result<Option<Vec<ScriptValue>>> {
        Ok(self.rows.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::TypeKind;

    #[test]
    fn test_memory_rows_cursor() {
        let mut source = MemoryRows::new();
        source.insert(
            "country",
            vec![
                vec![ScriptValue::from("NLD")],
                vec![ScriptValue::from("BEL")],
            ],
        );

        let table = Table::new("country", "").unwrap();
        let mut cursor = source.open(&table, &[]).unwrap();
        assert_eq!(
            cursor.next_row().unwrap(),
            Some(vec![ScriptValue::from("NLD")])
        );
        assert_eq!(
            cursor.next_row().unwrap(),
            Some(vec![ScriptValue::from("BEL")])
        );
        assert_eq!(cursor.next_row().unwrap(), None);
    }

    #[test]
    fn test_memory_rows_unknown_table_is_empty() {
        let mut source = MemoryRows::new();
        let table = Table::new("void", "").unwrap();
        let mut cursor = source.open(&table, &[]).unwrap();
        assert_eq!(cursor.next_row().unwrap(), None);
    }

    #[test]
    fn test_memory_metadata_round_trip() {
        let mut meta = MemoryMetadata::new();
        meta.add_table("dbo", "country");
        meta.add_column(
            "dbo",
            "country",
            "code",
            MetadataMap::from([
                ("type", "char"),
                ("native_type", "char"),
                ("size", "3"),
                ("precision", "0"),
                ("scale", "0"),
                ("required", "true"),
            ]),
        );

        assert_eq!(
            meta.tables().unwrap(),
            vec![("country".to_string(), "dbo".to_string())]
        );
        assert_eq!(meta.columns("dbo", "country").unwrap(), vec!["code"]);
        let column = meta.column_metadata("dbo", "country", "code").unwrap();
        assert_eq!(column.get("size"), Some("3"));
        assert!(meta.column_metadata("dbo", "country", "area").is_err());
        assert_eq!(TypeKind::parse(column.require("type").unwrap()), TypeKind::Char);
    }
}
