//! Shared script-generation engine.
//!
//! One traversal serves every dialect. The emission order is fixed:
//!
//! 1. Header comment (source database, timestamp, operator).
//! 2. Schema: optional CREATE DATABASE preamble, user-defined data types,
//!    then per selected table a CREATE TABLE (with inline keys where the
//!    dialect requires them) followed by its CREATE INDEX statements.
//! 3. Data: one INSERT per row streamed from the row source.
//! 4. Deferred foreign keys via ALTER TABLE, after every table exists;
//!    required by dialects without deferred constraint checking.
//!
//! Dialects customize output exclusively through the [`Dialect`] hooks; no
//! traversal logic branches on a dialect name.

pub mod writer;

use std::io::Write;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::config::ExportOptions;
use crate::core::collection::Named;
use crate::core::schema::{
    Column, DataType, Database, ForeignKey, Index, PrimaryKey, Table, TypeKind,
};
use crate::core::traits::{Dialect, RowSource, SchemaVisitor};
use crate::error::{ExportError, Result};

pub use writer::ScriptWriter;

/// Script generator for one export run.
///
/// Owns the output sink for the whole run; a fresh generator is built per
/// run. Single-threaded, blocking: tables are processed strictly in
/// collection order and a table's rows finish streaming before the next
/// table begins.
pub struct ScriptGenerator<'a, W: Write> {
    dialect: &'a dyn Dialect,
    options: ExportOptions,
    writer: ScriptWriter<W>,
    rows: Option<&'a mut dyn RowSource>,
    timestamp: NaiveDateTime,
    operator: String,
    table_body: Vec<String>,
    emitted_indexes: usize,
}

impl<'a, W: Write> ScriptGenerator<'a, W> {
    /// Create a generator writing to `sink`.
    pub fn new(dialect: &'a dyn Dialect, options: ExportOptions, sink: W) -> Self {
        let operator = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            dialect,
            options,
            writer: ScriptWriter::new(sink),
            rows: None,
            timestamp: chrono::Local::now().naive_local(),
            operator,
            table_body: Vec::new(),
            emitted_indexes: 0,
        }
    }

    /// Fix the header timestamp (defaults to the wall clock).
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Fix the header operator identity (defaults to the process user).
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Attach the row source streamed during data export.
    pub fn with_rows(mut self, rows: &'a mut dyn RowSource) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Run the export: walk the schema once and write the script.
    pub fn generate(&mut self, database: &Database) -> Result<()> {
        info!(
            dialect = self.dialect.name(),
            database = database.name(),
            "generating export script"
        );
        database.accept(self)?;
        self.writer.flush()
    }

    /// Release the output sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn qualified_name(&self, table: &Table) -> String {
        if table.owner().is_empty() {
            self.dialect.escape(table.name())
        } else {
            format!(
                "{}.{}",
                self.dialect.escape(table.owner()),
                self.dialect.escape(table.name())
            )
        }
    }

    fn column_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.dialect.escape(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn end_statement(&mut self) -> Result<()> {
        self.writer.write(self.dialect.statement_delimiter())?;
        self.writer.newline()
    }

    fn statement(&mut self, text: &str) -> Result<()> {
        self.writer.write(text)?;
        self.end_statement()
    }

    fn write_header(&mut self, database: &Database) -> Result<()> {
        self.writer
            .line(&format!("-- Export script for database '{}'", database.name()))?;
        self.writer.line(&format!(
            "-- Generated : {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        ))?;
        self.writer
            .line(&format!("-- Operator  : {}", self.operator))?;
        self.writer.blank()
    }

    /// Column definition text: name, type (or identity substitution),
    /// identity clause, default, nullability.
    fn column_definition(&self, column: &Column) -> String {
        let name = self.dialect.escape(column.name());

        if self.options.identities && column.is_identity() {
            if let Some(substitution) = self.dialect.identity_type_name(column) {
                // The substitution embeds its own nullability.
                return format!("{} {}", name, substitution);
            }
        }

        let mut text = format!(
            "{} {}",
            name,
            self.dialect.type_name(
                column.kind,
                &column.native_type,
                column.size,
                column.precision,
                column.scale,
            )
        );

        if self.options.identities {
            if let Some(identity) = column.identity() {
                if let Some(clause) = self.dialect.identity_clause(identity) {
                    text.push_str(&clause);
                }
            }
        }

        if self.options.defaults && !column.is_identity() {
            if let Some(default) = &column.default_value {
                text.push_str(&format!(" DEFAULT {}", default));
            }
        }

        if column.is_required() {
            text.push_str(" NOT NULL");
        }

        text
    }

    /// A foreign key is emitted only when its related table and every
    /// participating column on both sides are part of this run. Returns the
    /// resolved related table when eligible.
    fn foreign_key_eligible<'d>(
        &self,
        database: &'d Database,
        table: &Table,
        key: &ForeignKey,
    ) -> Option<&'d Table> {
        if !key.selected {
            return None;
        }
        let Some(related) = key.related_table(database) else {
            debug!(
                "skipping foreign key '{}': related table '{}' not exported",
                key.name(),
                key.related_table_name()
            );
            return None;
        };
        if !related.selected {
            return None;
        }
        let own_selected = key
            .columns()
            .iter()
            .all(|c| table.column(c).is_some_and(|col| col.selected));
        let related_selected = key
            .related_columns()
            .iter()
            .all(|c| related.column(c).is_some_and(|col| col.selected));
        (own_selected && related_selected).then_some(related)
    }

    fn foreign_key_clause(&self, table: &Table, key: &ForeignKey, related: &Table) -> String {
        let mut clause = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.dialect.foreign_key_name(table, key),
            self.column_list(key.columns()),
            self.qualified_name(related),
            self.column_list(key.related_columns()),
        );
        if let Some(action) = self.dialect.foreign_key_rule_text(key.delete_rule) {
            clause.push_str(&format!(" ON DELETE {}", action));
        }
        if self.dialect.supports_on_update() {
            if let Some(action) = self.dialect.foreign_key_rule_text(key.update_rule) {
                clause.push_str(&format!(" ON UPDATE {}", action));
            }
        }
        clause
    }

    /// Whether a column takes part in INSERT statements.
    fn data_column_included(&self, column: &Column) -> bool {
        if !column.selected || column.is_computed() {
            return false;
        }
        if column.is_identity() && !self.options.identities {
            return false;
        }
        if column.kind == TypeKind::RowVersion && self.dialect.supports_generated_row_version() {
            return false;
        }
        true
    }

    fn export_table_data(&mut self, table: &Table) -> Result<()> {
        let Some(source) = self.rows.take() else {
            return Ok(());
        };
        let result = self.stream_rows(source, table);
        self.rows = Some(source);
        result
    }

    fn stream_rows(&mut self, source: &mut dyn RowSource, table: &Table) -> Result<()> {
        let columns: Vec<&Column> = table
            .columns()
            .iter()
            .filter(|c| self.data_column_included(c))
            .collect();
        if columns.is_empty() {
            return Ok(());
        }

        let column_list = columns
            .iter()
            .map(|c| self.dialect.escape(c.name()))
            .collect::<Vec<_>>()
            .join(", ");
        let prefix = format!(
            "INSERT INTO {} ({}) VALUES (",
            self.qualified_name(table),
            column_list
        );

        debug!("streaming rows for table {}", table.full_name());
        let mut written = 0usize;
        // The cursor is scoped to this table's data step; dropping it on any
        // exit path releases the underlying resources.
        let mut cursor = source.open(table, &columns)?;
        while let Some(row) = cursor.next_row()? {
            if row.len() != columns.len() {
                return Err(ExportError::data_format(format!(
                    "table '{}': row has {} values for {} columns",
                    table.full_name(),
                    row.len(),
                    columns.len()
                )));
            }
            let mut literals = Vec::with_capacity(row.len());
            for (value, column) in row.iter().zip(&columns) {
                literals.push(self.dialect.format_value(value, column.kind)?);
            }
            self.writer.write(&prefix)?;
            self.writer.write(&literals.join(", "))?;
            self.writer.write(")")?;
            self.end_statement()?;
            written += 1;
        }
        drop(cursor);

        if written > 0 {
            self.writer.blank()?;
            debug!("wrote {} rows for table {}", written, table.full_name());
        }
        Ok(())
    }
}

impl<W: Write> SchemaVisitor for ScriptGenerator<'_, W> {
    fn visit_database(&mut self, database: &Database) -> Result<()> {
        self.write_header(database)?;

        if self.options.schema {
            let preamble = self.dialect.database_preamble(database);
            for stmt in &preamble {
                self.statement(stmt)?;
            }
            if !preamble.is_empty() {
                self.writer.blank()?;
            }

            for data_type in database.data_types() {
                data_type.accept(self)?;
            }

            for table in database.tables().iter().filter(|t| t.selected) {
                table.accept(database, self)?;
            }
        }

        if self.options.data {
            for table in database.tables().iter().filter(|t| t.selected) {
                self.export_table_data(table)?;
            }
        }

        if self.options.schema
            && self.options.foreign_keys
            && !self.dialect.require_inline_constraints()
        {
            for table in database.tables().iter().filter(|t| t.selected) {
                for key in table.foreign_keys() {
                    key.accept(database, table, self)?;
                }
            }
        }

        Ok(())
    }

    fn visit_data_type(&mut self, data_type: &DataType) -> Result<()> {
        // Dialects without domain/enum support return nothing and the
        // data type is skipped rather than failing.
        if let Some(definition) = self.dialect.data_type_definition(data_type) {
            self.statement(&definition)?;
            self.writer.blank()?;
        }
        Ok(())
    }

    fn visit_table(&mut self, database: &Database, table: &Table) -> Result<()> {
        debug!("rendering table {}", table.full_name());

        self.table_body.clear();
        for column in table.columns().iter().filter(|c| c.selected) {
            column.accept(table, self)?;
        }
        if self.options.primary_keys {
            if let Some(key) = table.primary_key() {
                let members_selected = key
                    .columns()
                    .iter()
                    .all(|c| table.column(c).is_some_and(|col| col.selected));
                if key.selected && members_selected {
                    key.accept(table, self)?;
                }
            }
        }
        if self.options.foreign_keys && self.dialect.require_inline_constraints() {
            for key in table.foreign_keys() {
                key.accept(database, table, self)?;
            }
        }

        self.writer
            .line(&format!("CREATE TABLE {} (", self.qualified_name(table)))?;
        self.writer.push_indent();
        let body = std::mem::take(&mut self.table_body);
        for (position, entry) in body.iter().enumerate() {
            if position + 1 < body.len() {
                self.writer.line(&format!("{},", entry))?;
            } else {
                self.writer.line(entry)?;
            }
        }
        self.writer.pop_indent();
        self.writer.write(")")?;
        if let Some(suffix) = self.dialect.table_suffix(table) {
            self.writer.write(&suffix)?;
        }
        self.end_statement()?;
        self.writer.blank()?;

        if self.options.indexes {
            self.emitted_indexes = 0;
            for index in table.indexes().iter().filter(|ix| ix.selected) {
                index.accept(table, self)?;
            }
            if self.emitted_indexes > 0 {
                self.writer.blank()?;
            }
        }

        Ok(())
    }

    fn visit_column(&mut self, _table: &Table, column: &Column) -> Result<()> {
        let definition = self.column_definition(column);
        self.table_body.push(definition);
        Ok(())
    }

    fn visit_primary_key(&mut self, table: &Table, key: &PrimaryKey) -> Result<()> {
        let clause = format!(
            "CONSTRAINT {} PRIMARY KEY ({})",
            self.dialect.primary_key_name(table, key),
            self.column_list(key.columns()),
        );
        self.table_body.push(clause);
        Ok(())
    }

    fn visit_index(&mut self, table: &Table, index: &Index) -> Result<()> {
        // Indexes that merely shadow a key declaration are side effects of
        // the key in the target engine and are not re-emitted.
        if index.columns().is_empty() || index.primary || index.matches_key(table) {
            return Ok(());
        }
        let unique = if index.unique { "UNIQUE " } else { "" };
        let stmt = format!(
            "CREATE {}INDEX {} ON {} ({})",
            unique,
            self.dialect.index_name(table, index),
            self.qualified_name(table),
            self.column_list(index.columns()),
        );
        self.statement(&stmt)?;
        self.emitted_indexes += 1;
        Ok(())
    }

    fn visit_foreign_key(
        &mut self,
        database: &Database,
        table: &Table,
        key: &ForeignKey,
    ) -> Result<()> {
        let Some(related) = self.foreign_key_eligible(database, table, key) else {
            return Ok(());
        };
        let clause = self.foreign_key_clause(table, key, related);
        if self.dialect.require_inline_constraints() {
            self.table_body.push(clause);
        } else {
            let stmt = format!(
                "ALTER TABLE {} ADD {}",
                self.qualified_name(table),
                clause
            );
            self.statement(&stmt)?;
        }
        Ok(())
    }
}
