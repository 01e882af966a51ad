//! Schema model for databases, tables, columns, and keys.
//!
//! These types form the dialect-neutral representation a script generator
//! walks. The model is assembled once per export run and is read-only
//! afterwards, except for attribute accumulation while keys are attached and
//! the caller-set `selected` flags.

use serde::{Deserialize, Serialize};

use super::collection::{validate_name, Named, NamedCollection};
use crate::error::{ExportError, Result};

/// Normalized type kind shared by every dialect.
///
/// Unrecognized source types map to [`TypeKind::Unknown`]; rendering then
/// echoes the native spelling instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Currency,
    Decimal,
    Date,
    Time,
    DateTime,
    Char,
    VarChar,
    NChar,
    NVarChar,
    Text,
    Blob,
    Bit,
    Guid,
    RowVersion,
    Xml,
    Json,
    Geometry,
    Unknown,
}

impl TypeKind {
    /// Parse a normalized kind token as delivered by metadata providers.
    ///
    /// Tokens are case-insensitive; anything unrecognized becomes
    /// [`TypeKind::Unknown`] so the native spelling can be echoed later.
    pub fn parse(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => TypeKind::Boolean,
            "int8" | "tinyint" => TypeKind::Int8,
            "int16" | "smallint" => TypeKind::Int16,
            "int32" | "int" | "integer" => TypeKind::Int32,
            "int64" | "bigint" => TypeKind::Int64,
            "uint8" => TypeKind::UInt8,
            "uint16" => TypeKind::UInt16,
            "uint32" => TypeKind::UInt32,
            "uint64" => TypeKind::UInt64,
            "float32" | "single" | "real" => TypeKind::Float32,
            "float64" | "double" | "float" => TypeKind::Float64,
            "currency" | "money" => TypeKind::Currency,
            "decimal" | "numeric" => TypeKind::Decimal,
            "date" => TypeKind::Date,
            "time" => TypeKind::Time,
            "datetime" | "timestamp" => TypeKind::DateTime,
            "char" => TypeKind::Char,
            "varchar" => TypeKind::VarChar,
            "nchar" => TypeKind::NChar,
            "nvarchar" => TypeKind::NVarChar,
            "text" | "clob" => TypeKind::Text,
            "blob" | "binary" => TypeKind::Blob,
            "bit" => TypeKind::Bit,
            "guid" | "uuid" => TypeKind::Guid,
            "rowversion" => TypeKind::RowVersion,
            "xml" => TypeKind::Xml,
            "json" => TypeKind::Json,
            "geometry" => TypeKind::Geometry,
            _ => TypeKind::Unknown,
        }
    }

    /// Integer, float, decimal, and currency kinds.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeKind::Int8
                | TypeKind::Int16
                | TypeKind::Int32
                | TypeKind::Int64
                | TypeKind::UInt8
                | TypeKind::UInt16
                | TypeKind::UInt32
                | TypeKind::UInt64
                | TypeKind::Float32
                | TypeKind::Float64
                | TypeKind::Currency
                | TypeKind::Decimal
        )
    }

    /// Unsigned integer kinds.
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            TypeKind::UInt8 | TypeKind::UInt16 | TypeKind::UInt32 | TypeKind::UInt64
        )
    }

    /// Character kinds, fixed or variable, plain or unicode.
    pub fn is_character(self) -> bool {
        matches!(
            self,
            TypeKind::Char
                | TypeKind::VarChar
                | TypeKind::NChar
                | TypeKind::NVarChar
                | TypeKind::Text
        )
    }

    /// Unicode character kinds.
    pub fn is_unicode(self) -> bool {
        matches!(self, TypeKind::NChar | TypeKind::NVarChar)
    }

    /// Kinds whose storage width does not vary per value.
    pub fn is_fixed_length(self) -> bool {
        matches!(
            self,
            TypeKind::Char | TypeKind::NChar | TypeKind::Decimal | TypeKind::Currency
        )
    }

    /// Date/time kinds.
    pub fn is_temporal(self) -> bool {
        matches!(self, TypeKind::Date | TypeKind::Time | TypeKind::DateTime)
    }

    /// Binary kinds.
    pub fn is_binary(self) -> bool {
        matches!(self, TypeKind::Blob | TypeKind::Bit | TypeKind::RowVersion)
    }
}

/// Column attribute bit set.
///
/// Attributes are only ever added, never cleared: the type-derived subset is
/// fixed at construction, and the key-membership bits are tagged once when
/// the column is bound into a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnAttributes(u32);

impl ColumnAttributes {
    pub const NONE: Self = Self(0);
    pub const REQUIRED: Self = Self(1);
    pub const COMPUTED: Self = Self(1 << 1);
    pub const IDENTITY: Self = Self(1 << 2);
    pub const PK_COLUMN: Self = Self(1 << 3);
    pub const FK_COLUMN: Self = Self(1 << 4);
    pub const IX_COLUMN: Self = Self(1 << 5);
    pub const NUMERIC: Self = Self(1 << 6);
    pub const ALPHABETIC: Self = Self(1 << 7);
    pub const FIXED_LENGTH: Self = Self(1 << 8);
    pub const UNSIGNED: Self = Self(1 << 9);
    pub const UNICODE: Self = Self(1 << 10);
    pub const TEMPORAL: Self = Self(1 << 11);
    pub const BINARY: Self = Self(1 << 12);

    /// True when every bit of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Add the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for ColumnAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Identity (auto-increment) metadata, attached after base construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySpec {
    /// First generated value.
    pub seed: i64,
    /// Step between generated values.
    pub increment: i64,
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    name: String,

    /// Normalized type kind.
    pub kind: TypeKind,

    /// The source engine's own spelling of the type.
    pub native_type: String,

    /// Character/binary length (0 when not applicable).
    pub size: i32,

    /// Numeric precision (0 when not applicable).
    pub precision: i32,

    /// Numeric scale.
    pub scale: i32,

    attributes: ColumnAttributes,

    identity: Option<IdentitySpec>,

    /// Default value in the source engine's spelling, emitted verbatim.
    pub default_value: Option<String>,

    /// Free-form column description.
    pub description: Option<String>,

    /// Caller-set inclusion flag for the current export run.
    pub selected: bool,
}

impl Column {
    /// Create a column, deriving the type-dependent attribute subset.
    pub fn new(
        name: impl Into<String>,
        kind: TypeKind,
        native_type: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name, "column")?;

        let mut attributes = ColumnAttributes::NONE;
        if kind.is_numeric() {
            attributes.insert(ColumnAttributes::NUMERIC);
        }
        if kind.is_unsigned() {
            attributes.insert(ColumnAttributes::UNSIGNED);
        }
        if kind.is_character() {
            attributes.insert(ColumnAttributes::ALPHABETIC);
        }
        if kind.is_unicode() {
            attributes.insert(ColumnAttributes::UNICODE);
        }
        if kind.is_fixed_length() {
            attributes.insert(ColumnAttributes::FIXED_LENGTH);
        }
        if kind.is_temporal() {
            attributes.insert(ColumnAttributes::TEMPORAL);
        }
        if kind.is_binary() {
            attributes.insert(ColumnAttributes::BINARY);
        }

        Ok(Self {
            name,
            kind,
            native_type: native_type.into(),
            size: 0,
            precision: 0,
            scale: 0,
            attributes,
            identity: None,
            default_value: None,
            description: None,
            selected: true,
        })
    }

    /// Set the character/binary length.
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    /// Set numeric precision and scale.
    pub fn with_precision(mut self, precision: i32, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Set the default value spelling.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// The current attribute set.
    pub fn attributes(&self) -> ColumnAttributes {
        self.attributes
    }

    /// Mark the column NOT NULL.
    pub fn set_required(&mut self) {
        self.attributes.insert(ColumnAttributes::REQUIRED);
    }

    /// Mark the column as computed by the source engine.
    pub fn set_computed(&mut self) {
        self.attributes.insert(ColumnAttributes::COMPUTED);
    }

    /// Attach identity metadata.
    ///
    /// Identity details may arrive from a separate metadata query than the
    /// base column definition, hence the explicit second mutation.
    pub fn set_identity(&mut self, seed: i64, increment: i64) {
        self.attributes.insert(ColumnAttributes::IDENTITY);
        self.identity = Some(IdentitySpec { seed, increment });
    }

    /// Identity metadata, if attached.
    pub fn identity(&self) -> Option<IdentitySpec> {
        self.identity
    }

    pub fn is_required(&self) -> bool {
        self.attributes.contains(ColumnAttributes::REQUIRED)
    }

    pub fn is_computed(&self) -> bool {
        self.attributes.contains(ColumnAttributes::COMPUTED)
    }

    pub fn is_identity(&self) -> bool {
        self.attributes.contains(ColumnAttributes::IDENTITY)
    }

    pub fn in_primary_key(&self) -> bool {
        self.attributes.contains(ColumnAttributes::PK_COLUMN)
    }

    pub fn in_foreign_key(&self) -> bool {
        self.attributes.contains(ColumnAttributes::FK_COLUMN)
    }

    pub fn in_index(&self) -> bool {
        self.attributes.contains(ColumnAttributes::IX_COLUMN)
    }

    /// Tag the column as a member of a key. Used by key construction only.
    pub(crate) fn tag(&mut self, attribute: ColumnAttributes) {
        self.attributes.insert(attribute);
    }
}

impl Named for Column {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Named domain or enumeration type scoped to a database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataType {
    name: String,

    /// Normalized type kind of the underlying base type.
    pub kind: TypeKind,

    /// The source engine's own spelling of the base type.
    pub native_type: String,

    pub size: i32,
    pub precision: i32,
    pub scale: i32,

    /// Whether NULL is permitted.
    pub nullable: bool,

    /// Enumeration flag; `values` carries the literal set when true.
    pub is_enum: bool,

    /// Possible literal values for enumerated types.
    pub values: Vec<String>,

    /// Default value in the source engine's spelling.
    pub default_value: Option<String>,
}

impl DataType {
    pub fn new(
        name: impl Into<String>,
        kind: TypeKind,
        native_type: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name, "data type")?;
        Ok(Self {
            name,
            kind,
            native_type: native_type.into(),
            size: 0,
            precision: 0,
            scale: 0,
            nullable: true,
            is_enum: false,
            values: Vec::new(),
            default_value: None,
        })
    }
}

impl Named for DataType {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Referential action for foreign-key update/delete rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyRule {
    #[default]
    None,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ForeignKeyRule {
    /// Parse a rule token as delivered by metadata providers.
    pub fn parse(token: &str) -> Result<Self> {
        match token.to_ascii_lowercase().replace([' ', '_'], "").as_str() {
            "" | "none" | "noaction" => Ok(ForeignKeyRule::None),
            "restrict" => Ok(ForeignKeyRule::Restrict),
            "cascade" => Ok(ForeignKeyRule::Cascade),
            "setnull" => Ok(ForeignKeyRule::SetNull),
            "setdefault" => Ok(ForeignKeyRule::SetDefault),
            _ => Err(ExportError::schema(format!(
                "unknown foreign key rule '{}'",
                token
            ))),
        }
    }
}

/// Primary key: an ordered, named subset of a table's columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryKey {
    name: String,
    columns: Vec<String>,

    /// Caller-set inclusion flag for the current export run.
    pub selected: bool,
}

impl PrimaryKey {
    fn new(name: String, columns: Vec<String>) -> Self {
        Self {
            name,
            columns,
            selected: true,
        }
    }

    /// Member column names in key order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// True only for a single-column key whose sole column is an identity.
    pub fn is_identity(&self, table: &Table) -> bool {
        self.single_column(table).is_some_and(Column::is_identity)
    }

    /// True only for a single-column key whose sole column is computed.
    pub fn is_computed(&self, table: &Table) -> bool {
        self.single_column(table).is_some_and(Column::is_computed)
    }

    fn single_column<'a>(&self, table: &'a Table) -> Option<&'a Column> {
        match self.columns.as_slice() {
            [only] => table.column(only),
            _ => None,
        }
    }
}

impl Named for PrimaryKey {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Secondary index: an ordered, named subset of a table's columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    name: String,
    columns: Vec<String>,

    /// Whether the index enforces uniqueness.
    pub unique: bool,

    /// Whether the source engine reported this index as the primary key's
    /// backing index.
    pub primary: bool,

    /// Caller-set inclusion flag for the current export run.
    pub selected: bool,
}

impl Index {
    fn new(name: String, columns: Vec<String>, unique: bool, primary: bool) -> Self {
        Self {
            name,
            columns,
            unique,
            primary,
            selected: true,
        }
    }

    /// Member column names in index order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Structural comparison against the table's primary key: same column
    /// names in the same order.
    pub fn matches_primary_key(&self, table: &Table) -> bool {
        table
            .primary_key()
            .is_some_and(|pk| pk.columns() == self.columns.as_slice())
    }

    /// Structural comparison against any of the table's foreign keys.
    pub fn matches_foreign_key(&self, table: &Table) -> bool {
        table
            .foreign_keys()
            .iter()
            .any(|fk| fk.columns() == self.columns.as_slice())
    }

    /// True when this index is a structural duplicate of the primary key or
    /// a foreign key, i.e. a side effect of a key declaration in engines
    /// that back keys with indexes.
    pub fn matches_key(&self, table: &Table) -> bool {
        self.matches_primary_key(table) || self.matches_foreign_key(table)
    }
}

impl Named for Index {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Foreign key relating columns of this table to columns of another.
///
/// The related table is held symbolically by name and resolved against the
/// database at access time, so forward references and intentionally excluded
/// tables need no special handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKey {
    name: String,
    columns: Vec<String>,
    related_table: String,
    related_columns: Vec<String>,

    /// Action applied on update of the related row.
    pub update_rule: ForeignKeyRule,

    /// Action applied on delete of the related row.
    pub delete_rule: ForeignKeyRule,

    /// Caller-set inclusion flag for the current export run.
    pub selected: bool,
}

impl ForeignKey {
    fn new(
        name: String,
        columns: Vec<String>,
        related_table: String,
        related_columns: Vec<String>,
        update_rule: ForeignKeyRule,
        delete_rule: ForeignKeyRule,
    ) -> Self {
        Self {
            name,
            columns,
            related_table,
            related_columns,
            update_rule,
            delete_rule,
            selected: true,
        }
    }

    /// Referencing column names on the owning table, in key order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Name of the related (referenced) table.
    pub fn related_table_name(&self) -> &str {
        &self.related_table
    }

    /// Referenced column names on the related table, in key order.
    pub fn related_columns(&self) -> &[String] {
        &self.related_columns
    }

    /// Resolve the related table against the database, if present.
    pub fn related_table<'a>(&self, database: &'a Database) -> Option<&'a Table> {
        database.table(&self.related_table)
    }
}

impl Named for ForeignKey {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Table metadata: columns, keys, and indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    name: String,
    owner: String,
    columns: NamedCollection<Column>,
    indexes: NamedCollection<Index>,
    foreign_keys: NamedCollection<ForeignKey>,
    primary_key: Option<PrimaryKey>,

    /// Caller-set inclusion flag for the current export run.
    pub selected: bool,
}

impl Table {
    /// Create a table. `owner` is the schema qualifier and may be empty.
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name, "table")?;
        Ok(Self {
            name,
            owner: owner.into(),
            columns: NamedCollection::new(),
            indexes: NamedCollection::new(),
            foreign_keys: NamedCollection::new(),
            primary_key: None,
            selected: true,
        })
    }

    /// The schema qualifier (may be empty).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn columns(&self) -> &NamedCollection<Column> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.get_mut(name)
    }

    /// Append a column. Columns must exist before any key referencing them.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        self.columns.add(column)
    }

    pub fn indexes(&self) -> &NamedCollection<Index> {
        &self.indexes
    }

    pub fn index_mut(&mut self, name: &str) -> Option<&mut Index> {
        self.indexes.get_mut(name)
    }

    pub fn foreign_keys(&self) -> &NamedCollection<ForeignKey> {
        &self.foreign_keys
    }

    pub fn foreign_key_mut(&mut self, name: &str) -> Option<&mut ForeignKey> {
        self.foreign_keys.get_mut(name)
    }

    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    pub fn primary_key_mut(&mut self) -> Option<&mut PrimaryKey> {
        self.primary_key.as_mut()
    }

    /// Attach the primary key, tagging its member columns.
    ///
    /// Fails when a key is already attached or a column name does not exist
    /// on this table. Columns are tagged only after the whole key validates.
    pub fn set_primary_key(
        &mut self,
        name: impl Into<String>,
        columns: Vec<String>,
    ) -> Result<()> {
        let name = name.into();
        validate_name(&name, "primary key")?;
        if self.primary_key.is_some() {
            return Err(ExportError::schema(format!(
                "table '{}' already has a primary key",
                self.full_name()
            )));
        }
        self.check_key_columns(&name, &columns)?;
        self.tag_columns(&columns, ColumnAttributes::PK_COLUMN);
        self.primary_key = Some(PrimaryKey::new(name, columns));
        Ok(())
    }

    /// Append an index, tagging its member columns.
    pub fn add_index(
        &mut self,
        name: impl Into<String>,
        columns: Vec<String>,
        unique: bool,
        primary: bool,
    ) -> Result<()> {
        let name = name.into();
        validate_name(&name, "index")?;
        self.check_key_columns(&name, &columns)?;
        self.indexes
            .add(Index::new(name, columns.clone(), unique, primary))?;
        self.tag_columns(&columns, ColumnAttributes::IX_COLUMN);
        Ok(())
    }

    /// Append a foreign key, tagging its member columns.
    ///
    /// The related table is not resolved here; it may be absent from the
    /// database or appear later.
    pub fn add_foreign_key(
        &mut self,
        name: impl Into<String>,
        columns: Vec<String>,
        related_table: impl Into<String>,
        related_columns: Vec<String>,
        update_rule: ForeignKeyRule,
        delete_rule: ForeignKeyRule,
    ) -> Result<()> {
        let name = name.into();
        validate_name(&name, "foreign key")?;
        self.check_key_columns(&name, &columns)?;
        self.foreign_keys.add(ForeignKey::new(
            name,
            columns.clone(),
            related_table.into(),
            related_columns,
            update_rule,
            delete_rule,
        ))?;
        self.tag_columns(&columns, ColumnAttributes::FK_COLUMN);
        Ok(())
    }

    fn check_key_columns(&self, key_name: &str, columns: &[String]) -> Result<()> {
        for column in columns {
            if self.column(column).is_none() {
                return Err(ExportError::schema(format!(
                    "key '{}' references column '{}' which does not exist on table '{}'",
                    key_name,
                    column,
                    self.full_name()
                )));
            }
        }
        Ok(())
    }

    fn tag_columns(&mut self, columns: &[String], attribute: ColumnAttributes) {
        for column in columns {
            if let Some(col) = self.columns.get_mut(column) {
                col.tag(attribute);
            }
        }
    }

    /// Columns not participating in the primary key. Computed on demand.
    pub fn non_primary_key_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| !c.in_primary_key())
            .collect()
    }

    /// Columns not participating in any foreign key. Computed on demand.
    pub fn non_foreign_key_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| !c.in_foreign_key())
            .collect()
    }

    /// Columns not participating in any key or index. Computed on demand.
    pub fn non_key_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| !c.in_primary_key() && !c.in_foreign_key() && !c.in_index())
            .collect()
    }

    /// Tables this table's foreign keys reference, resolved on demand.
    pub fn referenced_tables<'a>(&self, database: &'a Database) -> Vec<&'a Table> {
        self.foreign_keys
            .iter()
            .filter_map(|fk| fk.related_table(database))
            .collect()
    }

    /// Tables holding a foreign key that references this table.
    pub fn referencing_tables<'a>(&self, database: &'a Database) -> Vec<&'a Table> {
        database
            .tables()
            .iter()
            .filter(|other| {
                other.foreign_keys().iter().any(|fk| {
                    fk.related_table_name() == self.name
                        || fk.related_table_name() == self.full_name()
                })
            })
            .collect()
    }
}

impl Named for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        if self.owner.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.owner, self.name)
        }
    }
}

/// Root of the schema model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    name: String,

    /// Provider identity (opaque, never reparsed).
    pub provider: String,

    /// Connection identity (opaque, never reparsed).
    pub connection: String,

    data_types: NamedCollection<DataType>,
    tables: NamedCollection<Table>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name, "database")?;
        Ok(Self {
            name,
            provider: String::new(),
            connection: String::new(),
            data_types: NamedCollection::new(),
            tables: NamedCollection::new(),
        })
    }

    pub fn data_types(&self) -> &NamedCollection<DataType> {
        &self.data_types
    }

    pub fn add_data_type(&mut self, data_type: DataType) -> Result<()> {
        self.data_types.add(data_type)
    }

    pub fn tables(&self) -> &NamedCollection<Table> {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn add_table(&mut self, table: Table) -> Result<()> {
        self.tables.add(table)
    }
}

impl Named for Database {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_column(name: &str, kind: TypeKind) -> Column {
        Column::new(name, kind, "test").unwrap()
    }

    fn make_table(name: &str) -> Table {
        let mut table = Table::new(name, "dbo").unwrap();
        table
            .add_column(make_column("id", TypeKind::Int32))
            .unwrap();
        table
            .add_column(make_column("name", TypeKind::VarChar))
            .unwrap();
        table
            .add_column(make_column("price", TypeKind::Decimal))
            .unwrap();
        table
    }

    #[test]
    fn test_empty_names_rejected() {
        assert!(Column::new("", TypeKind::Int32, "int").is_err());
        assert!(Table::new("  ", "dbo").is_err());
        assert!(Database::new("").is_err());
    }

    #[test]
    fn test_table_full_name() {
        let table = make_table("products");
        assert_eq!(table.full_name(), "dbo.products");

        let bare = Table::new("products", "").unwrap();
        assert_eq!(bare.full_name(), "products");
    }

    #[test]
    fn test_derived_attributes() {
        let decimal = make_column("price", TypeKind::Decimal);
        assert!(decimal
            .attributes()
            .contains(ColumnAttributes::NUMERIC | ColumnAttributes::FIXED_LENGTH));

        let nvarchar = make_column("title", TypeKind::NVarChar);
        assert!(nvarchar
            .attributes()
            .contains(ColumnAttributes::ALPHABETIC | ColumnAttributes::UNICODE));
        assert!(!nvarchar.attributes().contains(ColumnAttributes::NUMERIC));

        let stamp = make_column("modified", TypeKind::DateTime);
        assert!(stamp.attributes().contains(ColumnAttributes::TEMPORAL));

        let raw = make_column("payload", TypeKind::Blob);
        assert!(raw.attributes().contains(ColumnAttributes::BINARY));

        let count = make_column("count", TypeKind::UInt32);
        assert!(count
            .attributes()
            .contains(ColumnAttributes::NUMERIC | ColumnAttributes::UNSIGNED));
    }

    #[test]
    fn test_primary_key_tags_columns_in_order() {
        let mut table = make_table("products");
        table
            .set_primary_key("pk_products", vec!["id".to_string(), "name".to_string()])
            .unwrap();

        let pk = table.primary_key().unwrap();
        assert_eq!(pk.columns(), ["id", "name"]);
        assert!(table.column("id").unwrap().in_primary_key());
        assert!(table.column("name").unwrap().in_primary_key());
        assert!(!table.column("price").unwrap().in_primary_key());
        // Unrelated bits untouched.
        assert!(!table.column("id").unwrap().in_foreign_key());
    }

    #[test]
    fn test_second_primary_key_rejected() {
        let mut table = make_table("products");
        table
            .set_primary_key("pk_products", vec!["id".to_string()])
            .unwrap();
        assert!(table
            .set_primary_key("pk_again", vec!["name".to_string()])
            .is_err());
    }

    #[test]
    fn test_key_with_unknown_column_fails() {
        let mut table = make_table("products");
        let err = table
            .set_primary_key("pk_products", vec!["missing".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert!(table.primary_key().is_none());

        assert!(table
            .add_index("ix_bad", vec!["missing".to_string()], false, false)
            .is_err());
        assert!(table.indexes().is_empty());
    }

    #[test]
    fn test_index_tags_columns() {
        let mut table = make_table("products");
        table
            .add_index("ix_name", vec!["name".to_string()], true, false)
            .unwrap();
        assert!(table.column("name").unwrap().in_index());
        assert!(!table.column("id").unwrap().in_index());
    }

    #[test]
    fn test_foreign_key_tags_columns() {
        let mut table = make_table("products");
        table
            .add_foreign_key(
                "fk_category",
                vec!["id".to_string()],
                "category",
                vec!["category_id".to_string()],
                ForeignKeyRule::None,
                ForeignKeyRule::Cascade,
            )
            .unwrap();
        assert!(table.column("id").unwrap().in_foreign_key());
        assert_eq!(
            table.foreign_keys().get("fk_category").unwrap().delete_rule,
            ForeignKeyRule::Cascade
        );
    }

    #[test]
    fn test_index_matches_key() {
        let mut table = make_table("products");
        table
            .set_primary_key("pk_products", vec!["id".to_string(), "name".to_string()])
            .unwrap();
        table
            .add_index(
                "ix_pk_shadow",
                vec!["id".to_string(), "name".to_string()],
                true,
                false,
            )
            .unwrap();
        table
            .add_index(
                "ix_reordered",
                vec!["name".to_string(), "id".to_string()],
                true,
                false,
            )
            .unwrap();
        table
            .add_index("ix_price", vec!["price".to_string()], false, false)
            .unwrap();

        assert!(table.indexes().get("ix_pk_shadow").unwrap().matches_key(&table));
        // Same set, different order must not match.
        assert!(!table.indexes().get("ix_reordered").unwrap().matches_key(&table));
        assert!(!table.indexes().get("ix_price").unwrap().matches_key(&table));
    }

    #[test]
    fn test_foreign_key_symbolic_resolution() {
        let mut db = Database::new("world").unwrap();
        let mut city = Table::new("city", "").unwrap();
        city.add_column(make_column("countrycode", TypeKind::Char))
            .unwrap();
        city.add_foreign_key(
            "fk_city_country",
            vec!["countrycode".to_string()],
            "country",
            vec!["code".to_string()],
            ForeignKeyRule::None,
            ForeignKeyRule::None,
        )
        .unwrap();
        db.add_table(city).unwrap();

        // Forward reference: country is not present yet.
        let fk_table = db.table("city").unwrap();
        let fk = fk_table.foreign_keys().get("fk_city_country").unwrap();
        assert!(fk.related_table(&db).is_none());

        let mut country = Table::new("country", "").unwrap();
        country
            .add_column(make_column("code", TypeKind::Char))
            .unwrap();
        db.add_table(country).unwrap();

        let fk_table = db.table("city").unwrap();
        let fk = fk_table.foreign_keys().get("fk_city_country").unwrap();
        assert_eq!(fk.related_table(&db).unwrap().name(), "country");
    }

    #[test]
    fn test_referenced_and_referencing_tables() {
        let mut db = Database::new("world").unwrap();

        let mut country = Table::new("country", "").unwrap();
        country
            .add_column(make_column("code", TypeKind::Char))
            .unwrap();
        db.add_table(country).unwrap();

        let mut city = Table::new("city", "").unwrap();
        city.add_column(make_column("countrycode", TypeKind::Char))
            .unwrap();
        city.add_foreign_key(
            "fk_city_country",
            vec!["countrycode".to_string()],
            "country",
            vec!["code".to_string()],
            ForeignKeyRule::None,
            ForeignKeyRule::None,
        )
        .unwrap();
        db.add_table(city).unwrap();

        let city = db.table("city").unwrap();
        let referenced: Vec<&str> = city
            .referenced_tables(&db)
            .iter()
            .map(|t| t.name())
            .collect();
        assert_eq!(referenced, vec!["country"]);

        let country = db.table("country").unwrap();
        let referencing: Vec<&str> = country
            .referencing_tables(&db)
            .iter()
            .map(|t| t.name())
            .collect();
        assert_eq!(referencing, vec!["city"]);
    }

    #[test]
    fn test_primary_key_identity_predicate() {
        let mut table = make_table("products");
        table.column_mut("id").unwrap().set_identity(1, 1);
        table
            .set_primary_key("pk_products", vec!["id".to_string()])
            .unwrap();
        assert!(table.primary_key().unwrap().is_identity(&table));
        assert!(!table.primary_key().unwrap().is_computed(&table));

        let mut composite = make_table("pairs");
        composite.column_mut("id").unwrap().set_identity(1, 1);
        composite
            .set_primary_key("pk_pairs", vec!["id".to_string(), "name".to_string()])
            .unwrap();
        // Multi-column keys are never identity keys.
        assert!(!composite.primary_key().unwrap().is_identity(&composite));
    }

    #[test]
    fn test_identity_second_mutation() {
        let mut column = make_column("id", TypeKind::Int32);
        assert!(!column.is_identity());
        assert!(column.identity().is_none());

        column.set_identity(10, 5);
        assert!(column.is_identity());
        let identity = column.identity().unwrap();
        assert_eq!((identity.seed, identity.increment), (10, 5));
    }

    #[test]
    fn test_foreign_key_rule_parse() {
        assert_eq!(
            ForeignKeyRule::parse("NO ACTION").unwrap(),
            ForeignKeyRule::None
        );
        assert_eq!(
            ForeignKeyRule::parse("set null").unwrap(),
            ForeignKeyRule::SetNull
        );
        assert_eq!(
            ForeignKeyRule::parse("CASCADE").unwrap(),
            ForeignKeyRule::Cascade
        );
        assert!(ForeignKeyRule::parse("explode").is_err());
    }

    #[test]
    fn test_type_kind_parse() {
        assert_eq!(TypeKind::parse("BIGINT"), TypeKind::Int64);
        assert_eq!(TypeKind::parse("nvarchar"), TypeKind::NVarChar);
        assert_eq!(TypeKind::parse("uuid"), TypeKind::Guid);
        assert_eq!(TypeKind::parse("hierarchyid"), TypeKind::Unknown);
    }
}
