//! Target dialect implementations.
//!
//! Each module implements the [`Dialect`](crate::core::traits::Dialect)
//! strategy for one database engine. Dialects override only hooks (type
//! spellings, literal forms, quoting, capability flags) and never add
//! traversal logic of their own.
//!
//! # Adding New Dialects
//!
//! 1. Create a new module under `dialects/` implementing `Dialect`
//! 2. Register it in [`DialectCatalog::with_builtins`](crate::core::catalog::DialectCatalog::with_builtins)

pub mod firebird;
pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;

pub use firebird::FirebirdDialect;
pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// Decimal spelling in its three forms: bare, precision-only, and
/// precision + scale.
pub(crate) fn decimal_spelling(base: &str, precision: i32, scale: i32) -> String {
    if precision <= 0 {
        base.to_string()
    } else if scale <= 0 {
        format!("{}({})", base, precision)
    } else {
        format!("{}({}, {})", base, precision, scale)
    }
}

/// Length-parameterized spelling, falling back to the bare name when no
/// length is known.
pub(crate) fn sized(base: &str, size: i32) -> String {
    if size > 0 {
        format!("{}({})", base, size)
    } else {
        base.to_string()
    }
}
