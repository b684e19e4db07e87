//! SQL dialect resolution.
//!
//! Maps free-form dialect names from configuration to a canonical [`SqlDialect`].
//! Unknown names never fail: they fall back to [`SqlDialect::Default`] with a warning.

use crate::models::DatabaseType;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Canonical SQL dialects understood by the query context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Generic dialect, also used for backends without native support.
    Default,
    Postgres,
    MySql,
    MariaDb,
    H2,
    Hsqldb,
    Derby,
    Firebird,
    Sqlite,
}

/// The dialect every unrecognized name resolves to.
pub const PROCESS_DEFAULT_DIALECT: SqlDialect = SqlDialect::Default;

/// Known aliases, matched case-insensitively after trimming.
const DIALECT_ALIASES: &[(&str, SqlDialect)] = &[
    ("default", SqlDialect::Default),
    ("postgres", SqlDialect::Postgres),
    ("postgresql", SqlDialect::Postgres),
    ("pgsql", SqlDialect::Postgres),
    ("pg", SqlDialect::Postgres),
    ("mysql", SqlDialect::MySql),
    ("mariadb", SqlDialect::MariaDb),
    ("h2", SqlDialect::H2),
    ("hsqldb", SqlDialect::Hsqldb),
    ("derby", SqlDialect::Derby),
    ("firebird", SqlDialect::Firebird),
    ("sqlite", SqlDialect::Sqlite),
    // No native support: generic dialect.
    ("oracle", SqlDialect::Default),
    ("sqlserver", SqlDialect::Default),
    ("mssql", SqlDialect::Default),
    ("db2", SqlDialect::Default),
];

/// Outcome of a dialect lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectResolution {
    pub dialect: SqlDialect,
    /// False when the name was not in the alias table and the fallback was used.
    pub recognized: bool,
}

impl SqlDialect {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::H2 => "h2",
            Self::Hsqldb => "hsqldb",
            Self::Derby => "derby",
            Self::Firebird => "firebird",
            Self::Sqlite => "sqlite",
        }
    }

    /// Pool backend this dialect natively requires, if any.
    ///
    /// Dialects without a native backend run on any pool.
    pub fn native_backend(&self) -> Option<DatabaseType> {
        match self {
            Self::Postgres => Some(DatabaseType::PostgreSQL),
            Self::MySql | Self::MariaDb => Some(DatabaseType::MySQL),
            Self::Sqlite => Some(DatabaseType::SQLite),
            _ => None,
        }
    }

    /// Check whether this dialect can run on a pool of the given backend.
    pub fn supports(&self, backend: DatabaseType) -> bool {
        self.native_backend().is_none_or(|native| native == backend)
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look a dialect name up without logging.
pub fn lookup(name: &str) -> DialectResolution {
    let needle = name.trim();
    DIALECT_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(needle))
        .map(|(_, dialect)| DialectResolution {
            dialect: *dialect,
            recognized: true,
        })
        .unwrap_or(DialectResolution {
            dialect: PROCESS_DEFAULT_DIALECT,
            recognized: false,
        })
}

/// Resolve a dialect name, warning when the fallback dialect is used.
pub fn resolve(name: &str) -> SqlDialect {
    let resolution = lookup(name);
    if !resolution.recognized {
        warn!(
            dialect = %name,
            fallback = %resolution.dialect,
            "Unknown SQL dialect, using the default dialect"
        );
    }
    resolution.dialect
}
