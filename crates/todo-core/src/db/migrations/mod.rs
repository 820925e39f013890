//! Forward-only SQLite schema migrations.
//!
//! The applied version lives in `PRAGMA user_version`. Each pending migration
//! runs inside its own transaction together with the version bump, so a
//! failing step leaves the file at the last version that committed.

use super::schema;
use rusqlite::{Connection, types::Type};
use tracing::debug;

/// A single schema step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub version: u32,
    pub sql: &'static str,
}

/// Latest schema version understood by this binary.
pub const LATEST_SCHEMA_VERSION: u32 = 2;

/// Migrations embedded in the binary, in ascending order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: schema::MIGRATION_V1_SQL,
    },
    Migration {
        version: 2,
        sql: schema::MIGRATION_V2_SQL,
    },
];

/// Errors raised while bringing a database up to date.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The migration set itself is unusable.
    #[error("invalid migration definitions: {0}")]
    InvalidDefinitions(String),

    /// The file was written by a newer binary.
    #[error("database schema version {found} is newer than the latest known version {latest}")]
    SchemaTooNew { found: u32, latest: u32 },

    /// A migration step failed and was rolled back.
    #[error("migration to version {version} failed: {source}")]
    Step {
        version: u32,
        #[source]
        source: rusqlite::Error,
    },

    /// Reading the schema version failed.
    #[error("read schema version: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl MigrationError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> crate::error::ErrorCode {
        match self {
            Self::SchemaTooNew { .. } => crate::error::ErrorCode::SchemaTooNew,
            Self::InvalidDefinitions(_) | Self::Step { .. } | Self::Sqlite(_) => {
                crate::error::ErrorCode::MigrationFailed
            }
        }
    }
}

/// Read `PRAGMA user_version` and convert it to a Rust `u32`.
///
/// # Errors
///
/// Returns an error if querying SQLite fails or the version value cannot be
/// represented as `u32`.
pub fn current_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(version).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(error))
    })
}

/// Apply all pending embedded migrations in ascending order.
///
/// # Errors
///
/// Returns an error if the database is newer than this binary or any
/// migration step fails.
pub fn migrate(conn: &mut Connection) -> Result<u32, MigrationError> {
    migrate_with(conn, MIGRATIONS)
}

/// Apply all pending migrations from `migrations` in ascending order.
///
/// Running against an up-to-date database is a no-op returning the current
/// version.
///
/// # Errors
///
/// Returns an error if the definitions are malformed, the database is newer
/// than the last definition, or a step fails. A failed step is rolled back.
pub fn migrate_with(conn: &mut Connection, migrations: &[Migration]) -> Result<u32, MigrationError> {
    validate_definitions(migrations)?;

    let latest = migrations.last().map_or(0, |m| m.version);
    let mut current = current_schema_version(conn)?;
    if current > latest {
        return Err(MigrationError::SchemaTooNew {
            found: current,
            latest,
        });
    }

    for migration in migrations {
        if migration.version <= current {
            continue;
        }

        apply(conn, migration).map_err(|source| MigrationError::Step {
            version: migration.version,
            source,
        })?;
        debug!(version = migration.version, "applied schema migration");
        current = migration.version;
    }

    Ok(current)
}

fn apply(conn: &mut Connection, migration: &Migration) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", i64::from(migration.version))?;
    tx.commit()
}

fn validate_definitions(migrations: &[Migration]) -> Result<(), MigrationError> {
    let mut previous = 0;
    for migration in migrations {
        if migration.version <= previous {
            return Err(MigrationError::InvalidDefinitions(format!(
                "version {} does not follow version {previous}",
                migration.version
            )));
        }
        if migration.sql.trim().is_empty() {
            return Err(MigrationError::InvalidDefinitions(format!(
                "version {} has no SQL",
                migration.version
            )));
        }
        previous = migration.version;
    }
    Ok(())
}
