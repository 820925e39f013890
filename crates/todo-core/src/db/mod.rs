//! SQLite database utilities.
//!
//! Runtime defaults:
//! - `journal_mode = WAL` so a reader in one shell does not block a writer in another
//! - `busy_timeout = 5s` to ride out short lock contention between invocations

pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::{path::Path, time::Duration};
use tracing::debug;

/// Busy timeout used for database connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the todo database, apply runtime pragmas, check the
/// connection, and migrate the schema to the latest version.
///
/// # Errors
///
/// Returns an error if opening/configuring/migrating the database fails.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create database directory {}", parent.display()))?;
    }

    let mut conn =
        Connection::open(path).with_context(|| format!("open database {}", path.display()))?;
    debug!(path = %path.display(), "opened todo database");

    configure_connection(&conn).context("configure sqlite pragmas")?;
    ping(&conn).with_context(|| format!("ping database {}", path.display()))?;
    debug!("pinged todo database");

    let version = migrations::migrate(&mut conn).context("apply schema migrations")?;
    debug!(version, "todo schema is current");

    Ok(conn)
}

/// Close the connection, reporting any error SQLite raises while finalizing.
///
/// # Errors
///
/// Returns an error if SQLite refuses to close the handle.
pub fn close_database(conn: Connection) -> Result<()> {
    conn.close()
        .map_err(|(_, err)| err)
        .context("close todo database")?;
    debug!("closed todo database");
    Ok(())
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    // Must come first: switching to WAL takes a lock a concurrent opener may hold.
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    Ok(())
}

fn ping(conn: &Connection) -> rusqlite::Result<()> {
    let _: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
    Ok(())
}
