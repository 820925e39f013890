//! Canonical SQLite schema for the todo database.
//!
//! A single `todos` table holds every item. Timestamps are integer epoch
//! seconds and the completion flag is an integer constrained to 0/1.

/// Name of the table holding todo items.
pub const TODOS_TABLE: &str = "todos";

/// Migration v1: the `todos` table.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    displayName TEXT NOT NULL CHECK (length(displayName) > 0),
    isCompleted INTEGER NOT NULL DEFAULT 0 CHECK (isCompleted IN (0, 1)),
    updatedAt INTEGER NOT NULL,
    createdAt INTEGER NOT NULL
);
";

/// Migration v2: read-path index for the incomplete-first listing.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_todos_completed_id
    ON todos(isCompleted, id);
";

/// Indexes every fully migrated database must contain.
pub const REQUIRED_INDEXES: &[&str] = &["idx_todos_completed_id"];
