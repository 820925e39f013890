//! The todo item entity.
//!
//! Fields are private: the id can only be set at construction, `created_at`
//! never changes after it, and `updated_at` only moves forward through
//! [`Item::touch`]. Validation of names lives in [`crate::domain`].

use crate::error::{Result, TodoError};
use chrono::{DateTime, Duration, Utc};
use rusqlite::Row;
use serde::Serialize;

/// Id carried by an item that storage has not assigned an id to yet.
pub const UNSAVED_ID: i64 = 0;

/// Number of columns in a stored `todos` row.
pub const ROW_COLUMN_COUNT: usize = 5;

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: i64,
    name: String,
    is_completed: bool,
    updated_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl Item {
    /// Build an item from explicit field values.
    #[must_use]
    pub fn new(
        id: i64,
        name: impl Into<String>,
        is_completed: bool,
        updated_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            is_completed,
            updated_at,
            created_at,
        }
    }

    /// Rebuild an item from a row shaped `(id, name, isCompleted, updatedAt, createdAt)`
    /// with timestamps stored as epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Decode`] when the row has the wrong column count,
    /// a column has the wrong type, the completion flag is not 0/1, or a
    /// timestamp is out of range.
    pub fn from_row(row: &Row<'_>) -> Result<Self> {
        let columns = row.as_ref().column_count();
        if columns != ROW_COLUMN_COUNT {
            return Err(TodoError::decode(format!(
                "expected {ROW_COLUMN_COUNT} columns, got {columns}"
            )));
        }

        let id: i64 = row.get(0).map_err(decode_column("id"))?;
        let name: String = row.get(1).map_err(decode_column("name"))?;
        let flag: i64 = row.get(2).map_err(decode_column("isCompleted"))?;
        let updated_at: i64 = row.get(3).map_err(decode_column("updatedAt"))?;
        let created_at: i64 = row.get(4).map_err(decode_column("createdAt"))?;

        let is_completed = match flag {
            0 => false,
            1 => true,
            other => {
                return Err(TodoError::decode(format!(
                    "todo {id}: completion flag must be 0 or 1, got {other}"
                )));
            }
        };

        Ok(Self {
            id,
            name,
            is_completed,
            updated_at: from_epoch_seconds(id, "updatedAt", updated_at)?,
            created_at: from_epoch_seconds(id, "createdAt", created_at)?,
        })
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` until storage has assigned an id.
    #[must_use]
    pub const fn is_unsaved(&self) -> bool {
        self.id == UNSAVED_ID
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub const fn set_completed(&mut self, is_completed: bool) {
        self.is_completed = is_completed;
    }

    /// Refresh `updated_at`, keeping it strictly increasing.
    ///
    /// A clock reading at or before the current value advances it by one
    /// microsecond instead.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// Convert a stored epoch-second column into a UTC timestamp.
fn from_epoch_seconds(id: i64, column: &str, secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TodoError::decode(format!("todo {id}: {column} {secs} is out of range")))
}

fn decode_column(column: &'static str) -> impl Fn(rusqlite::Error) -> TodoError {
    move |err| TodoError::decode(format!("column {column}: {err}"))
}
