//! SQLite-backed storage for todo items.
//!
//! [`TodoRepository`] is the only path to the `todos` table. Mutations report
//! the number of affected rows so callers can tell "no such item" (0) apart
//! from a failed statement (an error).

use crate::error::{Result, TodoError};
use crate::model::item::{Item, UNSAVED_ID};
use rusqlite::{Connection, params};
use tracing::debug;

const SELECT_COLUMNS: &str = "SELECT id, displayName, isCompleted, updatedAt, createdAt FROM todos";

/// Storage operations the use cases depend on.
pub trait TodoRepository {
    /// Insert `item` and return the id storage assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the insert fails.
    fn persist_item(&self, item: &Item) -> Result<i64>;

    /// All items, incomplete ones first, then by id.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] on query failure or
    /// [`TodoError::Decode`] on a malformed row.
    fn find_all_items(&self) -> Result<Vec<Item>>;

    /// The item with `id`, or `None` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] on query failure or
    /// [`TodoError::Decode`] on a malformed row.
    fn find_item_by_id(&self, id: i64) -> Result<Option<Item>>;

    /// Write `item`'s name, completion flag, and `updated_at` to its row.
    /// Returns the number of rows updated (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the update fails.
    fn update_item_by_id(&self, item: &Item) -> Result<usize>;

    /// Delete the row with `id`. Returns the number of rows deleted (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the delete fails.
    fn delete_item_by_id(&self, id: i64) -> Result<usize>;
}

/// [`TodoRepository`] over a borrowed SQLite connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRepository<'conn> {
    #[must_use]
    pub const fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TodoRepository for SqliteRepository<'_> {
    fn persist_item(&self, item: &Item) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO todos (displayName, isCompleted, updatedAt, createdAt)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    item.name(),
                    item.is_completed(),
                    item.updated_at().timestamp(),
                    item.created_at().timestamp(),
                ],
            )
            .map_err(|err| TodoError::storage("insert todo", err))?;

        let id = self.conn.last_insert_rowid();
        debug!(id, "inserted todo row");
        Ok(id)
    }

    fn find_all_items(&self) -> Result<Vec<Item>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY isCompleted ASC, id ASC");
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| TodoError::storage("list todos", err))?;
        let mut rows = stmt
            .query([])
            .map_err(|err| TodoError::storage("list todos", err))?;

        let mut items = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|err| TodoError::storage("list todos", err))?
        {
            items.push(Item::from_row(row)?);
        }
        Ok(items)
    }

    fn find_item_by_id(&self, id: i64) -> Result<Option<Item>> {
        if id == UNSAVED_ID {
            return Ok(None);
        }

        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let context = || format!("find todo {id}");
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| TodoError::storage(context(), err))?;
        let mut rows = stmt
            .query(params![id])
            .map_err(|err| TodoError::storage(context(), err))?;

        let found = match rows
            .next()
            .map_err(|err| TodoError::storage(context(), err))?
        {
            Some(row) => Some(Item::from_row(row)?),
            None => None,
        };
        Ok(found)
    }

    fn update_item_by_id(&self, item: &Item) -> Result<usize> {
        let affected = self
            .conn
            .execute(
                "UPDATE todos SET displayName = ?1, updatedAt = ?2, isCompleted = ?3 WHERE id = ?4",
                params![
                    item.name(),
                    item.updated_at().timestamp(),
                    item.is_completed(),
                    item.id(),
                ],
            )
            .map_err(|err| TodoError::storage(format!("update todo {}", item.id()), err))?;
        debug!(id = item.id(), affected, "updated todo row");
        Ok(affected)
    }

    fn delete_item_by_id(&self, id: i64) -> Result<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id])
            .map_err(|err| TodoError::storage(format!("delete todo {id}"), err))?;
        debug!(id, affected, "deleted todo row");
        Ok(affected)
    }
}
