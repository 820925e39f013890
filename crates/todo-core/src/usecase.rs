//! User-facing todo operations.
//!
//! [`TodoUseCase`] composes [`TodoDomain`] and a [`TodoRepository`]. Targeted
//! operations return [`Outcome::NotFound`] when the id does not name a stored
//! item; only validation and storage failures are errors.

use crate::domain::TodoDomain;
use crate::error::{Result, TodoError};
use crate::model::item::{Item, UNSAVED_ID};
use crate::repository::TodoRepository;
use serde::Serialize;
use tracing::{info, warn};

/// Result of an operation aimed at a single item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "id", rename_all = "snake_case")]
pub enum Outcome {
    /// The item with this id was changed or removed.
    Done(i64),
    /// No stored item has the requested id.
    NotFound,
}

impl Outcome {
    /// The affected id, if any.
    #[must_use]
    pub const fn id(self) -> Option<i64> {
        match self {
            Self::Done(id) => Some(id),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// The five todo operations.
#[derive(Debug)]
pub struct TodoUseCase<R> {
    domain: TodoDomain,
    repository: R,
}

impl<R: TodoRepository> TodoUseCase<R> {
    #[must_use]
    pub const fn new(domain: TodoDomain, repository: R) -> Self {
        Self { domain, repository }
    }

    /// Create and store a todo named `name`, returning its id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or a storage error if the
    /// insert fails.
    pub fn create(&self, name: &str) -> Result<i64> {
        let item = self.domain.create_item(name)?;
        let id = self.repository.persist_item(&item)?;
        info!(id, "created todo");
        Ok(id)
    }

    /// Render every stored todo as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or rendering fails.
    pub fn list(&self) -> Result<String> {
        let items = self.repository.find_all_items()?;
        self.domain.render_table(&items)
    }

    /// Every stored todo, in listing order.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn items(&self) -> Result<Vec<Item>> {
        self.repository.find_all_items()
    }

    /// Rename the todo with `id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, or a storage error.
    pub fn update(&self, id: i64, new_name: &str) -> Result<Outcome> {
        if id == UNSAVED_ID {
            return Ok(Outcome::NotFound);
        }
        if new_name.is_empty() {
            return Err(TodoError::validation(
                format!("update todo {id}"),
                "new name is empty",
            ));
        }

        self.mutate(id, "renamed", |domain, item| {
            domain.update_item_name(new_name, item).map(|_| ())
        })
    }

    /// Mark the todo with `id` as completed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if loading or saving fails.
    pub fn complete(&self, id: i64) -> Result<Outcome> {
        if id == UNSAVED_ID {
            return Ok(Outcome::NotFound);
        }

        self.mutate(id, "completed", |domain, item| {
            domain.complete_item(item).map(|_| ())
        })
    }

    /// Delete the todo with `id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    pub fn remove(&self, id: i64) -> Result<Outcome> {
        if id == UNSAVED_ID {
            return Ok(Outcome::NotFound);
        }

        if self.repository.delete_item_by_id(id)? == 0 {
            return Ok(Outcome::NotFound);
        }
        info!(id, "removed todo");
        Ok(Outcome::Done(id))
    }

    /// Load `id`, apply `change`, and write the item back.
    fn mutate(
        &self,
        id: i64,
        action: &str,
        change: impl FnOnce(&TodoDomain, &mut Item) -> Result<()>,
    ) -> Result<Outcome> {
        let Some(mut item) = self.repository.find_item_by_id(id)? else {
            return Ok(Outcome::NotFound);
        };

        change(&self.domain, &mut item)?;

        if self.repository.update_item_by_id(&item)? == 0 {
            warn!(id, "todo disappeared between lookup and {action} update");
            return Ok(Outcome::NotFound);
        }
        info!(id, "{action} todo");
        Ok(Outcome::Done(id))
    }
}
