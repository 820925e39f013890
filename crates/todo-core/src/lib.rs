//! todo-core library.
//!
//! Persistence and domain layer for the `todo` CLI: the item entity, the
//! business rules that govern its mutations, the SQLite repository, the
//! schema migrations, and the use cases that tie them together.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::TodoError`] inside the domain and repository;
//!   `anyhow::Result` at I/O edges (opening the database, loading config).
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod model;
pub mod repository;
pub mod usecase;

pub use domain::TodoDomain;
pub use error::{ErrorCode, TodoError};
pub use model::item::Item;
pub use repository::{SqliteRepository, TodoRepository};
pub use usecase::{Outcome, TodoUseCase};
