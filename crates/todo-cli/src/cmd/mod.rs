pub mod complete;
pub mod completions;
pub mod create;
pub mod list;
pub mod remove;
pub mod update;

use todo_core::{SqliteRepository, TodoUseCase};

/// The use case wiring every data command runs against.
pub type App<'conn> = TodoUseCase<SqliteRepository<'conn>>;
