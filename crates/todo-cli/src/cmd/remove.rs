//! `todo remove`: delete a todo item.
//!
//! The row is removed outright; there is no tombstone.

use crate::cmd::App;
use crate::output::{OutputMode, render_not_found, render_success};
use anyhow::Context;
use clap::Args;
use todo_core::Outcome;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// ID of the item to delete.
    pub id: i64,
}

pub fn run_remove(args: &RemoveArgs, output: OutputMode, app: &App<'_>) -> anyhow::Result<()> {
    let outcome = app
        .remove(args.id)
        .context("An error occurred while removing the todo item")?;

    match outcome {
        Outcome::Done(id) => render_success(output, id, "Removed item"),
        Outcome::NotFound => render_not_found(output, args.id),
    }
}
