//! `todo update`: rename a todo item.

use crate::cmd::App;
use crate::output::{OutputMode, render_not_found, render_success};
use anyhow::Context;
use clap::Args;
use todo_core::Outcome;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// ID of the item to rename.
    pub id: i64,

    /// New name for the item.
    pub name: String,
}

pub fn run_update(args: &UpdateArgs, output: OutputMode, app: &App<'_>) -> anyhow::Result<()> {
    let outcome = app
        .update(args.id, &args.name)
        .context("An error occurred while updating the todo item")?;

    match outcome {
        Outcome::Done(id) => render_success(output, id, "Updated item"),
        Outcome::NotFound => render_not_found(output, args.id),
    }
}
