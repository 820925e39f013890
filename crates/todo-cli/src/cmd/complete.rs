//! `todo complete`: mark a todo item as done.

use crate::cmd::App;
use crate::output::{OutputMode, render_not_found, render_success};
use anyhow::Context;
use clap::Args;
use todo_core::Outcome;

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// ID of the item to complete.
    pub id: i64,
}

pub fn run_complete(
    args: &CompleteArgs,
    output: OutputMode,
    app: &App<'_>,
) -> anyhow::Result<()> {
    let outcome = app
        .complete(args.id)
        .context("An error occurred while completing the todo item")?;

    match outcome {
        Outcome::Done(id) => render_success(output, id, "Completed item"),
        Outcome::NotFound => render_not_found(output, args.id),
    }
}
