//! `todo create`: add a new todo item.

use crate::cmd::App;
use crate::output::{OutputMode, render};
use anyhow::Context;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the new item.
    pub name: String,
}

#[derive(Debug, Serialize)]
struct Created<'a> {
    ok: bool,
    id: i64,
    name: &'a str,
}

pub fn run_create(args: &CreateArgs, output: OutputMode, app: &App<'_>) -> anyhow::Result<()> {
    let id = app
        .create(&args.name)
        .context("An error occurred while creating the todo item")?;

    let created = Created {
        ok: true,
        id,
        name: &args.name,
    };
    render(output, &created, |c, w| {
        writeln!(w, "Created new todo: {}", c.name)
    })
}
