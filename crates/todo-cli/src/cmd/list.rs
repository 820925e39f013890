//! `todo list`: show every todo item, open ones first.

use crate::cmd::App;
use crate::output::OutputMode;
use anyhow::Context;
use clap::Args;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct ListArgs {}

pub fn run_list(_args: &ListArgs, output: OutputMode, app: &App<'_>) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if output.is_json() {
        let items = app
            .items()
            .context("An error occurred while listing todo items")?;
        serde_json::to_writer_pretty(&mut out, &items)?;
        writeln!(out)?;
    } else {
        let table = app
            .list()
            .context("An error occurred while listing todo items")?;
        write!(out, "{table}")?;
    }
    Ok(())
}
