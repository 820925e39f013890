#![forbid(unsafe_code)]

mod cmd;
mod output;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use todo_core::{SqliteRepository, TodoDomain, TodoUseCase, config, db};
use tracing::{debug, error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "todo",
    author,
    version,
    about = "todo: a simple CLI app for todo items",
    long_about = None
)]
struct Cli {
    /// Enable debug logging for todo crates.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Database file to use (overrides TODO_DB_PATH and config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Data(DataCommand),

    #[command(
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    todo completions bash\n\n    todo completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Commands that run against the todo database.
#[derive(Subcommand, Debug)]
enum DataCommand {
    #[command(
        about = "Create a todo item",
        long_about = "Create a todo item with a specified name.",
        after_help = "EXAMPLES:\n    todo create \"My new todo\""
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        about = "List all todo items",
        long_about = "Display every todo item, open items first.",
        after_help = "EXAMPLES:\n    todo list\n\n    # Emit machine-readable output\n    todo list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        about = "Rename a todo item",
        long_about = "Update the name of an existing todo item by ID.",
        after_help = "EXAMPLES:\n    todo update 1 \"new name\""
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        about = "Complete a todo item",
        long_about = "Mark an existing todo item as completed by ID.",
        after_help = "EXAMPLES:\n    todo complete 1"
    )]
    Complete(cmd::complete::CompleteArgs),

    #[command(
        about = "Delete a todo item",
        long_about = "Delete an existing todo item by ID.",
        after_help = "EXAMPLES:\n    todo remove 1"
    )]
    Remove(cmd::remove::RemoveArgs),
}

/// `DEBUG` turns on debug logging unless it is empty or `0`.
fn debug_requested(value: Option<&str>) -> bool {
    value.is_some_and(|value| !matches!(value.trim(), "" | "0"))
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TODO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || debug_requested(env::var("DEBUG").ok().as_deref()) {
            "todo_core=debug,todo_cli=debug,warn"
        } else {
            "warn"
        })
    });

    let format = env::var("TODO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Open the database, run one command against it, and close it again.
///
/// The connection is dropped on every early return, which closes it.
fn run_with_database(
    command: &DataCommand,
    db_flag: Option<&Path>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let path = config::database_path(db_flag)
        .context("An error occurred while locating the todo database")?;
    let conn = open(&path)?;

    {
        let app = TodoUseCase::new(TodoDomain::new(), SqliteRepository::new(&conn));
        match command {
            DataCommand::Create(args) => cmd::create::run_create(args, output, &app)?,
            DataCommand::List(args) => cmd::list::run_list(args, output, &app)?,
            DataCommand::Update(args) => cmd::update::run_update(args, output, &app)?,
            DataCommand::Complete(args) => cmd::complete::run_complete(args, output, &app)?,
            DataCommand::Remove(args) => cmd::remove::run_remove(args, output, &app)?,
        }
    }

    if let Err(err) = db::close_database(conn) {
        warn!("{err:#}");
    }
    Ok(())
}

fn open(path: &Path) -> anyhow::Result<rusqlite::Connection> {
    debug!(path = %path.display(), "using todo database");
    db::open_database(path).context("An error occurred while opening the todo database")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();

    let result = match &cli.command {
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command, &mut std::io::stdout())
        }
        Commands::Data(command) => run_with_database(command, cli.db.as_deref(), output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("command failed: {err:#}");
            if let Err(render_err) = render_error(output, &CliError::from_failure(&err)) {
                error!("failed to render error: {render_err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
