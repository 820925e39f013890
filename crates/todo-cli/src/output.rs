//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`]. Results go to stdout,
//! errors go to stderr. Errors are shown with the generic message attached
//! by the command; the full cause chain only reaches the log.

use serde::Serialize;
use std::io::{self, Write};
use todo_core::db::migrations::MigrationError;
use todo_core::{ErrorCode, TodoError};

/// The output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain text for people at a terminal.
    Human,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Build the user-facing error for a failed command.
    ///
    /// Only the outermost context is shown; the code and hint come from the
    /// first typed error found in the chain.
    pub fn from_failure(err: &anyhow::Error) -> Self {
        let code = error_code_for(err);
        let mut error = Self::new(err.to_string());
        error.suggestion = code.hint().map(str::to_string);
        error.error_code = Some(code.code().to_string());
        error
    }
}

/// Stable code for a failure, defaulting to [`ErrorCode::InternalUnexpected`].
pub fn error_code_for(err: &anyhow::Error) -> ErrorCode {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<TodoError>()
                .map(TodoError::code)
                .or_else(|| cause.downcast_ref::<MigrationError>().map(MigrationError::code))
                .or_else(|| {
                    cause
                        .downcast_ref::<toml::de::Error>()
                        .map(|_| ErrorCode::ConfigParseError)
                })
        })
        .unwrap_or(ErrorCode::InternalUnexpected)
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode, the value is serialized with `serde_json`. In human mode,
/// the provided `human_fn` closure is called to produce text output.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            human_fn(value, &mut out)?;
        }
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render a success message to stdout.
pub fn render_success(mode: OutputMode, id: i64, message: &str) -> anyhow::Result<()> {
    let value = serde_json::json!({
        "ok": true,
        "id": id,
        "message": message,
    });
    render(mode, &value, |_, w| writeln!(w, "{message}"))
}

/// Report that no item has `id`. Not an error: the process still exits 0.
pub fn render_not_found(mode: OutputMode, id: i64) -> anyhow::Result<()> {
    let value = serde_json::json!({
        "ok": false,
        "outcome": "not_found",
        "id": id,
    });
    render(mode, &value, |_, w| writeln!(w, "No todo item exists with ID {id}"))
}
