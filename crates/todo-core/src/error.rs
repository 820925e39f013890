use std::fmt;

/// Machine-readable error codes for scripts consuming `--json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ValidationFailed,
    StorageFailed,
    CorruptRow,
    RenderFailed,
    MigrationFailed,
    SchemaTooNew,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ValidationFailed => "E2001",
            Self::StorageFailed => "E3001",
            Self::CorruptRow => "E3002",
            Self::MigrationFailed => "E3003",
            Self::SchemaTooNew => "E3004",
            Self::RenderFailed => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ValidationFailed => "Invalid todo item input",
            Self::StorageFailed => "Database query failed",
            Self::CorruptRow => "Corrupt todo row",
            Self::MigrationFailed => "Schema migration failed",
            Self::SchemaTooNew => "Database schema is newer than this binary",
            Self::RenderFailed => "Failed to render todo list",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in todo/config.toml and retry."),
            Self::ValidationFailed => Some("Todo item names must not be empty."),
            Self::StorageFailed => {
                Some("Retry once. Another `todo` process may be holding the database lock.")
            }
            Self::CorruptRow | Self::MigrationFailed => {
                Some("Back up the database file and inspect it with the sqlite3 shell.")
            }
            Self::SchemaTooNew => Some("Upgrade `todo` to a release that knows this schema."),
            Self::RenderFailed => None,
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures raised by the domain, repository, and use case layers.
///
/// "Item not found" is deliberately absent: lookups return `Option` and
/// targeted use cases return [`crate::usecase::Outcome::NotFound`].
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Caller input violates a domain rule. Raised before any storage access.
    #[error("{context}: {reason}")]
    Validation { context: String, reason: String },

    /// SQLite could not complete a statement.
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A stored row could not be turned into an item.
    #[error("decode todo row: {reason}")]
    Decode { reason: String },

    /// Table formatting failed.
    #[error("render todo table: {source}")]
    Render {
        #[from]
        source: fmt::Error,
    },
}

impl TodoError {
    pub(crate) fn validation(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::Storage { .. } => ErrorCode::StorageFailed,
            Self::Decode { .. } => ErrorCode::CorruptRow,
            Self::Render { .. } => ErrorCode::RenderFailed,
        }
    }

    /// Returns `true` for input errors detected before touching storage.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

pub type Result<T, E = TodoError> = std::result::Result<T, E>;
