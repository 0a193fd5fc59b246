//! Error types for the adapter crate.

use thiserror::Error;

/// Errors surfaced by [`crate::As400Adapter`].
#[derive(Debug, Error)]
pub enum As400Error {
    /// The adapter cannot proceed with the configuration it was given.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The server does not support the requested operation.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// A column named by the caller does not exist.
    #[error("No such column: {table}.{column}")]
    ColumnNotFound { table: String, column: String },

    /// A privileged system command failed.
    #[error("Could not call {command}.\nDo you have authority to do this?\n\n{source:#}")]
    Unauthorized {
        command: String,
        source: anyhow::Error,
    },

    /// A metadata query returned something the adapter cannot interpret.
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),

    /// Error from the connectivity layer, passed through unchanged.
    #[error(transparent)]
    Connection(#[from] anyhow::Error),
}

impl As400Error {
    pub(crate) fn unauthorized(command: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Unauthorized {
            command: command.into(),
            source,
        }
    }
}
