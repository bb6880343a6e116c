//! Error types for minish

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, ShellError>;

/// Errors that leave the engine.
///
/// Usage errors and failed OS operations of a single command are reported on
/// the error stream and never show up here. What does show up is either fatal
/// (`Allocation`, `LineSource`) or a programming error (`DuplicateBuiltin`).
#[derive(Error, Debug)]
pub enum ShellError {
    /// Growing the token or history buffer failed
    #[error("allocation error")]
    Allocation,

    /// Writing to an output stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The line editor gave up
    #[error("line source error: {0}")]
    LineSource(String),

    /// Two builtins registered under one name
    #[error("builtin already registered: {0}")]
    DuplicateBuiltin(String),
}

impl ShellError {
    /// True for errors the read-eval loop cannot recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Allocation | ShellError::LineSource(_))
    }
}

impl From<std::collections::TryReserveError> for ShellError {
    fn from(_: std::collections::TryReserveError) -> Self {
        ShellError::Allocation
    }
}
