//! Application-level errors (wraps domain errors)

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::{DomainError, ExitStatus, Operation};

/// Application errors wrap domain errors and add invocation-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("hybridguard binary not found: {}", .0.display())]
    MissingExecutable(PathBuf),

    #[error("{} failed ({status}): {}", .operation.label(), .stderr.trim_end())]
    InvocationFailed {
        operation: Operation,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{} failed: cannot launch {}: {source}", .operation.label(), .program.display())]
    SpawnFailed {
        operation: Operation,
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} failed: timed out after {}s", .operation.label(), .timeout.as_secs_f64())]
    TimedOut {
        operation: Operation,
        timeout: Duration,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}: {source}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Text surfaced to callers when an operation fails.
    ///
    /// For a non-zero exit this is the captured stderr verbatim; an empty
    /// stderr falls back to the exit status so the text is never empty.
    pub fn diagnostic(&self) -> String {
        match self {
            ApplicationError::InvocationFailed { status, stderr, .. } => {
                if stderr.trim().is_empty() {
                    status.to_string()
                } else {
                    stderr.clone()
                }
            }
            ApplicationError::SpawnFailed {
                program, source, ..
            } => format!("cannot launch {}: {source}", program.display()),
            ApplicationError::TimedOut { timeout, .. } => {
                format!("timed out after {}s", timeout.as_secs_f64())
            }
            ApplicationError::OperationFailed { context, source } => {
                format!("{context}: {source}")
            }
            other => other.to_string(),
        }
    }

    /// True for failures that happened while running the executable
    /// (non-zero exit, launch failure, timeout) as opposed to setup faults.
    pub fn is_invocation_failure(&self) -> bool {
        matches!(
            self,
            ApplicationError::InvocationFailed { .. }
                | ApplicationError::SpawnFailed { .. }
                | ApplicationError::TimedOut { .. }
                | ApplicationError::OperationFailed { .. }
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
