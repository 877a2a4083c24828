//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Operation;

/// Domain errors represent malformed requests.
/// These are independent of process and filesystem concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{operation} requires {argument}")]
    MissingArgument {
        operation: Operation,
        argument: &'static str,
    },

    #[error("{operation} does not accept {argument}")]
    UnexpectedArgument {
        operation: Operation,
        argument: &'static str,
    },
}
