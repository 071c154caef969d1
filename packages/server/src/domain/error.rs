//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ClientId validation error
    #[error("ClientId cannot be empty")]
    ClientIdEmpty,

    /// ClientId too long error
    #[error("ClientId cannot exceed {max} bytes (got {actual})")]
    ClientIdTooLong { max: usize, actual: usize },

    /// MessageText too long error
    #[error("message exceeds {max} characters")]
    MessageTextTooLong { max: usize, actual: usize },
}
