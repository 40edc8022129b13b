//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated expectations about resources and CLI output.
/// These are independent of process execution.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid resource type: {res_type}")]
    InvalidResource { res_type: String },

    #[error("failed to release resource '{res_type}' with id '{res_id}'")]
    ResourceReleaseFailed { res_type: String, res_id: String },

    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error("invalid table output at line {line}: {message}")]
    TableParse { line: usize, message: String },

    #[error("missing column in CLI output: {column}")]
    MissingColumn { column: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
