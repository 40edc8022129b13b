//! Application-level errors (wraps domain and command errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// Application errors wrap domain errors and command failures.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApplicationError::Domain(DomainError::NotFound { .. }))
    }

    pub fn is_command_failed(&self) -> bool {
        matches!(self, ApplicationError::Infra(InfraError::CommandFailed { .. }))
    }

    pub fn is_release_failed(&self) -> bool {
        matches!(
            self,
            ApplicationError::Domain(DomainError::ResourceReleaseFailed { .. })
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
