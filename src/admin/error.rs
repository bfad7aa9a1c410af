use thiserror::Error;

use crate::repository::RepositoryError;

/// Failures surfaced to callers of the administrative surface.
///
/// Every variant renders as a short human-readable message; storage details
/// are logged where the failure happens and never carried here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Sorry, you are not allowed to do that.")]
    Unauthorized,
    #[error("{0}")]
    Persistence(String),
}

impl AdminError {
    pub fn missing(field: &str) -> Self {
        AdminError::Validation(format!("Missing parameter(s): {field}"))
    }

    pub fn invalid(field: &str) -> Self {
        AdminError::Validation(format!("Invalid parameter(s): {field}"))
    }

    /// Map a repository failure onto the taxonomy, using `failure` as the
    /// message for anything that is not the caller's fault.
    pub fn from_repository(err: RepositoryError, failure: &str) -> Self {
        match err {
            RepositoryError::NotFound { .. } | RepositoryError::MissingReference { .. } => {
                log::warn!("{} {}", failure, err);
                AdminError::NotFound(failure.to_string())
            }
            RepositoryError::Duplicate { .. } => {
                log::warn!("{} {}", failure, err);
                AdminError::Conflict(failure.to_string())
            }
            RepositoryError::MissingField { .. } | RepositoryError::EmptyField { .. } => {
                log::warn!("{} {}", failure, err);
                AdminError::Validation(failure.to_string())
            }
            other => {
                log::error!("{} {}", failure, other);
                AdminError::Persistence(failure.to_string())
            }
        }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
