use thiserror::Error;

/// Errors that are safe to expose to other crates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// The data source was unreachable or reported failure. Terminal for that load.
    #[error("Failed to load users: {message}")]
    LoadFailure { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DashboardError {
    pub fn load_failure(message: impl Into<String>) -> Self {
        Self::LoadFailure {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for DashboardError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UnknownSortField { name } => {
                Self::invalid_argument(format!("unknown sort field '{name}'"))
            }
            UnknownSortDirection { name } => {
                Self::invalid_argument(format!("unknown sort direction '{name}'"))
            }
            ZeroItemsPerPage => Self::invalid_argument("items per page must be positive"),
            DuplicateId { id } => {
                Self::load_failure(format!("duplicate user id {id} in loaded data"))
            }
            IdSpaceExhausted { last } => {
                Self::invalid_argument(format!("no user id left above {last}"))
            }
            LoadFailed { message } => Self::load_failure(message),
        }
    }
}
