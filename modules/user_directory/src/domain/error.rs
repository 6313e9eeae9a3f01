use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown sort field: '{name}'")]
    UnknownSortField { name: String },

    #[error("Unknown sort direction: '{name}'")]
    UnknownSortDirection { name: String },

    #[error("Items per page must be at least 1")]
    ZeroItemsPerPage,

    #[error("Duplicate user id: {id}")]
    DuplicateId { id: u32 },

    #[error("No user id left above {last}")]
    IdSpaceExhausted { last: u32 },

    #[error("Load failed: {message}")]
    LoadFailed { message: String },
}

impl DomainError {
    pub fn unknown_sort_field(name: impl Into<String>) -> Self {
        Self::UnknownSortField { name: name.into() }
    }

    pub fn unknown_sort_direction(name: impl Into<String>) -> Self {
        Self::UnknownSortDirection { name: name.into() }
    }

    pub fn zero_items_per_page() -> Self {
        Self::ZeroItemsPerPage
    }

    pub fn duplicate_id(id: u32) -> Self {
        Self::DuplicateId { id }
    }

    pub fn id_space_exhausted(last: u32) -> Self {
        Self::IdSpaceExhausted { last }
    }

    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::LoadFailed {
            message: message.into(),
        }
    }
}
