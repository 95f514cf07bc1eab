use corral_core::{CollectionError, ElementError};

use crate::token::CollectionToken;

/// Errors from store operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum StoreError {
    /// The collection token was never registered with this store.
    #[error("unknown collection: {collection}")]
    UnknownCollection { collection: CollectionToken },

    /// An element with this identifier is already in the collection.
    #[error("duplicate element: {identifier}")]
    DuplicateElement { identifier: String },

    /// No element with this identifier exists in the collection.
    #[error("missing element: {identifier}")]
    MissingElement { identifier: String },

    #[error(transparent)]
    Element(#[from] ElementError),

    /// Failure of the storage backend itself.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<CollectionError> for StoreError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::DuplicateElement { identifier } => {
                Self::DuplicateElement { identifier }
            }
            CollectionError::MissingElement { identifier } => Self::MissingElement { identifier },
            CollectionError::Element(e) => Self::Element(e),
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<StoreError> for CollectionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateElement { identifier } => Self::DuplicateElement { identifier },
            StoreError::MissingElement { identifier } => Self::MissingElement { identifier },
            StoreError::Element(e) => Self::Element(e),
            StoreError::UnknownCollection { .. } | StoreError::Backend(_) => {
                Self::Backend(err.to_string())
            }
        }
    }
}
