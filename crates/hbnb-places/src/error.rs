use hbnb_store::StoreError;
use hbnb_types::{EntityId, EntityKind};
use thiserror::Error;

/// Errors from place operations.
///
/// `NotFound` and `Validation` are terminal for a single operation and
/// leave the store untouched.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// A referenced entity id does not resolve.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: EntityId },

    /// The input payload is malformed or incomplete.
    #[error("{0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PlaceError {
    pub fn not_found(kind: EntityKind, id: &EntityId) -> Self {
        Self::NotFound {
            kind,
            id: id.clone(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type PlaceResult<T> = Result<T, PlaceError>;
