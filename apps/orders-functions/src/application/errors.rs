//! Use case errors.

use thiserror::Error;

use super::ports::StoreError;
use crate::domain::{OrderId, ValidationError};

/// Errors returned by the order use cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// No row matched the referenced id.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The order passed to the use case is not usable for the operation.
    #[error("invalid order: {0}")]
    Invalid(#[from] ValidationError),

    /// A row read back from the store is not a valid order.
    #[error("stored row is not a valid order: {0}")]
    InvalidRow(ValidationError),

    /// The insert did not hand back the id the store assigned.
    #[error("store did not return the generated order id")]
    MissingGeneratedId,

    /// The table store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrderError {
    /// Whether the error originates in the store rather than the request.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InvalidRow(_) | Self::MissingGeneratedId | Self::Store(_)
        )
    }
}
