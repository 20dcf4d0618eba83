//! Function errors and their responses.
//!
//! Every handler converts failures into an [`ApiError`] and then into the
//! response envelope. Store failures are logged in full and answered with a
//! redacted body.
//!
//! # Status Codes
//!
//! | Status | Variant | Usage |
//! |--------|---------|-------|
//! | 400 | `Validation` | Body missing, malformed, or missing fields |
//! | 400 | `BadRequest` | Absent or unusable `id` query parameter |
//! | 404 | `NotFound` | Update matched no order |
//! | 405 | `MethodNotAllowed` | Method not served by the function |
//! | 500 | `Internal` | Store unreachable, not ready, or failing |

use thiserror::Error;

use crate::application::OrderError;
use crate::application::ports::StoreError;
use crate::domain::{OrderId, ValidationError};
use crate::infrastructure::http::HttpResponse;

/// Errors surfaced by the function handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The function does not serve this method.
    #[error("method {method} not allowed")]
    MethodNotAllowed {
        /// Requested method.
        method: String,
    },

    /// The request body is not a usable order.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// A required parameter is absent or unusable.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No order with this id.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The store or its adapter failed.
    #[error("internal error: {0}")]
    Internal(OrderError),
}

impl ApiError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed { .. } => 405,
            Self::Validation(_) | Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    /// Response envelope for this error.
    ///
    /// Internal errors are logged here and never echoed to the caller.
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        match self {
            Self::MethodNotAllowed { method } => {
                tracing::debug!(%method, "Method not allowed");
                HttpResponse::method_not_allowed()
            }
            Self::Validation(e) => {
                tracing::debug!(error = %e, "Request rejected");
                HttpResponse::invalid(e.to_string())
            }
            Self::BadRequest(reason) => {
                tracing::debug!(%reason, "Request rejected");
                HttpResponse::bad_request()
            }
            Self::NotFound(id) => {
                tracing::debug!(order_id = %id, "Order not found");
                HttpResponse::not_found()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "Request failed");
                HttpResponse::internal_error()
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Internal(OrderError::Store(e))
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => Self::NotFound(id),
            OrderError::Invalid(v) => Self::Validation(v),
            other => Self::Internal(other),
        }
    }
}
