//! REST error mapping for the checkout proxy.
//!
//! Every failure answers 500 with the operation's fixed message; the cause is
//! logged, never returned.

use axum::Json;
use axum::response::{IntoResponse, Response};
use checkout_sdk::PaymentOperation;
use http::StatusCode;

use super::dto::ErrorResponse;
use crate::domain::error::DomainError;

pub type ApiResult<T> = Result<T, ProxyFailure>;

/// Client-facing message for a failed operation.
#[must_use]
pub const fn failure_message(operation: PaymentOperation) -> &'static str {
    match operation {
        PaymentOperation::CreateOrder => "Failed to create order.",
        PaymentOperation::CaptureOrder => "Failed to capture order.",
        PaymentOperation::AuthorizeOrder => "Failed to authorize order.",
        PaymentOperation::CaptureAuthorization => "Failed to capture authorize.",
        PaymentOperation::RefundCapture => "Failed refund captured payment.",
    }
}

/// Failed proxy call, rendered as `500 {"error": "<fixed message>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyFailure(pub PaymentOperation);

impl From<DomainError> for ProxyFailure {
    fn from(e: DomainError) -> Self {
        if let DomainError::Local { operation, message } = &e {
            tracing::error!(operation = %operation, error = %message, "request could not be proxied");
        }
        Self(e.operation())
    }
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: failure_message(self.0),
            }),
        )
            .into_response()
    }
}
