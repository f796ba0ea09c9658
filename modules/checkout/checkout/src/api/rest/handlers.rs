//! REST handlers for the checkout proxy.
//!
//! Handlers are thin: parse input, call the domain service, relay the result.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path};
use axum::response::{Html, IntoResponse, Response};
use checkout_sdk::{ApiResponse, AuthorizationId, CaptureId, CartItem, OrderId, PaymentOperation};
use http::StatusCode;

use super::dto::{CreateOrderRequest, HealthResponse, RefundRequest};
use super::error::ApiResult;
use super::page::CheckoutPage;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// POST /api/orders - Create an order for the cart.
#[tracing::instrument(skip(svc, body), fields(body_len = body.len()))]
pub async fn create_order(
    Extension(svc): Extension<Arc<Service>>,
    body: Bytes,
) -> ApiResult<Response> {
    let op = PaymentOperation::CreateOrder;
    let req: CreateOrderRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateOrderRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| DomainError::local(op, format!("invalid order request: {e}")))?
    };
    let cart: Vec<CartItem> = req.cart.into_iter().map(CartItem::from).collect();

    let resp = svc.create_order(&cart).await?;
    relay(op, resp)
}

/// POST /api/orders/{orderID}/capture - Capture an approved order.
#[tracing::instrument(skip(svc))]
pub async fn capture_order(
    Extension(svc): Extension<Arc<Service>>,
    Path(order_id): Path<String>,
) -> ApiResult<Response> {
    let resp = svc.capture_order(&OrderId::from(order_id)).await?;
    relay(PaymentOperation::CaptureOrder, resp)
}

/// POST /api/orders/{orderID}/authorize - Authorize an approved order.
#[tracing::instrument(skip(svc))]
pub async fn authorize_order(
    Extension(svc): Extension<Arc<Service>>,
    Path(order_id): Path<String>,
) -> ApiResult<Response> {
    let resp = svc.authorize_order(&OrderId::from(order_id)).await?;
    relay(PaymentOperation::AuthorizeOrder, resp)
}

/// POST /orders/{authorizationId}/captureAuthorize - Capture an authorization.
#[tracing::instrument(skip(svc))]
pub async fn capture_authorization(
    Extension(svc): Extension<Arc<Service>>,
    Path(authorization_id): Path<String>,
) -> ApiResult<Response> {
    let resp = svc
        .capture_authorization(&AuthorizationId::from(authorization_id))
        .await?;
    relay(PaymentOperation::CaptureAuthorization, resp)
}

/// POST /api/payments/refund - Refund a captured payment.
#[tracing::instrument(skip(svc, body), fields(body_len = body.len()))]
pub async fn refund_capture(
    Extension(svc): Extension<Arc<Service>>,
    body: Bytes,
) -> ApiResult<Response> {
    let op = PaymentOperation::RefundCapture;
    let req: RefundRequest = serde_json::from_slice(&body)
        .map_err(|e| DomainError::local(op, format!("invalid refund request: {e}")))?;

    let resp = svc
        .refund_capture(&CaptureId::from(req.captured_payment_id))
        .await?;
    relay(op, resp)
}

/// GET /checkout - Checkout page.
pub async fn checkout_page(Extension(page): Extension<Arc<CheckoutPage>>) -> Html<String> {
    Html(page.html().to_owned())
}

/// GET /health - Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Answer with the remote status and body unchanged.
fn relay(op: PaymentOperation, resp: ApiResponse) -> ApiResult<Response> {
    let status = StatusCode::from_u16(resp.status).map_err(|e| {
        DomainError::local(op, format!("unrepresentable upstream status {}: {e}", resp.status))
    })?;
    if resp.body.is_null() {
        return Ok(status.into_response());
    }
    Ok((status, Json(resp.body)).into_response())
}
