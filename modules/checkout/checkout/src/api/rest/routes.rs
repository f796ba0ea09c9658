//! REST route registration for the checkout proxy.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use super::handlers;
use super::page::CheckoutPage;
use crate::domain::service::Service;

/// Register the proxy endpoints, the checkout page and the health probe.
pub fn register_routes(router: Router, service: Arc<Service>, page: Arc<CheckoutPage>) -> Router {
    router
        .route("/api/orders", post(handlers::create_order))
        .route("/api/orders/{order_id}/capture", post(handlers::capture_order))
        .route("/api/orders/{order_id}/authorize", post(handlers::authorize_order))
        .route(
            "/orders/{authorization_id}/captureAuthorize",
            post(handlers::capture_authorization),
        )
        .route("/api/payments/refund", post(handlers::refund_capture))
        .route("/checkout", get(handlers::checkout_page))
        .route("/health", get(handlers::health))
        .layer(Extension(service))
        .layer(Extension(page))
}
