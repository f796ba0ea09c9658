//! HTTP stack: middleware around the checkout router, bind, and serve.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use checkout::CheckoutModule;
use http::{HeaderName, Request, Response};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::ServerConfig;
use crate::signals;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Checkout routes wrapped in the middleware stack.
///
/// Requests flow outermost to innermost: `SetRequestId` -> `PropagateRequestId`
/// -> Trace -> `BodyLimit` -> router.
pub fn build_router(module: &CheckoutModule, cfg: &ServerConfig) -> Router {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    module
        .router()
        .layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes))
        .layer(DefaultBodyLimit::max(cfg.body_limit_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    let request_id = req
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        request_id = %request_id,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(|res: &Response<Body>, latency: Duration, span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}

/// Serve until Ctrl+C or SIGTERM, then drain in-flight requests.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(router: Router, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown())
        .await
        .context("HTTP server failed")
}

async fn shutdown() {
    if let Err(e) = signals::wait_for_shutdown().await {
        tracing::error!(error = %e, "signal handling unavailable, serving until killed");
        std::future::pending::<()>().await;
    }
}
