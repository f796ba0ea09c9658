use std::time::Duration;

use checkout_sdk::{AuthorizationId, CaptureId, CartItem, OrderId};
use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::CheckoutError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Status and JSON body of a proxy response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    cart: Vec<CartLine<'a>>,
}

#[derive(Serialize)]
struct CartLine<'a> {
    id: &'a str,
    quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefundBody<'a> {
    captured_payment_id: &'a str,
}

/// HTTP client for the checkout proxy endpoints.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base: Url,
}

impl ProxyClient {
    /// # Errors
    /// Returns [`CheckoutError`] if the URL cannot be a base or the HTTP
    /// client cannot be built.
    pub fn new(base: Url) -> Result<Self, CheckoutError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        Self::with_client(http, base)
    }

    /// # Errors
    /// Returns [`CheckoutError::InvalidUrl`] if the URL cannot be a base.
    pub fn with_client(http: reqwest::Client, base: Url) -> Result<Self, CheckoutError> {
        if base.cannot_be_a_base() {
            return Err(CheckoutError::InvalidUrl(base.to_string()));
        }
        Ok(Self { http, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// POST /api/orders
    ///
    /// # Errors
    /// Returns [`CheckoutError`] on transport failure or a non-JSON body.
    pub async fn create_order(&self, cart: &[CartItem]) -> Result<ProxyResponse, CheckoutError> {
        let body = CreateOrderBody {
            cart: cart
                .iter()
                .map(|item| CartLine {
                    id: &item.id,
                    quantity: item.quantity,
                })
                .collect(),
        };
        let url = self.url(&["api", "orders"])?;
        self.send(self.http.post(url).json(&body)).await
    }

    /// POST /api/orders/{orderID}/capture
    ///
    /// # Errors
    /// Returns [`CheckoutError`] on transport failure or a non-JSON body.
    pub async fn capture_order(&self, order_id: &OrderId) -> Result<ProxyResponse, CheckoutError> {
        let url = self.url(&["api", "orders", order_id.as_str(), "capture"])?;
        self.send(self.http.post(url)).await
    }

    /// POST /api/orders/{orderID}/authorize
    ///
    /// # Errors
    /// Returns [`CheckoutError`] on transport failure or a non-JSON body.
    pub async fn authorize_order(&self, order_id: &OrderId) -> Result<ProxyResponse, CheckoutError> {
        let url = self.url(&["api", "orders", order_id.as_str(), "authorize"])?;
        self.send(self.http.post(url)).await
    }

    /// POST /orders/{authorizationId}/captureAuthorize
    ///
    /// # Errors
    /// Returns [`CheckoutError`] on transport failure or a non-JSON body.
    pub async fn capture_authorization(
        &self,
        authorization_id: &AuthorizationId,
    ) -> Result<ProxyResponse, CheckoutError> {
        let url = self.url(&["orders", authorization_id.as_str(), "captureAuthorize"])?;
        self.send(self.http.post(url)).await
    }

    /// POST /api/payments/refund
    ///
    /// # Errors
    /// Returns [`CheckoutError`] on transport failure or a non-JSON body.
    pub async fn refund(&self, capture_id: &CaptureId) -> Result<ProxyResponse, CheckoutError> {
        let url = self.url(&["api", "payments", "refund"])?;
        let body = RefundBody {
            captured_payment_id: capture_id.as_str(),
        };
        self.send(self.http.post(url).json(&body)).await
    }

    fn url(&self, segments: &[&str]) -> Result<Url, CheckoutError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| CheckoutError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<ProxyResponse, CheckoutError> {
        let response = request
            .send()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| CheckoutError::InvalidResponse(format!("status {status}: {e}")))?
        };
        tracing::debug!(status, "proxy responded");
        Ok(ProxyResponse { status, body })
    }
}
