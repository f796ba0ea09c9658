use std::time::Instant;

use async_trait::async_trait;
use checkout_sdk::{
    ApiResponse, AuthorizationId, CaptureAuthorization, CaptureId, CreateOrder, OrderId,
    PaymentOperation, PaymentsApi, PaymentsError,
};
use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde_json::Value;
use url::Url;

use super::token::{TokenError, TokenProvider};
use super::wire::{self, CaptureAuthorizationRequest, OrderRequest};
use crate::config::{ConfigError, PayPalConfig};

const DEBUG_ID_HEADER: &str = "paypal-debug-id";

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("failed to render checkout page: {0}")]
    Page(#[from] tera::Error),
}

/// PayPal Orders v2 / Payments v2 client.
///
/// Built once at startup and shared; holds the connection pool and the
/// cached access token.
pub struct PayPalClient {
    http: reqwest::Client,
    api_base: Url,
    tokens: TokenProvider,
}

impl PayPalClient {
    /// # Errors
    /// Returns [`InitError`] if the base URL is unusable or the HTTP client
    /// cannot be built.
    pub fn new(cfg: &PayPalConfig) -> Result<Self, InitError> {
        let api_base = cfg.api_base()?;
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .user_agent(concat!("paypal-checkout/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let tokens = TokenProvider::new(
            http.clone(),
            &api_base,
            cfg.client_id.clone(),
            cfg.client_secret.clone(),
            cfg.token_refresh_offset,
        )?;
        Ok(Self {
            http,
            api_base,
            tokens,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, PaymentsError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| PaymentsError::transport(format!("{} cannot be a base URL", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
    }

    async fn execute(
        &self,
        operation: PaymentOperation,
        request: RequestBuilder,
    ) -> Result<ApiResponse, PaymentsError> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| PaymentsError::auth(e.to_string()))?;

        let started = Instant::now();
        let response = request
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| PaymentsError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let debug_id = response
            .headers()
            .get(DEBUG_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PaymentsError::transport(e.to_string()))?;
        let duration_ms = started.elapsed().as_millis();

        if (200..300).contains(&status) {
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).map_err(|e| PaymentsError::decode(e.to_string()))?
            };
            tracing::info!(
                operation = %operation,
                status_code = status,
                duration_ms,
                "PayPal request completed"
            );
            return Ok(ApiResponse::new(status, body));
        }

        if status == 401 {
            self.tokens.invalidate().await;
        }
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        tracing::warn!(
            operation = %operation,
            status_code = status,
            debug_id = debug_id.as_deref().unwrap_or_default(),
            duration_ms,
            "PayPal request rejected"
        );
        Err(wire::api_error(status, &body, debug_id))
    }
}

#[async_trait]
impl PaymentsApi for PayPalClient {
    async fn create_order(&self, order: &CreateOrder) -> Result<ApiResponse, PaymentsError> {
        let url = self.endpoint(&["v2", "checkout", "orders"])?;
        let request = self.post(url).json(&OrderRequest::from(order));
        self.execute(PaymentOperation::CreateOrder, request).await
    }

    async fn capture_order(&self, order_id: &OrderId) -> Result<ApiResponse, PaymentsError> {
        let url = self.endpoint(&["v2", "checkout", "orders", order_id.as_str(), "capture"])?;
        self.execute(PaymentOperation::CaptureOrder, self.post(url)).await
    }

    async fn authorize_order(&self, order_id: &OrderId) -> Result<ApiResponse, PaymentsError> {
        let url = self.endpoint(&["v2", "checkout", "orders", order_id.as_str(), "authorize"])?;
        self.execute(PaymentOperation::AuthorizeOrder, self.post(url)).await
    }

    async fn capture_authorization(
        &self,
        authorization_id: &AuthorizationId,
        request: &CaptureAuthorization,
    ) -> Result<ApiResponse, PaymentsError> {
        let url = self.endpoint(&[
            "v2",
            "payments",
            "authorizations",
            authorization_id.as_str(),
            "capture",
        ])?;
        let request = self
            .post(url)
            .json(&CaptureAuthorizationRequest::from(request));
        self.execute(PaymentOperation::CaptureAuthorization, request)
            .await
    }

    async fn refund_capture(&self, capture_id: &CaptureId) -> Result<ApiResponse, PaymentsError> {
        let url = self.endpoint(&["v2", "payments", "captures", capture_id.as_str(), "refund"])?;
        self.execute(PaymentOperation::RefundCapture, self.post(url)).await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use checkout_sdk::Money;
    use httpmock::prelude::*;
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;

    fn client(server: &MockServer) -> PayPalClient {
        let cfg = PayPalConfig {
            client_id: "client-id".to_owned(),
            client_secret: SecretString::from("client-secret".to_owned()),
            base_url: Some(Url::parse(&server.base_url()).unwrap()),
            timeout: Duration::from_secs(5),
            ..PayPalConfig::default()
        };
        PayPalClient::new(&cfg).unwrap()
    }

    fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(POST).path("/v1/oauth2/token");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"A21AA","token_type":"Bearer","expires_in":32400}"#);
        })
    }

    #[tokio::test]
    async fn create_order_sends_paypal_payload() {
        let server = MockServer::start();
        mock_token(&server);
        let orders = server.mock(|when, then| {
            when.method(POST)
                .path("/v2/checkout/orders")
                .header("authorization", "Bearer A21AA")
                .header("prefer", "return=minimal")
                .json_body(json!({
                    "intent": "CAPTURE",
                    "purchase_units": [{ "amount": { "currency_code": "USD", "value": "100.00" } }]
                }));
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":"5O190127TN364715T","status":"CREATED"}"#);
        });

        let resp = client(&server)
            .create_order(&CreateOrder::capture(Money::usd("100.00")))
            .await
            .unwrap();

        orders.assert();
        assert_eq!(resp.status, 201);
        assert_eq!(resp.body, json!({ "id": "5O190127TN364715T", "status": "CREATED" }));
    }

    #[tokio::test]
    async fn token_is_reused_across_operations() {
        let server = MockServer::start();
        let token = mock_token(&server);
        server.mock(|when, then| {
            when.method(POST).path("/v2/checkout/orders/ORDER-1/capture");
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":"ORDER-1","status":"COMPLETED"}"#);
        });
        server.mock(|when, then| {
            when.method(POST).path("/v2/checkout/orders/ORDER-1/authorize");
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":"ORDER-1","status":"COMPLETED"}"#);
        });

        let client = client(&server);
        client.capture_order(&OrderId::new("ORDER-1")).await.unwrap();
        client.authorize_order(&OrderId::new("ORDER-1")).await.unwrap();
        token.assert_calls(1);
    }

    #[tokio::test]
    async fn capture_authorization_is_not_final() {
        let server = MockServer::start();
        mock_token(&server);
        let capture = server.mock(|when, then| {
            when.method(POST)
                .path("/v2/payments/authorizations/AUTH-1/capture")
                .json_body(json!({ "final_capture": false }));
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":"CAP-1","status":"COMPLETED"}"#);
        });

        let resp = client(&server)
            .capture_authorization(
                &AuthorizationId::new("AUTH-1"),
                &CaptureAuthorization { final_capture: false },
            )
            .await
            .unwrap();
        capture.assert();
        assert_eq!(resp.body["id"], "CAP-1");
    }

    #[tokio::test]
    async fn refund_with_empty_body_yields_null() {
        let server = MockServer::start();
        mock_token(&server);
        server.mock(|when, then| {
            when.method(POST).path("/v2/payments/captures/CAP-1/refund");
            then.status(204);
        });

        let resp = client(&server)
            .refund_capture(&CaptureId::new("CAP-1"))
            .await
            .unwrap();
        assert_eq!(resp.status, 204);
        assert_eq!(resp.body, Value::Null);
    }

    #[test]
    fn identifiers_are_path_encoded() {
        let server = MockServer::start();
        let url = client(&server)
            .endpoint(&["v2", "checkout", "orders", "a/b c", "capture"])
            .unwrap();
        assert_eq!(
            url.path(),
            "/v2/checkout/orders/a%2Fb%20c/capture"
        );
    }

    #[tokio::test]
    async fn rejection_maps_to_api_error() {
        let server = MockServer::start();
        mock_token(&server);
        server.mock(|when, then| {
            when.method(POST).path("/v2/checkout/orders/ORDER-1/capture");
            then.status(422)
                .header("content-type", "application/json")
                .header("paypal-debug-id", "hdr-debug")
                .body(r#"{"name":"UNPROCESSABLE_ENTITY","message":"Instrument declined","details":[{"issue":"INSTRUMENT_DECLINED"}]}"#);
        });

        let err = client(&server)
            .capture_order(&OrderId::new("ORDER-1"))
            .await
            .unwrap_err();
        let PaymentsError::Api { status, details, debug_id, .. } = err else {
            panic!("expected Api error");
        };
        assert_eq!(status, 422);
        assert_eq!(details[0].issue, "INSTRUMENT_DECLINED");
        assert_eq!(debug_id.as_deref(), Some("hdr-debug"));
    }

    #[tokio::test]
    async fn unauthorized_response_drops_cached_token() {
        let server = MockServer::start();
        let token = mock_token(&server);
        server.mock(|when, then| {
            when.method(POST).path("/v2/payments/captures/CAP-1/refund");
            then.status(401)
                .header("content-type", "application/json")
                .body(r#"{"error":"invalid_token"}"#);
        });

        let client = client(&server);
        let first = client.refund_capture(&CaptureId::new("CAP-1")).await;
        let second = client.refund_capture(&CaptureId::new("CAP-1")).await;
        assert_eq!(first.unwrap_err().status(), Some(401));
        assert_eq!(second.unwrap_err().status(), Some(401));
        token.assert_calls(2);
    }

    #[tokio::test]
    async fn token_failure_is_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/oauth2/token");
            then.status(401).body("unauthorized");
        });

        let err = client(&server)
            .create_order(&CreateOrder::capture(Money::usd("100.00")))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentsError::Auth(_)));
    }

    #[tokio::test]
    async fn unreachable_host_fails_at_token_exchange() {
        let cfg = PayPalConfig {
            client_id: "id".to_owned(),
            client_secret: SecretString::from("secret".to_owned()),
            base_url: Some(Url::parse("http://127.0.0.1:1").unwrap()),
            timeout: Duration::from_secs(2),
            ..PayPalConfig::default()
        };
        let err = PayPalClient::new(&cfg)
            .unwrap()
            .capture_order(&OrderId::new("X"))
            .await
            .unwrap_err();
        // the token exchange is the first call to fail
        assert!(matches!(err, PaymentsError::Auth(_)));
    }
}
