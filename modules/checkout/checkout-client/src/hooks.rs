//! Payment hooks and the manual refund trigger.

use checkout_sdk::{CaptureId, CartItem, Order, OrderId};
use serde_json::Value;

use crate::client::ProxyClient;
use crate::error::CheckoutError;
use crate::outcome::{ApprovalSource, Outcome, classify_capture};

/// Order returned by the create-order endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub id: OrderId,
    /// Where the buyer approves the payment, when the processor sent one.
    pub approve_link: Option<String>,
}

impl CreatedOrder {
    /// # Errors
    /// Returns [`CheckoutError::OrderNotCreated`] unless the body has an `id`.
    pub fn from_body(body: &Value) -> Result<Self, CheckoutError> {
        let order = Order::from_value(body);
        let approve_link = order.approve_link().map(str::to_owned);
        match order.id {
            Some(id) => Ok(Self {
                id: OrderId::from(id),
                approve_link,
            }),
            None => Err(CheckoutError::order_not_created(body)),
        }
    }
}

/// Create an order and keep its approval link.
///
/// # Errors
/// Returns [`CheckoutError`] on transport failure or when no order id came back.
pub async fn place_order(
    client: &ProxyClient,
    cart: &[CartItem],
) -> Result<CreatedOrder, CheckoutError> {
    let resp = client.create_order(cart).await?;
    let created = CreatedOrder::from_body(&resp.body);
    if let Err(e) = &created {
        tracing::warn!(status = resp.status, error = %e, "order was not created");
    }
    created
}

/// `createOrder` hook: the id of the order the buyer will approve.
///
/// # Errors
/// Returns [`CheckoutError`] on transport failure or when no order id came
/// back; the error carries `details[0]` and `debug_id` when available.
pub async fn create_order_hook(
    client: &ProxyClient,
    cart: &[CartItem],
) -> Result<OrderId, CheckoutError> {
    Ok(place_order(client, cart).await?.id)
}

/// `onApprove` hook: capture the approved order and classify the result.
///
/// # Errors
/// Returns [`CheckoutError`] when the proxy cannot be reached or answers
/// with something other than JSON.
pub async fn on_approve_hook(
    client: &ProxyClient,
    order_id: &OrderId,
    source: ApprovalSource,
) -> Result<Outcome, CheckoutError> {
    let resp = client.capture_order(order_id).await?;
    let outcome = classify_capture(&resp.body, source);
    tracing::info!(order_id = %order_id, status = resp.status, outcome = ?outcome, "order captured");
    Ok(outcome)
}

/// User-facing result of a refund request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefundNotice {
    Success { message: String },
    Failure { message: String },
}

impl RefundNotice {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Failure { message } => message,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Refund a captured payment; never fails, the notice says what happened.
pub async fn refund_trigger(client: &ProxyClient, capture_id: &CaptureId) -> RefundNotice {
    match client.refund(capture_id).await {
        Ok(resp) if resp.is_ok() => RefundNotice::Success {
            message: format!(
                "Refund {}: {}",
                str_field(&resp.body, "status"),
                str_field(&resp.body, "id")
            ),
        },
        Ok(resp) => {
            let error = resp
                .body
                .get("error")
                .and_then(Value::as_str)
                .map_or_else(|| resp.body.to_string(), str::to_owned);
            RefundNotice::Failure {
                message: format!("Refund failed: {error}"),
            }
        }
        Err(e) => RefundNotice::Failure {
            message: format!("Refund failed: {e}"),
        },
    }
}

fn str_field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    use super::*;

    fn client(server: &MockServer) -> ProxyClient {
        ProxyClient::new(Url::parse(&server.base_url()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn create_order_hook_returns_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/orders");
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":"5O190127TN364715T","status":"PAYER_ACTION_REQUIRED","links":[{"href":"https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T","rel":"payer-action"}]}"#);
        });

        let id = create_order_hook(&client(&server), &[]).await.unwrap();
        assert_eq!(id.as_str(), "5O190127TN364715T");

        let placed = place_order(&client(&server), &[]).await.unwrap();
        assert_eq!(
            placed.approve_link.as_deref(),
            Some("https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T")
        );
    }

    #[tokio::test]
    async fn create_order_hook_without_id_errors_with_details() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/orders");
            then.status(500)
                .header("content-type", "application/json")
                .body(r#"{"details":[{"issue":"INTERNAL_SERVICE_ERROR","description":"Try again"}],"debug_id":"dbg-7"}"#);
        });

        let err = create_order_hook(&client(&server), &[]).await.unwrap_err();
        let CheckoutError::OrderNotCreated { issue, description, debug_id, .. } = err else {
            panic!("expected OrderNotCreated");
        };
        assert_eq!(issue.as_deref(), Some("INTERNAL_SERVICE_ERROR"));
        assert_eq!(description.as_deref(), Some("Try again"));
        assert_eq!(debug_id.as_deref(), Some("dbg-7"));
    }

    #[tokio::test]
    async fn create_order_hook_with_proxy_error_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/orders");
            then.status(500)
                .header("content-type", "application/json")
                .body(r#"{"error":"Failed to create order."}"#);
        });

        let err = create_order_hook(&client(&server), &[]).await.unwrap_err();
        assert!(err.to_string().contains("Failed to create order."));
    }

    #[tokio::test]
    async fn on_approve_hook_restarts_on_instrument_declined() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/orders/O-1/capture");
            then.status(422)
                .header("content-type", "application/json")
                .body(r#"{"details":[{"issue":"INSTRUMENT_DECLINED"}],"debug_id":"x"}"#);
        });

        let outcome = on_approve_hook(&client(&server), &OrderId::new("O-1"), ApprovalSource::Wallet)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::RecoverableDecline);

        let outcome = on_approve_hook(&client(&server), &OrderId::new("O-1"), ApprovalSource::Card)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Failure(_)));
    }

    #[tokio::test]
    async fn refund_success_notice() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/payments/refund");
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":"1JU08902781691411","status":"COMPLETED"}"#);
        });

        let notice = refund_trigger(&client(&server), &CaptureId::new("CAP-1")).await;
        assert!(notice.is_success());
        assert_eq!(notice.message(), "Refund COMPLETED: 1JU08902781691411");
    }

    #[tokio::test]
    async fn refund_failure_notice_contains_error_field() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/payments/refund");
            then.status(500)
                .header("content-type", "application/json")
                .body(r#"{"error":"Failed refund captured payment."}"#);
        });

        let notice = refund_trigger(&client(&server), &CaptureId::new("CAP-1")).await;
        assert_eq!(
            notice,
            RefundNotice::Failure {
                message: "Refund failed: Failed refund captured payment.".into()
            }
        );
    }

    #[tokio::test]
    async fn refund_transport_failure_is_notice() {
        let client = ProxyClient::new(Url::parse("http://127.0.0.1:1").unwrap()).unwrap();
        let notice = refund_trigger(&client, &CaptureId::new("CAP-1")).await;
        assert!(!notice.is_success());
        assert!(notice.message().starts_with("Refund failed: proxy request failed"));
    }

    #[test]
    fn created_order_tolerates_malformed_links() {
        let created =
            CreatedOrder::from_body(&json!({ "id": "O-1", "links": [{ "rel": "approve" }] })).unwrap();
        assert_eq!(created.id, OrderId::new("O-1"));
        assert_eq!(created.approve_link, None);
    }

    #[test]
    fn created_order_requires_id() {
        assert!(CreatedOrder::from_body(&json!({ "status": "CREATED" })).is_err());
        assert_eq!(
            CreatedOrder::from_body(&json!({ "id": "O-9" })).unwrap().id,
            OrderId::new("O-9")
        );
    }
}
