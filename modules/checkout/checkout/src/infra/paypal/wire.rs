//! PayPal JSON encoding of the SDK request models and error envelope.

use checkout_sdk::{CaptureAuthorization, CreateOrder, ErrorDetail, Intent, PaymentsError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct OrderRequest<'a> {
    pub intent: &'static str,
    pub purchase_units: Vec<PurchaseUnitRequest<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseUnitRequest<'a> {
    pub amount: AmountRequest<'a>,
}

#[derive(Debug, Serialize)]
pub struct AmountRequest<'a> {
    pub currency_code: &'a str,
    pub value: &'a str,
}

impl<'a> From<&'a CreateOrder> for OrderRequest<'a> {
    fn from(order: &'a CreateOrder) -> Self {
        Self {
            intent: match order.intent {
                Intent::Capture => "CAPTURE",
                Intent::Authorize => "AUTHORIZE",
            },
            purchase_units: order
                .purchase_units
                .iter()
                .map(|unit| PurchaseUnitRequest {
                    amount: AmountRequest {
                        currency_code: &unit.amount.currency_code,
                        value: &unit.amount.value,
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaptureAuthorizationRequest {
    pub final_capture: bool,
}

impl From<&CaptureAuthorization> for CaptureAuthorizationRequest {
    fn from(req: &CaptureAuthorization) -> Self {
        Self {
            final_capture: req.final_capture,
        }
    }
}

/// PayPal error envelope (`name`, `message`, `debug_id`, `details`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorEnvelope {
    name: Option<String>,
    message: Option<String>,
    debug_id: Option<String>,
    details: Vec<ErrorDetailWire>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetailWire {
    issue: String,
    #[serde(default)]
    description: Option<String>,
}

/// Build [`PaymentsError::Api`] from a non-2xx response body.
///
/// Bodies that are not PayPal envelopes still produce an error carrying the
/// status; `header_debug_id` (the `Paypal-Debug-Id` header) fills in a missing
/// `debug_id`.
pub fn api_error(status: u16, body: &Value, header_debug_id: Option<String>) -> PaymentsError {
    let envelope = ErrorEnvelope::deserialize(body).unwrap_or_default();
    let message = envelope
        .message
        .or_else(|| body.get("error_description").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| format!("HTTP {status}"));
    PaymentsError::Api {
        status,
        name: envelope.name,
        message,
        debug_id: envelope.debug_id.or(header_debug_id),
        details: envelope
            .details
            .into_iter()
            .map(|d| ErrorDetail {
                issue: d.issue,
                description: d.description,
            })
            .collect(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use checkout_sdk::Money;
    use serde_json::json;

    use super::*;

    #[test]
    fn order_request_uses_paypal_casing() {
        let order = CreateOrder::capture(Money::usd("100.00"));
        let body = serde_json::to_value(OrderRequest::from(&order)).unwrap();
        assert_eq!(
            body,
            json!({
                "intent": "CAPTURE",
                "purchase_units": [{ "amount": { "currency_code": "USD", "value": "100.00" } }]
            })
        );
    }

    #[test]
    fn capture_authorization_request_keeps_flag() {
        let body = serde_json::to_value(CaptureAuthorizationRequest::from(&CaptureAuthorization {
            final_capture: false,
        }))
        .unwrap();
        assert_eq!(body, json!({ "final_capture": false }));
    }

    #[test]
    fn api_error_reads_envelope() {
        let body = json!({
            "name": "UNPROCESSABLE_ENTITY",
            "message": "The requested action could not be performed.",
            "debug_id": "90957fca61718",
            "details": [{ "issue": "ORDER_NOT_APPROVED", "description": "Payer has not yet approved" }]
        });
        let err = api_error(422, &body, Some("header-id".into()));
        let PaymentsError::Api { status, name, message, debug_id, details } = err else {
            panic!("expected Api error");
        };
        assert_eq!(status, 422);
        assert_eq!(name.as_deref(), Some("UNPROCESSABLE_ENTITY"));
        assert_eq!(message, "The requested action could not be performed.");
        assert_eq!(debug_id.as_deref(), Some("90957fca61718"));
        assert_eq!(details[0].issue, "ORDER_NOT_APPROVED");
    }

    #[test]
    fn api_error_tolerates_foreign_bodies() {
        let err = api_error(502, &Value::String("bad gateway".into()), Some("dbg".into()));
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.debug_id(), Some("dbg"));
        assert_eq!(err.to_string(), "payment API error 502: HTTP 502");
    }
}
