//! Public models for the checkout module.
//!
//! Request payloads are transport-agnostic; the remote client owns their wire
//! encoding. Response views mirror the processor's published JSON and are
//! used to interpret bodies the proxy relays verbatim.

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

opaque_id!(
    /// Order identifier issued by the processor.
    OrderId
);
opaque_id!(
    /// Authorization identifier issued by the processor.
    AuthorizationId
);
opaque_id!(
    /// Capture identifier issued by the processor.
    CaptureId
);

/// The five remote operations the proxy performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentOperation {
    CreateOrder,
    CaptureOrder,
    AuthorizeOrder,
    CaptureAuthorization,
    RefundCapture,
}

impl PaymentOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateOrder => "create_order",
            Self::CaptureOrder => "capture_order",
            Self::AuthorizeOrder => "authorize_order",
            Self::CaptureAuthorization => "capture_authorization",
            Self::RefundCapture => "refund_capture",
        }
    }
}

impl fmt::Display for PaymentOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status code and parsed body of a successful remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T = Value> {
    pub status: u16,
    pub body: T,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn new(status: u16, body: T) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            body: f(self.body),
        }
    }
}

impl ApiResponse<Value> {
    /// Re-parse the relayed body into a typed view.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the body does not match `U`.
    pub fn body_as<U: DeserializeOwned>(&self) -> Result<U, serde_json::Error> {
        U::deserialize(&self.body)
    }
}

/// A product line in the shopper's cart. Accepted by the proxy, never priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: String,
    pub quantity: u32,
}

/// What the processor should do once the buyer approves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Capture,
    Authorize,
}

/// Currency amount; `value` is a decimal string as the processor expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub currency_code: String,
    pub value: String,
}

impl Money {
    #[must_use]
    pub fn usd(value: impl Into<String>) -> Self {
        Self {
            currency_code: "USD".to_owned(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseUnit {
    pub amount: Money,
}

/// Create-order request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub intent: Intent,
    pub purchase_units: Vec<PurchaseUnit>,
}

impl CreateOrder {
    /// Single purchase unit captured immediately on approval.
    #[must_use]
    pub fn capture(amount: Money) -> Self {
        Self {
            intent: Intent::Capture,
            purchase_units: vec![PurchaseUnit { amount }],
        }
    }
}

/// Capture-authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureAuthorization {
    /// When `false` the authorization stays open for further captures.
    pub final_capture: bool,
}

/// Order as returned by create/capture/authorize.
///
/// Every field is optional: the proxy relays bodies verbatim, and on failure
/// the same shape carries `details` and `debug_id` instead of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: Option<String>,
    pub status: Option<String>,
    pub purchase_units: Vec<PurchaseUnitView>,
    pub links: Vec<Link>,
    pub details: Vec<ErrorDetail>,
    pub debug_id: Option<String>,
}

impl Order {
    /// Field-by-field view of any JSON body.
    ///
    /// A field of the wrong type reads as absent and a malformed list entry is
    /// skipped, so one bad field never hides the others.
    #[must_use]
    pub fn from_value(body: &Value) -> Self {
        Self {
            id: string_at(body, "id"),
            status: string_at(body, "status"),
            purchase_units: entries(body.get("purchase_units"), |unit| {
                unit.is_object().then(|| PurchaseUnitView::from_value(unit))
            }),
            links: entries(body.get("links"), parse),
            details: entries(body.get("details"), parse),
            debug_id: string_at(body, "debug_id"),
        }
    }

    /// First capture record, falling back to the first authorization record.
    #[must_use]
    pub fn first_transaction(&self) -> Option<&Transaction> {
        let payments = self.purchase_units.first()?.payments.as_ref()?;
        payments
            .captures
            .first()
            .or_else(|| payments.authorizations.first())
    }

    /// Buyer approval link, if the processor returned one.
    #[must_use]
    pub fn approve_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| matches!(link.rel.as_str(), "approve" | "payer-action"))
            .map(|link| link.href.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PurchaseUnitView {
    pub reference_id: Option<String>,
    pub payments: Option<Payments>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Payments {
    pub captures: Vec<Transaction>,
    pub authorizations: Vec<Transaction>,
}

impl PurchaseUnitView {
    fn from_value(unit: &Value) -> Self {
        Self {
            reference_id: string_at(unit, "reference_id"),
            payments: unit
                .get("payments")
                .filter(|payments| payments.is_object())
                .map(|payments| Payments {
                    captures: entries(payments.get("captures"), parse),
                    authorizations: entries(payments.get("authorizations"), parse),
                }),
        }
    }
}

/// Capture or authorization record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub status: String,
}

/// One entry of the processor's error `details` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    pub issue: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// HATEOAS link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    #[serde(default)]
    pub method: Option<String>,
}

fn string_at(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn entries<T>(list: Option<&Value>, item: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    list.and_then(Value::as_array)
        .map(|items| items.iter().filter_map(item).collect())
        .unwrap_or_default()
}

fn parse<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_response_success_range() {
        assert!(ApiResponse::new(201, Value::Null).is_success());
        assert!(!ApiResponse::new(422, Value::Null).is_success());
        assert!(!ApiResponse::new(199, Value::Null).is_success());
    }

    #[test]
    fn body_as_parses_captured_order() {
        let resp = ApiResponse::new(
            201,
            json!({
                "id": "5O190127TN364715T",
                "status": "COMPLETED",
                "purchase_units": [{
                    "reference_id": "default",
                    "payments": {
                        "captures": [{ "id": "3C679366HH908993F", "status": "COMPLETED" }]
                    }
                }]
            }),
        );
        let order: Order = resp.body_as().unwrap();
        assert_eq!(order.id.as_deref(), Some("5O190127TN364715T"));
        let tx = order.first_transaction().unwrap();
        assert_eq!(tx.id, "3C679366HH908993F");
        assert_eq!(tx.status, "COMPLETED");
    }

    #[test]
    fn first_transaction_falls_back_to_authorizations() {
        let order: Order = serde_json::from_value(json!({
            "purchase_units": [{
                "payments": { "authorizations": [{ "id": "AUTH-1", "status": "CREATED" }] }
            }]
        }))
        .unwrap();
        assert_eq!(order.first_transaction().unwrap().id, "AUTH-1");
    }

    #[test]
    fn error_body_parses_as_order_view() {
        let order: Order = serde_json::from_value(json!({
            "name": "UNPROCESSABLE_ENTITY",
            "details": [{ "issue": "INSTRUMENT_DECLINED", "description": "declined" }],
            "debug_id": "abc123"
        }))
        .unwrap();
        assert!(order.id.is_none());
        assert_eq!(order.details[0].issue, "INSTRUMENT_DECLINED");
        assert_eq!(order.debug_id.as_deref(), Some("abc123"));
        assert!(order.first_transaction().is_none());
    }

    #[test]
    fn approve_link_accepts_payer_action() {
        let order: Order = serde_json::from_value(json!({
            "id": "O-1",
            "links": [
                { "href": "https://api/self", "rel": "self", "method": "GET" },
                { "href": "https://www.paypal.com/checkoutnow?token=O-1", "rel": "payer-action" }
            ]
        }))
        .unwrap();
        assert_eq!(
            order.approve_link(),
            Some("https://www.paypal.com/checkoutnow?token=O-1")
        );
    }

    #[test]
    fn from_value_keeps_id_when_other_fields_are_malformed() {
        let order = Order::from_value(&json!({
            "id": "O-1",
            "status": 7,
            "links": [
                { "rel": "approve" },
                { "href": "https://www.paypal.com/checkoutnow?token=O-1", "rel": "approve" }
            ],
            "details": "not-a-list"
        }));
        assert_eq!(order.id.as_deref(), Some("O-1"));
        assert!(order.status.is_none());
        assert!(order.details.is_empty());
        assert_eq!(
            order.approve_link(),
            Some("https://www.paypal.com/checkoutnow?token=O-1")
        );
    }

    #[test]
    fn from_value_skips_bad_transactions() {
        let order = Order::from_value(&json!({
            "purchase_units": [
                "junk",
                { "payments": { "captures": [{ "id": 1 }, { "id": "CAP-2", "status": "COMPLETED" }] } }
            ]
        }));
        assert_eq!(order.first_transaction().unwrap().id, "CAP-2");
        assert_eq!(Order::from_value(&Value::Null), Order::default());
    }

    #[test]
    fn operation_names_are_stable() {
        assert_eq!(PaymentOperation::RefundCapture.to_string(), "refund_capture");
        assert_eq!(OrderId::new("X").as_str(), "X");
    }
}
