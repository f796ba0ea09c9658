//! Checkout SDK
//!
//! Contract between the checkout proxy and the payment processor:
//! - API trait (`PaymentsApi`)
//! - Request payloads and response views (`CreateOrder`, `Order`, ...)
//! - Error type (`PaymentsError`)
//!
//! ## Usage
//!
//! ```ignore
//! use checkout_sdk::{CreateOrder, PaymentsApi};
//!
//! let api: Arc<dyn PaymentsApi> = Arc::new(PayPalClient::new(&cfg)?);
//! let created = api.create_order(&CreateOrder::capture(Money::usd("100.00"))).await?;
//! assert!(created.is_success());
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

pub use api::PaymentsApi;
pub use error::PaymentsError;
pub use models::{
    ApiResponse, AuthorizationId, CaptureAuthorization, CaptureId, CartItem, CreateOrder,
    ErrorDetail, Intent, Link, Money, Order, OrderId, PaymentOperation, Payments, PurchaseUnit,
    PurchaseUnitView, Transaction,
};
