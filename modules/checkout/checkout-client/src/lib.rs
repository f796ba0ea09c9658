//! Checkout client.
//!
//! Drives the two payment hooks against the checkout proxy and interprets
//! what comes back:
//! - `create_order_hook` yields the order id to approve
//! - `on_approve_hook` captures the order and classifies the result
//! - `refund_trigger` refunds a capture and reports a user-facing notice
//!
//! [`CheckoutFlow`] chains them into one checkout attempt.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

mod client;
mod error;
mod flow;
mod hooks;
mod outcome;

pub use client::{ProxyClient, ProxyResponse};
pub use error::CheckoutError;
pub use flow::{CheckoutFlow, CheckoutState, DEFAULT_MAX_RESTARTS};
pub use hooks::{
    CreatedOrder, RefundNotice, create_order_hook, on_approve_hook, place_order, refund_trigger,
};
pub use outcome::{ApprovalSource, FAILURE_MESSAGE, Outcome, classify_capture};
