//! PayPal REST implementation of [`PaymentsApi`](checkout_sdk::PaymentsApi).

mod client;
mod token;
mod wire;

pub use client::{InitError, PayPalClient};
pub use token::{TokenError, TokenProvider};
