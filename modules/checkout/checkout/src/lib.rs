//! Checkout proxy module.
//!
//! Relays five browser-facing endpoints to the PayPal Orders and Payments
//! APIs and serves the checkout page. Successful remote responses are
//! returned with their status and body unchanged; every failure collapses to
//! `500 {"error": "<fixed message>"}`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use checkout_sdk;
pub use config::{ConfigError, PayPalConfig, PayPalEnvironment};
pub use domain::error::DomainError;
pub use domain::service::Service;
pub use infra::paypal::{InitError, PayPalClient};
pub use module::CheckoutModule;
