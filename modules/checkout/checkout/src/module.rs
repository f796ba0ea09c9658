//! Checkout module wiring.

use std::sync::Arc;

use axum::Router;
use checkout_sdk::PaymentsApi;

use crate::api::rest::page::CheckoutPage;
use crate::api::rest::routes;
use crate::config::PayPalConfig;
use crate::domain::service::Service;
use crate::infra::paypal::{InitError, PayPalClient};

/// Checkout proxy: one remote client, one service, one router.
pub struct CheckoutModule {
    service: Arc<Service>,
    page: Arc<CheckoutPage>,
}

impl CheckoutModule {
    /// Validate the configuration and build the PayPal-backed module.
    ///
    /// # Errors
    /// Returns [`InitError`] if the configuration is incomplete or the
    /// remote client cannot be built.
    pub fn from_config(cfg: &PayPalConfig) -> Result<Self, InitError> {
        cfg.validate()?;
        let client = PayPalClient::new(cfg)?;
        tracing::info!(
            environment = cfg.environment.as_str(),
            api_base = %cfg.api_base()?,
            "checkout module initialized"
        );
        Self::new(Arc::new(client), &cfg.client_id)
    }

    /// Build the module around any [`PaymentsApi`] implementation.
    ///
    /// # Errors
    /// Returns [`InitError::Page`] if the checkout page cannot be rendered.
    pub fn new(api: Arc<dyn PaymentsApi>, client_id: &str) -> Result<Self, InitError> {
        Ok(Self {
            service: Arc::new(Service::new(api)),
            page: Arc::new(CheckoutPage::render(client_id)?),
        })
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// Router serving every checkout endpoint.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::register_routes(Router::new(), self.service(), Arc::clone(&self.page))
    }
}
