//! Checkout domain service.
//!
//! Each operation builds the fixed remote payload, performs exactly one call
//! on the injected [`PaymentsApi`] and relays the result.

use std::future::Future;
use std::sync::Arc;

use checkout_sdk::{
    ApiResponse, AuthorizationId, CaptureAuthorization, CaptureId, CartItem, CreateOrder, Money,
    OrderId, PaymentOperation, PaymentsApi, PaymentsError,
};
use tracing::instrument;

use super::error::DomainError;

/// Placeholder charge for every order; the cart is never priced.
pub const ORDER_CURRENCY: &str = "USD";
pub const ORDER_AMOUNT: &str = "100.00";

pub struct Service {
    api: Arc<dyn PaymentsApi>,
}

impl Service {
    #[must_use]
    pub fn new(api: Arc<dyn PaymentsApi>) -> Self {
        Self { api }
    }

    /// Create an order for the placeholder amount with capture intent.
    ///
    /// # Errors
    /// Returns [`DomainError::Upstream`] when the remote call fails.
    #[instrument(skip(self, cart), fields(cart_items = cart.len()))]
    pub async fn create_order(&self, cart: &[CartItem]) -> Result<ApiResponse, DomainError> {
        let order = CreateOrder::capture(Money {
            currency_code: ORDER_CURRENCY.to_owned(),
            value: ORDER_AMOUNT.to_owned(),
        });
        relay(PaymentOperation::CreateOrder, self.api.create_order(&order)).await
    }

    /// # Errors
    /// Returns [`DomainError::Upstream`] when the remote call fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn capture_order(&self, order_id: &OrderId) -> Result<ApiResponse, DomainError> {
        relay(PaymentOperation::CaptureOrder, self.api.capture_order(order_id)).await
    }

    /// # Errors
    /// Returns [`DomainError::Upstream`] when the remote call fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn authorize_order(&self, order_id: &OrderId) -> Result<ApiResponse, DomainError> {
        relay(PaymentOperation::AuthorizeOrder, self.api.authorize_order(order_id)).await
    }

    /// Capture part of an authorization, leaving it open for further captures.
    ///
    /// # Errors
    /// Returns [`DomainError::Upstream`] when the remote call fails.
    #[instrument(skip(self), fields(authorization_id = %authorization_id))]
    pub async fn capture_authorization(
        &self,
        authorization_id: &AuthorizationId,
    ) -> Result<ApiResponse, DomainError> {
        let request = CaptureAuthorization {
            final_capture: false,
        };
        relay(
            PaymentOperation::CaptureAuthorization,
            self.api.capture_authorization(authorization_id, &request),
        )
        .await
    }

    /// # Errors
    /// Returns [`DomainError::Upstream`] when the remote call fails.
    #[instrument(skip(self), fields(capture_id = %capture_id))]
    pub async fn refund_capture(&self, capture_id: &CaptureId) -> Result<ApiResponse, DomainError> {
        relay(PaymentOperation::RefundCapture, self.api.refund_capture(capture_id)).await
    }
}

async fn relay(
    operation: PaymentOperation,
    call: impl Future<Output = Result<ApiResponse, PaymentsError>>,
) -> Result<ApiResponse, DomainError> {
    match call.await {
        Ok(response) => {
            tracing::debug!(operation = %operation, status = response.status, "relaying response");
            Ok(response)
        }
        Err(source) => {
            tracing::error!(
                operation = %operation,
                status = source.status(),
                debug_id = source.debug_id(),
                error = %source,
                "payment operation failed"
            );
            Err(DomainError::Upstream { operation, source })
        }
    }
}
