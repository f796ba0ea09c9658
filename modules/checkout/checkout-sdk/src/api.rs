use async_trait::async_trait;

use crate::error::PaymentsError;
use crate::models::{
    ApiResponse, AuthorizationId, CaptureAuthorization, CaptureId, CreateOrder, OrderId,
};

/// Public API trait of the payment processor, one method per remote operation.
///
/// Implementations return the remote status code and parsed body on success.
/// A remote rejection (non-2xx) is reported as [`PaymentsError::Api`], never as
/// an `Ok` response.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// Create an order.
    async fn create_order(&self, order: &CreateOrder) -> Result<ApiResponse, PaymentsError>;

    /// Capture payment for an approved order.
    async fn capture_order(&self, order_id: &OrderId) -> Result<ApiResponse, PaymentsError>;

    /// Authorize payment for an approved order.
    async fn authorize_order(&self, order_id: &OrderId) -> Result<ApiResponse, PaymentsError>;

    /// Capture a previously authorized payment.
    async fn capture_authorization(
        &self,
        authorization_id: &AuthorizationId,
        request: &CaptureAuthorization,
    ) -> Result<ApiResponse, PaymentsError>;

    /// Refund a captured payment in full.
    async fn refund_capture(&self, capture_id: &CaptureId) -> Result<ApiResponse, PaymentsError>;
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::models::Money;

    struct Rejecting;

    #[async_trait]
    impl PaymentsApi for Rejecting {
        async fn create_order(&self, order: &CreateOrder) -> Result<ApiResponse, PaymentsError> {
            Ok(ApiResponse::new(
                201,
                json!({ "id": "O-1", "value": order.purchase_units[0].amount.value }),
            ))
        }

        async fn capture_order(&self, _: &OrderId) -> Result<ApiResponse, PaymentsError> {
            Err(PaymentsError::transport("down"))
        }

        async fn authorize_order(&self, _: &OrderId) -> Result<ApiResponse, PaymentsError> {
            Err(PaymentsError::transport("down"))
        }

        async fn capture_authorization(
            &self,
            _: &AuthorizationId,
            _: &CaptureAuthorization,
        ) -> Result<ApiResponse, PaymentsError> {
            Err(PaymentsError::transport("down"))
        }

        async fn refund_capture(&self, _: &CaptureId) -> Result<ApiResponse, PaymentsError> {
            Err(PaymentsError::transport("down"))
        }
    }

    #[tokio::test]
    async fn trait_is_object_safe() {
        let api: Arc<dyn PaymentsApi> = Arc::new(Rejecting);
        let created = api
            .create_order(&CreateOrder::capture(Money::usd("100.00")))
            .await
            .unwrap();
        assert_eq!(created.status, 201);
        assert_eq!(created.body["value"], "100.00");
        assert!(api.capture_order(&OrderId::new("O-1")).await.is_err());
    }
}
