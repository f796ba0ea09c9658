//! One checkout attempt as an explicit state machine.
//!
//! ```text
//! Init -> OrderCreated -> Captured
//!                      -> Init           (recoverable decline, bounded)
//!                      -> DeclinedFinal
//!                      -> Error
//! ```

use checkout_sdk::{CartItem, OrderId, Transaction};

use crate::client::ProxyClient;
use crate::error::CheckoutError;
use crate::hooks::{CreatedOrder, on_approve_hook, place_order};
use crate::outcome::{ApprovalSource, Outcome};

pub const DEFAULT_MAX_RESTARTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Init,
    OrderCreated(OrderId),
    Captured(Transaction),
    DeclinedFinal(String),
    Error(String),
}

impl CheckoutState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::OrderCreated(_) => "order_created",
            Self::Captured(_) => "captured",
            Self::DeclinedFinal(_) => "declined_final",
            Self::Error(_) => "error",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Captured(_) | Self::DeclinedFinal(_) | Self::Error(_)
        )
    }
}

/// Checkout attempt driver. Nothing outlives the attempt.
#[derive(Debug)]
pub struct CheckoutFlow {
    state: CheckoutState,
    approve_link: Option<String>,
    restarts: u32,
    max_restarts: u32,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESTARTS)
    }
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(max_restarts: u32) -> Self {
        Self {
            state: CheckoutState::Init,
            approve_link: None,
            restarts: 0,
            max_restarts,
        }
    }

    #[must_use]
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    #[must_use]
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Approval link of the current order.
    #[must_use]
    pub fn approve_link(&self) -> Option<&str> {
        self.approve_link.as_deref()
    }

    /// Text for the buyer once the attempt has settled.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match &self.state {
            CheckoutState::Captured(tx) => Some(Outcome::Success(tx.clone()).message()),
            CheckoutState::DeclinedFinal(msg) | CheckoutState::Error(msg) => Some(msg.clone()),
            CheckoutState::Init | CheckoutState::OrderCreated(_) => None,
        }
    }

    /// Apply the create-order result. Valid only in `Init`.
    ///
    /// # Errors
    /// Returns [`CheckoutError::InvalidTransition`] outside `Init`.
    pub fn on_order_created(
        &mut self,
        created: Result<CreatedOrder, CheckoutError>,
    ) -> Result<&CheckoutState, CheckoutError> {
        self.expect_state("create an order", |s| matches!(s, CheckoutState::Init))?;
        self.state = match created {
            Ok(order) => {
                self.approve_link = order.approve_link;
                CheckoutState::OrderCreated(order.id)
            }
            Err(e) => CheckoutState::Error(e.to_string()),
        };
        Ok(&self.state)
    }

    /// Apply the capture result. Valid only in `OrderCreated`.
    ///
    /// # Errors
    /// Returns [`CheckoutError::InvalidTransition`] outside `OrderCreated`.
    pub fn on_captured(
        &mut self,
        outcome: Result<Outcome, CheckoutError>,
    ) -> Result<&CheckoutState, CheckoutError> {
        self.expect_state("capture", |s| matches!(s, CheckoutState::OrderCreated(_)))?;
        self.state = match outcome {
            Ok(Outcome::Success(tx)) => CheckoutState::Captured(tx),
            Ok(Outcome::RecoverableDecline) if self.restarts < self.max_restarts => {
                self.restarts += 1;
                self.approve_link = None;
                tracing::info!(restarts = self.restarts, "payment declined, restarting checkout");
                CheckoutState::Init
            }
            Ok(outcome @ (Outcome::RecoverableDecline | Outcome::Failure(_))) => {
                CheckoutState::DeclinedFinal(outcome.message())
            }
            Err(e) => CheckoutState::Error(e.to_string()),
        };
        Ok(&self.state)
    }

    /// Run the `createOrder` hook.
    ///
    /// # Errors
    /// Returns [`CheckoutError::InvalidTransition`] outside `Init`; hook
    /// failures land in [`CheckoutState::Error`].
    pub async fn create_order(
        &mut self,
        client: &ProxyClient,
        cart: &[CartItem],
    ) -> Result<&CheckoutState, CheckoutError> {
        self.expect_state("create an order", |s| matches!(s, CheckoutState::Init))?;
        let created = place_order(client, cart).await;
        self.on_order_created(created)
    }

    /// Run the `onApprove` hook for the current order.
    ///
    /// # Errors
    /// Returns [`CheckoutError::InvalidTransition`] outside `OrderCreated`;
    /// hook failures land in [`CheckoutState::Error`].
    pub async fn approve(
        &mut self,
        client: &ProxyClient,
        source: ApprovalSource,
    ) -> Result<&CheckoutState, CheckoutError> {
        let CheckoutState::OrderCreated(order_id) = &self.state else {
            return Err(self.invalid("capture"));
        };
        let order_id = order_id.clone();
        let outcome = on_approve_hook(client, &order_id, source).await;
        self.on_captured(outcome)
    }

    fn expect_state(
        &self,
        event: &'static str,
        allowed: impl Fn(&CheckoutState) -> bool,
    ) -> Result<(), CheckoutError> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(event))
        }
    }

    fn invalid(&self, event: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            state: self.state.name(),
            event,
        }
    }
}
