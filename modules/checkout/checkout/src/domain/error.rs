//! Domain errors for the checkout proxy.

use checkout_sdk::{PaymentOperation, PaymentsError};
use thiserror::Error;

/// Every failure of a proxy operation.
///
/// Both variants surface identically on the wire; the split only shapes logs.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The payment processor call failed (rejection, transport, token).
    #[error("{operation} failed: {source}")]
    Upstream {
        operation: PaymentOperation,
        #[source]
        source: PaymentsError,
    },

    /// The incoming request or the relayed response could not be handled locally.
    #[error("{operation} failed: {message}")]
    Local {
        operation: PaymentOperation,
        message: String,
    },
}

impl DomainError {
    #[must_use]
    pub fn local(operation: PaymentOperation, message: impl Into<String>) -> Self {
        Self::Local {
            operation,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn operation(&self) -> PaymentOperation {
        match self {
            Self::Upstream { operation, .. } | Self::Local { operation, .. } => *operation,
        }
    }
}
