//! Interpretation of capture results.

use checkout_sdk::{Order, Transaction};
use serde_json::Value;

pub const FAILURE_MESSAGE: &str = "Sorry, your transaction could not be processed.";

/// Issue code of a decline the buyer can recover from with another instrument.
const INSTRUMENT_DECLINED: &str = "INSTRUMENT_DECLINED";

/// How the buyer approved the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalSource {
    /// PayPal wallet or another redirect funding source.
    Wallet,
    /// Card fields; a declined card is final.
    Card,
}

/// Result of an approved payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Capture (or authorization) record that was not declined.
    Success(Transaction),
    /// Funding source declined; the buyer should pick another one.
    RecoverableDecline,
    /// Anything else; the reason is appended to the failure message.
    Failure(String),
}

impl Outcome {
    /// Text shown to the buyer.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Success(tx) => format!("Transaction {}: {}", tx.status, tx.id),
            Self::RecoverableDecline => {
                format!("{FAILURE_MESSAGE}\n\nThe payment method was declined, please try another.")
            }
            Self::Failure(reason) if reason.is_empty() => FAILURE_MESSAGE.to_owned(),
            Self::Failure(reason) => format!("{FAILURE_MESSAGE}\n\n{reason}"),
        }
    }
}

/// Classify a capture response body.
///
/// 1. `details[0].issue == INSTRUMENT_DECLINED` outside a card flow is
///    recoverable.
/// 2. Any other error detail, no transaction record, or a `DECLINED` record
///    is a failure.
/// 3. Otherwise the first capture (or authorization) record is a success.
#[must_use]
pub fn classify_capture(body: &Value, source: ApprovalSource) -> Outcome {
    let order = Order::from_value(body);

    if let Some(detail) = order.details.first() {
        if detail.issue == INSTRUMENT_DECLINED && source == ApprovalSource::Wallet {
            return Outcome::RecoverableDecline;
        }
        return Outcome::Failure(format!(
            "{} ({})",
            detail.description.as_deref().unwrap_or(&detail.issue),
            order.debug_id.as_deref().unwrap_or_default()
        ));
    }

    match order.first_transaction() {
        None => Outcome::Failure(body.to_string()),
        Some(tx) if tx.status == "DECLINED" => Outcome::Failure(String::new()),
        Some(tx) => Outcome::Success(tx.clone()),
    }
}
