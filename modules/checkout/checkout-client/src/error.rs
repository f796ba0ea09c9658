use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckoutError {
    #[error("invalid proxy URL: {0}")]
    InvalidUrl(String),

    #[error("proxy request failed: {0}")]
    Transport(String),

    #[error("invalid proxy response: {0}")]
    InvalidResponse(String),

    /// The create-order response carried no order id.
    #[error("Could not initiate checkout...\n\n{message}")]
    OrderNotCreated {
        issue: Option<String>,
        description: Option<String>,
        debug_id: Option<String>,
        message: String,
    },

    #[error("cannot {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

impl CheckoutError {
    /// Build [`CheckoutError::OrderNotCreated`] from the create-order body.
    ///
    /// The message prefers `details[0]` and `debug_id`; without them it is
    /// the raw body.
    #[must_use]
    pub fn order_not_created(body: &Value) -> Self {
        let detail = body.pointer("/details/0");
        let issue = detail
            .and_then(|d| d.get("issue"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let description = detail
            .and_then(|d| d.get("description"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let debug_id = body
            .get("debug_id")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let message = match &issue {
            Some(issue) => format!(
                "{issue} {} ({})",
                description.as_deref().unwrap_or_default(),
                debug_id.as_deref().unwrap_or_default()
            ),
            None => body.to_string(),
        };

        Self::OrderNotCreated {
            issue,
            description,
            debug_id,
            message,
        }
    }
}
