use thiserror::Error;

use crate::models::ErrorDetail;

/// Errors returned by [`PaymentsApi`](crate::PaymentsApi) implementations.
///
/// Variants never carry credentials or access tokens.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum PaymentsError {
    /// The processor answered with a non-2xx status.
    #[error("payment API error {status}: {message}")]
    Api {
        status: u16,
        name: Option<String>,
        message: String,
        debug_id: Option<String>,
        details: Vec<ErrorDetail>,
    },

    /// Access token could not be obtained.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network or protocol failure before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but its body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl PaymentsError {
    #[must_use]
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Remote status code, when the processor answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Auth(_) | Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Processor debug identifier, useful when contacting support.
    #[must_use]
    pub fn debug_id(&self) -> Option<&str> {
        match self {
            Self::Api { debug_id, .. } => debug_id.as_deref(),
            Self::Auth(_) | Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn api_error_renders_status_and_message() {
        let e = PaymentsError::Api {
            status: 422,
            name: Some("UNPROCESSABLE_ENTITY".into()),
            message: "The requested action could not be performed".into(),
            debug_id: Some("f0a1b2".into()),
            details: vec![],
        };
        assert_eq!(
            e.to_string(),
            "payment API error 422: The requested action could not be performed"
        );
        assert_eq!(e.status(), Some(422));
        assert_eq!(e.debug_id(), Some("f0a1b2"));
    }

    #[test]
    fn local_errors_have_no_status() {
        let e = PaymentsError::transport("connection refused");
        assert_eq!(e.to_string(), "transport error: connection refused");
        assert_eq!(e.status(), None);
        assert_eq!(PaymentsError::auth("401").to_string(), "authentication failed: 401");
        assert_eq!(PaymentsError::decode("eof").to_string(), "invalid response: eof");
    }
}
