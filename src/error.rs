//! Error taxonomy shared by every management call.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MgmtError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MgmtError {
    /// 401/403: the credentials given at construction were refused.
    #[error("Authentication failed (HTTP {status}): {reason}")]
    AuthenticationFailed { status: u16, reason: String },

    /// Any other non-2xx below 500. Usually a caller input problem such as
    /// an unknown resource name.
    #[error("Request rejected (HTTP {status}): {error}: {reason}")]
    RequestRejected {
        status: u16,
        error: String,
        reason: String,
    },

    /// 5xx, transport failure or timeout. `status` is `None` when no HTTP
    /// response was received at all.
    #[error("Broker unavailable{}: {reason}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    BrokerUnavailable { status: Option<u16>, reason: String },

    /// 2xx whose body does not decode into the expected entity.
    #[error("Malformed {entity} response: {detail}")]
    MalformedResponse { entity: &'static str, detail: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A resource name that cannot be addressed as a single path segment
    /// (`""`, `"."`, `".."`). Raised before any request is sent.
    #[error("Invalid identifier '{0}': cannot be sent as a path segment")]
    InvalidIdentifier(String),
}

impl MgmtError {
    pub fn malformed(entity: &'static str, detail: impl Into<String>) -> Self {
        MgmtError::MalformedResponse {
            entity,
            detail: detail.into(),
        }
    }

    pub fn unavailable(status: Option<u16>, reason: impl Into<String>) -> Self {
        MgmtError::BrokerUnavailable {
            status,
            reason: reason.into(),
        }
    }

    /// HTTP status carried by the error, if the broker answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            MgmtError::AuthenticationFailed { status, .. } => Some(*status),
            MgmtError::RequestRejected { status, .. } => Some(*status),
            MgmtError::BrokerUnavailable { status, .. } => *status,
            MgmtError::MalformedResponse { .. }
            | MgmtError::InvalidConfig(_)
            | MgmtError::InvalidIdentifier(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MgmtError::RequestRejected { status: 404, .. })
    }

    /// Only availability failures are worth retrying, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MgmtError::BrokerUnavailable { .. })
    }
}

impl From<reqwest::Error> for MgmtError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        MgmtError::unavailable(err.status().map(|s| s.as_u16()), reason)
    }
}
