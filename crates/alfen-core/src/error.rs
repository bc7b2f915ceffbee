// ── Core error types ──
//
// User-facing errors from alfen-core. Consumers never see reqwest or
// serde errors directly: `From<alfen_api::Error>` folds them into these
// variants. `Clone` lets one failed cache refresh reach every waiter.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to wallbox at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the wallbox timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Wallbox rejected the session again after re-authentication")]
    UnauthorizedRetryExhausted,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Property {id} not found in snapshot [{available}]")]
    PropertyNotFound { id: String, available: String },

    #[error("Property {id} is a {found}, expected a {expected}")]
    TypeMismatch {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unhandled status: {code}")]
    UnhandledStatus { code: f64 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures of the session layer.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::UnauthorizedRetryExhausted
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<alfen_api::Error> for CoreError {
    fn from(err: alfen_api::Error) -> Self {
        match err {
            alfen_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            alfen_api::Error::UnauthorizedRetryExhausted => CoreError::UnauthorizedRetryExhausted,
            alfen_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            alfen_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            alfen_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            alfen_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            alfen_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            alfen_api::Error::Serialization(e) => {
                CoreError::Internal(format!("Serialization error: {e}"))
            }
        }
    }
}
