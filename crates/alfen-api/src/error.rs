use thiserror::Error;

/// Top-level error type for the `alfen-api` crate.
///
/// Covers every failure mode of the device's HTTP surface: session
/// handling, transport, non-success statuses, and payload decoding.
/// `alfen-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong password, device refused the session, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The device still answered 401 after a fresh login and one retry.
    #[error("Unauthorized after re-authentication -- giving up")]
    UnauthorizedRetryExhausted,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Device responses ────────────────────────────────────────────
    /// Non-success HTTP status on an authenticated endpoint.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request body could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if the failure comes from the session layer.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::UnauthorizedRetryExhausted
        )
    }

    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
