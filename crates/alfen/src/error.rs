//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use alfen_config::ConfigError;
use alfen_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to wallbox at {url}")]
    #[diagnostic(
        code(alfen::connection_failed),
        help(
            "Check that the wallbox is powered and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(alfen::timeout),
        help("Increase timeout with --timeout or check the wallbox's network link.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(alfen::auth_failed),
        help(
            "Verify the admin password.\n\
             The wallbox also refuses logins while another app holds a session."
        )
    )]
    AuthFailed { message: String },

    #[error("Wallbox keeps rejecting the session")]
    #[diagnostic(
        code(alfen::session_rejected),
        help("Login succeeded but the next request was refused again. Retry later.")
    )]
    SessionRejected,

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(alfen::no_credentials),
        help(
            "Pass --password, set ALFEN_PASSWORD, store it in the keyring\n\
             (service 'alfen', user '{profile}/password'), or add it to the profile."
        )
    )]
    NoCredentials { profile: String },

    // ── Device data ──────────────────────────────────────────────────

    #[error("Property {id} not reported by the wallbox")]
    #[diagnostic(
        code(alfen::property_not_found),
        help("The wallbox returned: [{available}]")
    )]
    PropertyNotFound { id: String, available: String },

    #[error("Unexpected value from wallbox: {message}")]
    #[diagnostic(code(alfen::unexpected_value))]
    UnexpectedValue { message: String },

    #[error("Wallbox API error: {message}")]
    #[diagnostic(code(alfen::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(alfen::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(alfen::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No wallbox configured")]
    #[diagnostic(
        code(alfen::no_config),
        help(
            "Pass --url and --password, or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(alfen::config))]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(alfen::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::SessionRejected | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::PropertyNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout => CliError::Timeout,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::UnauthorizedRetryExhausted => CliError::SessionRejected,

            CoreError::PropertyNotFound { id, available } => {
                CliError::PropertyNotFound { id, available }
            }

            err @ (CoreError::TypeMismatch { .. } | CoreError::UnhandledStatus { .. }) => {
                CliError::UnexpectedValue {
                    message: err.to_string(),
                }
            }

            CoreError::Api { message, status } => CliError::ApiError {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
