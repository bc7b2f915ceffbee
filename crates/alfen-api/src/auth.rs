use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use strum::{Display, EnumString};

/// The wallbox only knows a single account for its HTTP API.
pub const DEFAULT_USERNAME: &str = "admin";

/// Client-side view of the device session.
///
/// The actual credential lives in the cookie jar; this only tracks whether
/// a login has succeeded since the last logout or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// No session has been established (or it was logged out).
    #[default]
    Idle,
    /// A login request is in flight.
    Authenticating,
    /// The last login succeeded.
    Authenticated,
}

/// Username/password pair posted to `/api/login`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    /// Credentials for the built-in `admin` account.
    pub fn admin(password: SecretString) -> Self {
        Self {
            username: DEFAULT_USERNAME.into(),
            password,
        }
    }

    pub(crate) fn login_body(&self) -> LoginBody<'_> {
        LoginBody {
            username: &self.username,
            password: self.password.expose_secret(),
        }
    }
}

/// Wire shape of the login request.
#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}
