// Session management
//
// Cookie-based login/logout and transparent recovery from session expiry.
// The device drops sessions without notice; the first request after that
// answers 401. `execute_authenticated` detects this, logs in again, and
// retries exactly once, all under the client's session lock.

use std::future::Future;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::auth::SessionState;
use crate::client::{AlfenClient, check_status};
use crate::error::Error;

impl AlfenClient {
    /// Authenticate with the device using the configured password.
    ///
    /// On success the session cookie is stored in the client's cookie jar
    /// and sent with all subsequent requests.
    pub async fn login(&self) -> Result<(), Error> {
        let mut state = self.session.lock().await;
        self.login_locked(&mut state).await
    }

    /// End the current session.
    ///
    /// The local state returns to `Idle` as soon as the device answered,
    /// whatever the status.
    pub async fn logout(&self) -> Result<(), Error> {
        let mut state = self.session.lock().await;

        let url = self.api_url("logout")?;
        debug!("logging out at {}", url);

        let resp = self.send_post(url, Vec::new()).await?;
        *state = SessionState::Idle;
        check_status(resp, "logout failed").await?;

        debug!("logout complete");
        Ok(())
    }

    /// Run one device request with session-expiry recovery.
    ///
    /// `action` performs a single HTTP request and may be invoked twice.
    /// Transport failures propagate untouched. A 401 triggers one login
    /// and one retry; a second 401 is reported as
    /// [`Error::UnauthorizedRetryExhausted`]. Only one authenticated call
    /// runs at a time per client.
    pub async fn execute_authenticated<F, Fut>(&self, action: F) -> Result<reqwest::Response, Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut state = self.session.lock().await;

        let resp = action().await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        warn!("session no longer valid - re-authenticating");
        *state = SessionState::Idle;
        self.login_locked(&mut state).await?;

        let resp = action().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::UnauthorizedRetryExhausted);
        }
        Ok(resp)
    }

    /// Perform the login request. Caller must hold the session lock.
    async fn login_locked(&self, state: &mut SessionState) -> Result<(), Error> {
        *state = SessionState::Authenticating;
        match self.post_login().await {
            Ok(()) => {
                *state = SessionState::Authenticated;
                Ok(())
            }
            Err(e) => {
                *state = SessionState::Idle;
                Err(e)
            }
        }
    }

    async fn post_login(&self) -> Result<(), Error> {
        let url = self.api_url("login")?;
        debug!("logging in at {}", url);

        let body = serde_json::to_vec(&self.credentials().login_body())?;
        let resp = self.send_post(url, body).await.map_err(|e| {
            debug!(error = %e, "error during login");
            Error::Authentication {
                message: format!("login request failed: {e}"),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        debug!("login successful");
        Ok(())
    }
}
