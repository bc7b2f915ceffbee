// Wallbox HTTP client
//
// Wraps `reqwest::Client` with device URL construction, the Alfen content
// type, and the session lock. Endpoint calls live in `properties.rs`,
// login/logout and 401 recovery in `session.rs`.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::CONTENT_TYPE;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::auth::{Credentials, SessionState};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Content type the device expects on every JSON POST.
pub const ALFEN_CONTENT_TYPE: &str = "alfen/json; charset=utf-8";

/// Raw HTTP client for a single wallbox.
///
/// All authenticated traffic is serialized through `session`: the device
/// cannot handle concurrent logins, so a request, its 401 detection, the
/// re-login, and the retry run as one critical section.
pub struct AlfenClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    pub(crate) session: Mutex<SessionState>,
    /// Cookie jar reference for inspecting the session cookie.
    cookie_jar: Option<Arc<Jar>>,
}

impl AlfenClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (the session lives in a cookie).
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
            credentials,
            session: Mutex::new(SessionState::Idle),
            cookie_jar,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            credentials,
            session: Mutex::new(SessionState::Idle),
            cookie_jar: None,
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Current session state. Waits for any in-flight authenticated call.
    pub async fn session_state(&self) -> SessionState {
        *self.session.lock().await
    }

    /// The `Cookie` header value currently held for the device, if any.
    pub fn cookie_header(&self) -> Option<String> {
        let jar = self.cookie_jar.as_ref()?;
        let cookies = jar.cookies(&self.base_url)?;
        cookies.to_str().ok().map(String::from)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`. `path` may carry a query string.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn send_get(&self, url: Url) -> Result<reqwest::Response, reqwest::Error> {
        debug!("GET {}", url);
        self.http.get(url).send().await
    }

    pub(crate) async fn send_post(
        &self,
        url: Url,
        body: Vec<u8>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        debug!("POST {}", url);
        self.http
            .post(url)
            .header(CONTENT_TYPE, ALFEN_CONTENT_TYPE)
            .body(body)
            .send()
            .await
    }
}

/// Ensure the base URL ends with `/` so `join` appends instead of replacing
/// the last path segment.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Read a JSON body, keeping the raw text for diagnostics on failure.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}

/// Turn a non-success status into `Error::Http`.
pub(crate) async fn check_status(
    resp: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let preview: String = body.chars().take(200).collect();
    Err(Error::Http {
        status: status.as_u16(),
        message: format!("{context}: {preview}"),
    })
}
