// ── Runtime connection configuration ──
//
// These types describe *how* to reach a wallbox. They carry the password
// and connection tuning, but never touch disk. The CLI constructs a
// `ChargerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::ids;

/// How long a property snapshot is served from memory.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = alfen_api::transport::DEFAULT_TIMEOUT;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for wallboxes.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for a single wallbox.
///
/// Built by the CLI, passed to [`Charger::connect`](crate::Charger::connect).
#[derive(Debug, Clone)]
pub struct ChargerConfig {
    /// Device URL (e.g., `https://192.168.1.50`).
    pub url: Url,
    /// Password of the `admin` account.
    pub password: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Lifetime of a cached property snapshot.
    pub cache_ttl: Duration,
    /// Property ids fetched on every refresh.
    pub tracked: Vec<String>,
}

impl ChargerConfig {
    /// Config with default TLS, timeout, TTL and the standard read set.
    pub fn new(url: Url, password: SecretString) -> Self {
        Self {
            url,
            password,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            tracked: ids::TRACKED.iter().map(|id| (*id).to_owned()).collect(),
        }
    }
}
