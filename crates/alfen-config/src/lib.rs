//! Profile configuration for the `alfen` CLI.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation to `alfen_core::ChargerConfig`. The CLI layers its flag
//! overrides on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use alfen_core::{ChargerConfig, TlsVerification};

/// Keyring service name; entries are stored as `<profile>/password`.
pub const KEYRING_SERVICE: &str = "alfen";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    ProfileNotFound { name: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is selected.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named wallbox profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, else `default_profile`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// `plain` or `json`.
    #[serde(default = "default_output")]
    pub output: String,

    /// Skip TLS verification. Unset means skip unless a `ca_cert` is
    /// configured; `false` forces the system CA store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Snapshot lifetime in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: None,
            timeout: default_timeout(),
            cache_ttl: default_cache_ttl(),
        }
    }
}

fn default_output() -> String {
    "plain".into()
}
fn default_timeout() -> u64 {
    alfen_core::config::DEFAULT_TIMEOUT.as_secs()
}
fn default_cache_ttl() -> u64 {
    alfen_core::DEFAULT_CACHE_TTL.as_secs()
}

/// A named wallbox profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Device base URL (e.g., "https://192.168.1.50").
    pub url: String,

    /// Password of the `admin` account (plaintext, prefer keyring).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override snapshot lifetime.
    pub cache_ttl: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "alfen", "alfen").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("alfen");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ALFEN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the `admin` password for a profile.
///
/// Order: the profile's `password_env` variable, `ALFEN_PASSWORD`, the
/// system keyring, then the plaintext `password` field.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(pw) = std::env::var("ALFEN_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `ChargerConfig` from a profile, falling back to `defaults`
/// for anything the profile leaves unset. No CLI flag overrides.
pub fn profile_to_charger_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ChargerConfig, ConfigError> {
    let url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;

    let password = resolve_password(profile, profile_name)?;
    Ok(charger_config(url, password, profile, defaults))
}

/// Assemble a `ChargerConfig` from already-resolved URL and password.
pub fn charger_config(
    url: url::Url,
    password: SecretString,
    profile: &Profile,
    defaults: &Defaults,
) -> ChargerConfig {
    let mut config = ChargerConfig::new(url, password);
    config.tls = tls_for(profile, defaults);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.cache_ttl = Duration::from_secs(profile.cache_ttl.unwrap_or(defaults.cache_ttl));
    config
}

fn tls_for(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    let insecure = profile.insecure.or(defaults.insecure);
    match (insecure, &profile.ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca_path)) => TlsVerification::CustomCa(ca_path.clone()),
        (Some(false), None) => TlsVerification::SystemDefaults,
        (None, None) => TlsVerification::DangerAcceptInvalid, // wallboxes ship self-signed certs
    }
}
