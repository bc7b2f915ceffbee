//! Flag-aware configuration: profile from `alfen-config`, then CLI
//! overrides on top. Core receives a finished `ChargerConfig`.

use std::time::Duration;

use alfen_config::{Config, Profile};
use alfen_core::{ChargerConfig, TlsVerification};
use secrecy::SecretString;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Build a `ChargerConfig` from the config file, profile, and CLI overrides.
pub fn build_charger_config(global: &GlobalOpts, cfg: &Config) -> Result<ChargerConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut config = match cfg.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, global, cfg)?,
        None => {
            // An explicitly requested profile has to exist
            if global.profile.is_some() {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(cfg),
                });
            }
            from_flags(global, &profile_name, cfg)?
        }
    };

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }

    Ok(config)
}

fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<ChargerConfig, CliError> {
    // URL: flag > env > profile
    let url_str = global.url.as_deref().unwrap_or(&profile.url);
    let url = parse_url(url_str)?;

    // Password: flag > profile chain
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => alfen_config::resolve_password(profile, profile_name)?,
    };

    Ok(alfen_config::charger_config(url, password, profile, &cfg.defaults))
}

/// No profile on disk: everything has to come from flags / env vars.
fn from_flags(
    global: &GlobalOpts,
    profile_name: &str,
    cfg: &Config,
) -> Result<ChargerConfig, CliError> {
    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: alfen_config::config_path().display().to_string(),
    })?;
    let url = parse_url(url_str)?;

    let password = global
        .password
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let profile = Profile {
        url: url_str.into(),
        ..Profile::default()
    };
    Ok(alfen_config::charger_config(url, password, &profile, &cfg.defaults))
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
