//! CLI configuration — thin wrapper around `stride_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --api-token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use stride_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use stride_config::{
    Config, Profile, clear_token, config_path, load_config_or_default, save_config, store_token,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
///
/// Flag priority: `--server`/`--api-token`/`--insecure`/`--timeout` beat
/// profile values, which beat `[defaults]`. Works with no config file at
/// all when `--server` is given.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg, global);
    }

    // No profile -- build from flags / env alone.
    let url_str = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let token = global
        .api_token
        .as_ref()
        .map(|t| SecretString::from(t.clone()));

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ClientConfig {
        url,
        token,
        tls,
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        page_size: cfg.defaults.page_size,
    })
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    // 1. Server URL (flag > env > profile)
    let url_str = global.server.as_deref().unwrap_or(&profile.server);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Token (flag > credential chain)
    let token = match global.api_token {
        Some(ref t) => Some(SecretString::from(t.clone())),
        None => stride_config::resolve_token(profile, profile_name),
    };

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Tuning
    let timeout_secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);
    let page_size = profile.page_size.unwrap_or(cfg.defaults.page_size);

    Ok(ClientConfig {
        url,
        token,
        tls,
        timeout: Duration::from_secs(timeout_secs),
        page_size,
    })
}
