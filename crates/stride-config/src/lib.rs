//! Shared configuration for the stride CLI and TUI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `stride_core::ClientConfig`. Both binaries depend on
//! this crate — the CLI adds `GlobalOpts`-aware wrappers on top.

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

use stride_core::{ClientConfig, TlsVerification};

/// Keyring service name under which tokens are stored.
const KEYRING_SERVICE: &str = "stride";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' in {path}")]
    UnknownProfile { profile: String, path: String },

    #[error("keyring operation failed: {0}")]
    Keyring(#[from] keyring::Error),

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

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            page_size: default_page_size(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_page_size() -> u32 {
    20
}
fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://club.example.org").
    pub server: String,

    /// API token (plaintext — prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override list page size.
    pub page_size: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "stride-club", "stride").map_or_else(
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
    p.push("stride");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from an explicit file + environment.
///
/// Precedence, lowest to highest: built-in defaults, TOML file,
/// `STRIDE_*` environment variables (e.g. `STRIDE_DEFAULTS_OUTPUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STRIDE_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to an explicit path.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile selection ───────────────────────────────────────────────

/// Pick a profile by explicit name, falling back to `default_profile`.
pub fn select_profile<'c>(
    config: &'c Config,
    name: Option<&str>,
) -> Result<(String, &'c Profile), ConfigError> {
    let name = name
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    config
        .profiles
        .get(&name)
        .map(|profile| (name.clone(), profile))
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: name,
            path: config_path().display().to_string(),
        })
}

// ── Token resolution (without CLI flags) ────────────────────────────

/// Resolve an API token from the credential chain (no CLI flag step).
///
/// Order: profile's `token_env` variable, the `STRIDE_TOKEN` variable,
/// the system keyring, plaintext in the config file. `None` means the
/// console runs unauthenticated (only useful against open dev servers).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var("STRIDE_TOKEN") {
        return Some(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref token) = profile.token {
        return Some(SecretString::from(token.clone()));
    }

    None
}

/// Store a token in the system keyring for a profile.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(token)?;
    Ok(())
}

/// Remove a profile's token from the system keyring. Missing entries
/// are not an error.
pub fn clear_token(profile_name: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/token")
}

// ── ClientConfig translation ────────────────────────────────────────

/// Build a `ClientConfig` from a profile — no CLI flag overrides.
///
/// Suitable for the TUI and other non-CLI consumers.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let token = resolve_token(profile, profile_name);

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let page_size = profile.page_size.unwrap_or(defaults.page_size);

    Ok(ClientConfig {
        url,
        token,
        tls,
        timeout,
        page_size,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            token: None,
            token_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            page_size: None,
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.page_size, 20);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn file_layers_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "club"

[defaults]
output = "json"

[profiles.club]
server = "https://club.example.org"
page_size = 50
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("club"));
        assert_eq!(config.defaults.output, "json");
        // Untouched defaults survive the merge.
        assert_eq!(config.defaults.timeout, 30);
        assert_eq!(config.profiles["club"].page_size, Some(50));
    }

    #[test]
    fn env_layers_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[defaults]
output = "table"
"#,
            )?;
            jail.set_env("STRIDE_DEFAULTS_OUTPUT", "json");

            let config = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(config.defaults.output, "json");
            Ok(())
        });
    }

    #[test]
    fn save_then_load_round_trips_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "club".into(),
            Profile {
                insecure: Some(true),
                ..profile("https://club.example.org")
            },
        );

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles["club"].server, "https://club.example.org");
        assert_eq!(loaded.profiles["club"].insecure, Some(true));
    }

    #[test]
    fn select_profile_prefers_explicit_name() {
        let mut config = Config::default();
        config.profiles.insert("a".into(), profile("https://a.test"));
        config.profiles.insert("b".into(), profile("https://b.test"));
        config.default_profile = Some("a".into());

        let (name, chosen) = select_profile(&config, Some("b")).unwrap();
        assert_eq!(name, "b");
        assert_eq!(chosen.server, "https://b.test");

        let (name, _) = select_profile(&config, None).unwrap();
        assert_eq!(name, "a");
    }

    #[test]
    fn select_profile_unknown_name_errors() {
        let config = Config::default();
        let err = select_profile(&config, Some("ghost")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { .. }));
    }

    #[test]
    fn plaintext_token_is_the_last_resort() {
        let prof = Profile {
            token: Some("plain".into()),
            // Points at a variable that is never set.
            token_env: Some("STRIDE_TEST_UNSET_TOKEN_VAR".into()),
            ..profile("https://club.example.org")
        };

        let token = resolve_token(&prof, "unit-test-no-keyring").unwrap();
        assert_eq!(token.expose_secret(), "plain");
    }

    #[test]
    fn token_env_wins_over_plaintext() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("STRIDE_TEST_TOKEN_VAR", "from-env");

            let prof = Profile {
                token: Some("plain".into()),
                token_env: Some("STRIDE_TEST_TOKEN_VAR".into()),
                ..profile("https://club.example.org")
            };

            let token = resolve_token(&prof, "unit-test-no-keyring").unwrap();
            assert_eq!(token.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn profile_translation_maps_tls_and_tuning() {
        let prof = Profile {
            insecure: Some(true),
            timeout: Some(5),
            page_size: Some(100),
            ..profile("https://club.example.org")
        };

        let cc = profile_to_client_config(&prof, "club", &Defaults::default()).unwrap();
        assert_eq!(cc.url.as_str(), "https://club.example.org/");
        assert_eq!(cc.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cc.timeout, Duration::from_secs(5));
        assert_eq!(cc.page_size, 100);
    }

    #[test]
    fn bad_server_url_is_a_validation_error() {
        let err =
            profile_to_client_config(&profile("not a url"), "club", &Defaults::default())
                .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
