//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use stride_config::ConfigError;
use stride_core::CoreError;

/// Exit codes: 2 config, 3 connection, 4 auth, 5 not found, 6 validation,
/// 7 API, 74 IO.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const CONNECTION: i32 = 3;
    pub const AUTH: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
    pub const VALIDATION: i32 = 6;
    pub const API: i32 = 7;
    pub const IO: i32 = 74;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to server at {url}")]
    #[diagnostic(
        code(stride::connection_failed),
        help(
            "Check that the server is running and accessible.\n\
             URL: {url}\n\
             Self-signed TLS? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(stride::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(stride::auth_failed),
        help(
            "Verify your API token.\n\
             Store a fresh one with: stride config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(stride::no_token),
        help(
            "Store a token with: stride config set-token --profile {profile}\n\
             Or set the STRIDE_API_TOKEN environment variable."
        )
    )]
    NoToken { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(stride::not_found),
        help("Run: stride {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(stride::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stride::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(stride::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: stride config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(stride::no_config),
        help(
            "Create a config with: stride config init\n\
             Or pass --server directly.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(stride::config))]
    Config(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(stride::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(stride::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoToken { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => {
                exit_code::VALIDATION
            }
            Self::ApiError { .. } => exit_code::API,
            Self::ProfileNotFound { .. } | Self::NoConfig { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::Io(_) => exit_code::IO,
            Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound { message } => CliError::NotFound {
                resource_type: "record".into(),
                identifier: message,
                list_command: "<entity> list".into(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api { message, status } => CliError::ApiError {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },

            CoreError::Config { message } => CliError::Config(message),

            CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { profile, path: _ } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_documented_table() {
        let cases: [(CliError, i32); 6] = [
            (
                CliError::NoConfig {
                    path: "/tmp/x".into(),
                },
                exit_code::CONFIG,
            ),
            (
                CliError::ConnectionFailed {
                    url: "https://x".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CliError::AuthFailed {
                    message: "bad token".into(),
                },
                exit_code::AUTH,
            ),
            (
                CliError::NotFound {
                    resource_type: "member".into(),
                    identifier: "9".into(),
                    list_command: "members list".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CliError::Validation {
                    field: "id".into(),
                    reason: "not a number".into(),
                },
                exit_code::VALIDATION,
            ),
            (
                CliError::ApiError {
                    message: "boom".into(),
                },
                exit_code::API,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.exit_code(), expected, "{err}");
        }
    }

    #[test]
    fn core_not_found_maps_to_not_found() {
        let core = CoreError::NotFound {
            message: "/api/user-infos/7".into(),
        };
        let cli = CliError::from(core);
        assert_eq!(cli.exit_code(), exit_code::NOT_FOUND);
    }
}
