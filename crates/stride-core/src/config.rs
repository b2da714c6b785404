// ── Runtime connection configuration ──
//
// These types describe *how* to reach a club server. They carry the
// bearer token and connection tuning, but never touch disk.
// The CLI/TUI constructs a `ClientConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use stride_api::{PageQuery, TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict). Default.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs on a lab server).
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

/// Configuration for connecting to a single club server.
///
/// Built by CLI/TUI, passed to `Console` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL (e.g., `https://club.example.org`).
    pub url: Url,
    /// Bearer token for `/api`. `None` only works against open dev servers.
    pub token: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Page size used when a list fetch does not specify one.
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080"
                .parse()
                .expect("default URL literal is valid"),
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: 20,
        }
    }
}

impl ClientConfig {
    /// First page with the configured size, sorted by id ascending.
    #[must_use]
    pub fn default_query(&self) -> PageQuery {
        PageQuery::new(0, self.page_size).sorted("id,asc")
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_query_uses_page_size_and_id_ascending_order() {
        let config = ClientConfig {
            page_size: 50,
            ..ClientConfig::default()
        };
        let query = config.default_query();
        assert_eq!(query.page, 0);
        assert_eq!(query.size, 50);
        assert_eq!(query.sort.as_deref(), Some("id,asc"));
    }
}
