// ── Runtime connection configuration ──
//
// These types describe *how* to reach a router. They carry credential data
// and connection tuning, but never touch disk. The CLI builds a
// `RouterConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use keenroute_api::{TlsMode, TransportConfig};

/// TLS verification strategy for routers reached over HTTPS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed / KeenDNS certificates).
    DangerAcceptInvalid,
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for one router session.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router base URL (e.g., `http://192.168.1.1:280`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RouterConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_tls(self.tls.clone().into())
    }
}
