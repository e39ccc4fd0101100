//! Configuration for the keenroute CLI.
//!
//! One TOML file describing how to reach the router, layered with
//! `KEENETIC_*` environment variables, and translation to
//! `keenroute_core::RouterConfig`. The CLI applies its flags on top.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;

use keenroute_core::{RouterConfig, TlsVerification};

/// Prefix of the environment variables that override file values.
pub const ENV_PREFIX: &str = "KEENETIC_";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is required (set via --{field}, the config file, or KEENETIC_{env})")]
    Missing { field: &'static str, env: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

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

// ── TOML config ─────────────────────────────────────────────────────

/// Router connection settings as stored on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Router address, e.g. `192.168.1.1:280` or `https://router.example.net`.
    #[serde(default, deserialize_with = "string_like")]
    pub host: String,

    #[serde(default, deserialize_with = "string_like")]
    pub user: String,

    /// Stored in plaintext; `KEENETIC_PASSWORD` keeps it out of the file.
    #[serde(
        default,
        deserialize_with = "secret_like",
        serialize_with = "expose_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Custom CA certificate (PEM) for HTTPS routers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            user: String::new(),
            password: None,
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Accepts strings as well as the numbers and booleans `Env` parses values into.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

fn string_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(|s| s.to_string())
        .unwrap_or_default())
}

fn secret_like<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .map(SecretString::from))
}

#[allow(clippy::ref_option)]
fn expose_secret<S: Serializer>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_str(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

impl Config {
    /// Check that every field needed to log in is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "host",
                env: "HOST",
            });
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "user",
                env: "USER",
            });
        }
        if self.password.as_ref().is_none_or(|p| p.expose_secret().is_empty()) {
            return Err(ConfigError::Missing {
                field: "password",
                env: "PASSWORD",
            });
        }
        Ok(())
    }

    /// Router base URL. A bare `host[:port]` gets an `http://` scheme.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let host = self.host.trim().trim_end_matches('/');
        let raw = if host.contains("://") {
            host.to_owned()
        } else {
            format!("http://{host}")
        };
        Url::parse(&raw).map_err(|e| ConfigError::Validation {
            field: "host".into(),
            reason: format!("{e}: {raw}"),
        })
    }

    pub fn tls(&self) -> TlsVerification {
        if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }

    /// Validate and build the session configuration.
    pub fn to_router_config(&self) -> Result<RouterConfig, ConfigError> {
        self.validate()?;
        let password = self
            .password
            .clone()
            .ok_or(ConfigError::Missing {
                field: "password",
                env: "PASSWORD",
            })?;
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(RouterConfig {
            url: self.base_url()?,
            username: self.user.trim().to_owned(),
            password,
            tls: self.tls(),
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "keenroute").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("keenroute");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the default path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if any), then `KEENETIC_*`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX));

    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    restrict_permissions(path)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
