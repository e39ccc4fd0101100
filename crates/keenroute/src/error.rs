//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use keenroute_config::ConfigError;
use keenroute_core::CoreError;
use keenroute_core::keenroute_api;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARTIAL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to router at {url}")]
    #[diagnostic(
        code(keenroute::connection_failed),
        help(
            "Check that the router is reachable and the RCI port is correct.\n\
             Hosts without a scheme use http://, e.g. 192.168.1.1:280"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: keenroute_api::Error,
    },

    #[error("TLS error: {message}")]
    #[diagnostic(
        code(keenroute::tls_error),
        help("Use --insecure (-k) to accept the router's certificate, or set ca_cert in the config file.")
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(keenroute::timeout),
        help("Increase the timeout with --timeout or check router responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(keenroute::auth_failed),
        help("Verify the username and password. Run: keenroute config init")
    )]
    AuthFailed { message: String },

    #[error("Router protocol error: {message}")]
    #[diagnostic(
        code(keenroute::protocol),
        help("The host answered, but not like a Keenetic RCI endpoint. Check --host and the port.")
    )]
    Protocol { message: String },

    // ── Router ───────────────────────────────────────────────────────
    #[error("Router rejected {path} (HTTP {status})")]
    #[diagnostic(code(keenroute::router_error), help("Router response: {body}"))]
    RouterRejected {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Upload failed at batch {batch} of {total_batches}; no routes were saved")]
    #[diagnostic(code(keenroute::upload_failed))]
    UploadFailed {
        batch: usize,
        total_batches: usize,
        #[source]
        source: keenroute_api::Error,
    },

    #[error(
        "Upload stopped at batch {batch} of {total_batches}; {routes_saved} routes were already saved"
    )]
    #[diagnostic(
        code(keenroute::partial_upload),
        help(
            "Routes from earlier batches stay on the router.\n\
             Run `keenroute clear` before retrying to avoid duplicates."
        )
    )]
    PartialUpload {
        batch: usize,
        total_batches: usize,
        routes_saved: usize,
        #[source]
        source: keenroute_api::Error,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid routes file: {message}")]
    #[diagnostic(code(keenroute::invalid_routes))]
    InvalidRoutes { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(keenroute::validation))]
    Validation { field: String, reason: String },

    #[error("Routes file not found: {}", .path.display())]
    #[diagnostic(code(keenroute::file_not_found))]
    FileNotFound { path: PathBuf },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(keenroute::config),
        help("Create a config file with: keenroute config init")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(keenroute::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Other ───────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(keenroute::core))]
    Core(CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::PartialUpload { .. } => exit_code::PARTIAL,
            Self::UploadFailed { source, .. } => api_exit_code(source),
            Self::InvalidRoutes { .. }
            | Self::Validation { .. }
            | Self::FileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Config(e) => match e {
                ConfigError::Missing { .. } | ConfigError::Validation { .. } => exit_code::USAGE,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }
}

/// Exit code for a router error that reaches the user wrapped in context.
fn api_exit_code(err: &keenroute_api::Error) -> i32 {
    if err.is_auth_failure() {
        exit_code::AUTH
    } else if err.is_timeout() {
        exit_code::TIMEOUT
    } else if err.is_connect_failure() {
        exit_code::CONNECTION
    } else {
        exit_code::GENERAL
    }
}

// ── Error mapping ────────────────────────────────────────────────────

impl From<keenroute_api::Error> for CliError {
    fn from(err: keenroute_api::Error) -> Self {
        use keenroute_api::Error as Api;

        match err {
            Api::Authentication { message } => Self::AuthFailed { message },
            Api::Request { path, status, body } => Self::RouterRejected { path, status, body },
            Api::Tls(message) => Self::TlsError { message },
            Api::InvalidUrl(e) => Self::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            ref e if e.is_timeout() => Self::Timeout,
            Api::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "(unknown)".to_owned(), ToString::to_string);
                Self::ConnectionFailed { url, source: err }
            }
            other => Self::Protocol {
                message: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(e) => e.into(),
            CoreError::UploadFailed {
                batch_index,
                total_batches,
                source,
            } => Self::UploadFailed {
                batch: batch_index + 1,
                total_batches,
                source,
            },
            CoreError::PartialUpload {
                batch_index,
                total_batches,
                routes_submitted,
                source,
            } => Self::PartialUpload {
                batch: batch_index + 1,
                total_batches,
                routes_saved: routes_submitted,
                source,
            },
            e if e.is_validation() => Self::InvalidRoutes {
                message: e.to_string(),
            },
            other => Self::Core(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let partial: CliError = CoreError::PartialUpload {
            batch_index: 1,
            total_batches: 2,
            routes_submitted: 50,
            source: keenroute_api::Error::Tls("x".into()),
        }
        .into();
        assert_eq!(partial.exit_code(), exit_code::PARTIAL);
        assert!(partial.to_string().contains("batch 2 of 2"));

        let auth: CliError = keenroute_api::Error::Authentication {
            message: "nope".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let invalid: CliError = CoreError::GroupTarget { group: "#1".into() }.into();
        assert_eq!(invalid.exit_code(), exit_code::USAGE);

        let missing: CliError = ConfigError::Missing {
            field: "host",
            env: "HOST",
        }
        .into();
        assert_eq!(missing.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn failed_first_batch_exits_with_underlying_class() {
        let auth: CliError = CoreError::UploadFailed {
            batch_index: 0,
            total_batches: 1,
            source: keenroute_api::Error::Authentication {
                message: "HTTP 401".into(),
            },
        }
        .into();
        assert!(matches!(auth, CliError::UploadFailed { batch: 1, .. }));
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let tls: CliError = CoreError::UploadFailed {
            batch_index: 0,
            total_batches: 3,
            source: keenroute_api::Error::Tls("bad certificate".into()),
        }
        .into();
        assert_eq!(tls.exit_code(), exit_code::CONNECTION);

        let rejected: CliError = CoreError::UploadFailed {
            batch_index: 0,
            total_batches: 1,
            source: keenroute_api::Error::Request {
                path: "rci/".into(),
                status: 500,
                body: "boom".into(),
            },
        }
        .into();
        assert_eq!(rejected.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn protocol_errors_keep_their_message() {
        let err: CliError = keenroute_api::Error::MissingChallenge {
            header: "X-NDM-Realm",
        }
        .into();
        assert!(matches!(&err, CliError::Protocol { message } if message.contains("X-NDM-Realm")));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
