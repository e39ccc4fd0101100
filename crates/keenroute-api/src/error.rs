use thiserror::Error;

/// Top-level error type for the `keenroute-api` crate.
///
/// Covers every failure mode of the RCI session: the challenge-response
/// handshake, transport, and request/response handling.
/// `keenroute-core` wraps these and adds domain-level validation errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Handshake rejected, or a call was still unauthorized after re-auth.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Protocol ────────────────────────────────────────────────────
    /// The `401` probe response did not carry a required challenge header.
    #[error("Auth challenge is missing the {header} header")]
    MissingChallenge { header: &'static str },

    /// The router answered with a status the protocol does not allow here.
    #[error("{context}: unexpected HTTP status {status}")]
    UnexpectedStatus { context: String, status: u16 },

    /// A call finished with a non-200 status after the retry policy ran.
    #[error("Request {path} failed (HTTP {status}): {body}")]
    Request {
        path: String,
        status: u16,
        body: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the router refused our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the router broke the handshake protocol.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::MissingChallenge { .. } | Self::UnexpectedStatus { .. }
        )
    }

    /// Returns `true` if the router could not be reached at all.
    pub fn is_connect_failure(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect(),
            Self::Tls(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if the underlying transport timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
