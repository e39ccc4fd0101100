// ── Core error types ──
//
// Errors surfaced by route operations. Transport and protocol failures come
// from `keenroute_api` and are wrapped whole; everything else is a domain
// validation error that names the group, host or domain at fault.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Router session ───────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] keenroute_api::Error),

    /// A route read from the router has no IPv4 destination.
    #[error(
        "unsupported route destination (IPv4 only): host={host:?} network={network:?} ip={ip:?}"
    )]
    UnsupportedDestination {
        host: String,
        network: String,
        ip: String,
    },

    // ── Upload ───────────────────────────────────────────────────────
    /// The first batch failed; nothing reached the router's saved config.
    #[error("route upload failed at batch {} of {total_batches}", .batch_index + 1)]
    UploadFailed {
        batch_index: usize,
        total_batches: usize,
        #[source]
        source: keenroute_api::Error,
    },

    /// A later batch failed after earlier batches were already persisted.
    #[error(
        "route upload stopped at batch {} of {total_batches}; {routes_submitted} routes were already saved on the router",
        .batch_index + 1
    )]
    PartialUpload {
        batch_index: usize,
        total_batches: usize,
        routes_submitted: usize,
        #[source]
        source: keenroute_api::Error,
    },

    // ── Route file validation ────────────────────────────────────────
    #[error("group {group}: set exactly one of gateway or interface")]
    GroupTarget { group: String },

    #[error("group {group} host {host:?}: {reason}")]
    InvalidHost {
        group: String,
        host: String,
        reason: String,
    },

    #[error("group {group}: empty domain entry")]
    EmptyDomain { group: String },

    #[error("group {group} domain {domain:?}: {reason}")]
    Resolve {
        group: String,
        domain: String,
        reason: String,
    },

    // ── Files ────────────────────────────────────────────────────────
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl CoreError {
    /// Returns `true` if some routes were saved on the router before failing.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::PartialUpload { .. })
    }

    /// Returns `true` for route-file problems the user must fix by hand.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::GroupTarget { .. }
                | Self::InvalidHost { .. }
                | Self::EmptyDomain { .. }
                | Self::Resolve { .. }
                | Self::UnsupportedDestination { .. }
        )
    }
}
