//! Route model and synchronization logic between `keenroute-api` and the CLI.
//!
//! - **[`Router`]**: one authenticated router session with the route
//!   operations built on it: [`fetch_routes`](Router::fetch_routes),
//!   batched [`add_routes`](Router::add_routes) and
//!   [`delete_all_routes`](Router::delete_all_routes).
//!
//! - **Domain model** ([`model`]): the canonical [`Route`] with a typed
//!   [`Destination`], and the grouped [`RoutesFile`] users edit by hand.
//!   [`RouteView`] derives a destination from any router-style record.
//!
//! - **Projection** ([`projection`]): grouping routes into a route file for
//!   backups, flattening a route file for uploads, and file I/O.
//!
//! - **Resolution** ([`resolve`]): merges DNS answers for group domains into
//!   their hosts.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod projection;
pub mod resolve;
pub mod router;

pub use keenroute_api;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{RouterConfig, TlsVerification};
pub use convert::to_domain_routes;
pub use error::CoreError;
pub use model::{Destination, DestinationError, Route, RouteGroup, RouteView, RoutesFile};
pub use projection::{flatten_groups, group_routes, load_routes_file, save_routes_file};
pub use resolve::{DomainLookup, LOOKUP_TIMEOUT, ResolveSummary, SystemResolver, resolve_domains};
pub use router::{FetchReport, ROUTE_BATCH_SIZE, Router, UploadReport};
