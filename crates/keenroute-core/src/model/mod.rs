// ── Domain model ──

pub mod destination;
pub mod group;
pub mod route;

pub use destination::{Destination, DestinationError, RouteView, derive_destination};
pub use group::{RouteGroup, RoutesFile};
pub use route::Route;
