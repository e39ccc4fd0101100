// NDMS RCI client modules
//
// Session handshake, request execution, wire models, and the static route
// endpoints of the router's remote configuration API.

pub mod auth;
pub mod client;
pub mod models;
pub mod routes;

pub use client::{RciClient, SessionState};
