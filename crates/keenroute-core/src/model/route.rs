// ── Canonical route ──

use serde::Serialize;

use super::destination::Destination;

/// One flattened route: a single destination plus its routing attributes.
///
/// Routes built from a route file carry exactly one of `gateway` or
/// `interface`. Routes read back from the router are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub destination: Destination,
    pub comment: String,
    pub gateway: String,
    pub interface: String,
    pub auto: bool,
    pub reject: bool,
}

impl Route {
    /// Attributes shared by every route of one group, in grouping order.
    pub(crate) fn attributes(&self) -> RouteAttributes {
        RouteAttributes {
            comment: self.comment.clone(),
            gateway: self.gateway.clone(),
            interface: self.interface.clone(),
            auto: self.auto,
            reject: self.reject,
        }
    }

    /// Gateway if set, else interface.
    pub fn target(&self) -> &str {
        if self.gateway.is_empty() {
            &self.interface
        } else {
            &self.gateway
        }
    }
}

/// Grouping key for the route file projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RouteAttributes {
    pub comment: String,
    pub gateway: String,
    pub interface: String,
    pub auto: bool,
    pub reject: bool,
}
