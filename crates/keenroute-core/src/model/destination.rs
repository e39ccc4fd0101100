// ── Route destinations ──
//
// A destination is either a bare IPv4 address or an IPv4 network. The router
// spells destinations three different ways; `RouteView` is the minimal set
// of accessors any of those shapes must expose so `derive_destination` can
// reduce them to one value. IPv6 is rejected everywhere.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use ipnet::{IpNet, Ipv4Net};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Canonical route target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Address(Ipv4Addr),
    /// Network as written. The address part may carry host bits when the
    /// value came from the router.
    Network(Ipv4Net),
}

/// Why a user-supplied host string is not a usable destination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    #[error("empty host")]
    Empty,
    #[error("IPv6 is not supported")]
    Ipv6,
    #[error("invalid IPv4 CIDR")]
    InvalidCidr,
    #[error("invalid IPv4 address")]
    InvalidAddress,
}

impl Destination {
    /// Parse a host value exactly as written: IPv4 address or IPv4 CIDR.
    ///
    /// Returns `None` for anything else, IPv6 included.
    pub fn parse_exact(raw: &str) -> Option<Self> {
        if raw.contains('/') {
            raw.parse::<Ipv4Net>().ok().map(Self::Network)
        } else {
            raw.parse::<Ipv4Addr>().ok().map(Self::Address)
        }
    }

    /// Parse and normalize a hand-written host entry.
    ///
    /// Surrounding whitespace is ignored and CIDR values are reduced to
    /// their network address (`10.1.2.3/8` becomes `10.0.0.0/8`).
    pub fn normalize(raw: &str) -> Result<Self, DestinationError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(DestinationError::Empty);
        }
        if text.contains('/') {
            return match text.parse::<IpNet>() {
                Ok(IpNet::V4(net)) => Ok(Self::Network(net.trunc())),
                Ok(IpNet::V6(_)) => Err(DestinationError::Ipv6),
                Err(_) => Err(DestinationError::InvalidCidr),
            };
        }
        match text.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => Ok(Self::Address(addr)),
            Ok(IpAddr::V6(_)) => Err(DestinationError::Ipv6),
            Err(_) => Err(DestinationError::InvalidAddress),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => write!(f, "{addr}"),
            Self::Network(net) => write!(f, "{net}"),
        }
    }
}

impl FromStr for Destination {
    type Err = DestinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl Serialize for Destination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Derivation ──────────────────────────────────────────────────────

/// Accessors needed to derive a destination from a router-style record.
///
/// Empty strings and zero mean "absent".
pub trait RouteView {
    fn host(&self) -> &str;
    fn network(&self) -> &str;
    fn ip(&self) -> &str;
    fn mask(&self) -> &str;
    fn prefix(&self) -> i64;
    fn prefixlen(&self) -> i64;

    /// Reduce whichever addressing style is populated to one destination.
    fn destination(&self) -> Option<Destination> {
        derive_destination(self)
    }
}

/// Derive the canonical destination of a record.
///
/// 1. `host`, if set, must itself be an IPv4 address or CIDR.
/// 2. Otherwise `network` (or `ip`) must be an IPv4 address.
/// 3. The length comes from `prefix`, then `prefixlen` (each only if
///    1..=32), then `mask`; with none of them the bare address is returned.
pub fn derive_destination<R: RouteView + ?Sized>(route: &R) -> Option<Destination> {
    let host = route.host();
    if !host.is_empty() {
        return Destination::parse_exact(host);
    }

    let network = match route.network() {
        "" => route.ip(),
        n => n,
    };
    let addr: Ipv4Addr = network.parse().ok()?;

    let prefix = [route.prefix(), route.prefixlen()]
        .into_iter()
        .find(|p| (1..=32).contains(p))
        .and_then(|p| u8::try_from(p).ok())
        .or_else(|| mask_to_prefix(route.mask()));

    Some(match prefix.and_then(|p| Ipv4Net::new(addr, p).ok()) {
        Some(net) => Destination::Network(net),
        None => Destination::Address(addr),
    })
}

/// Standard netmask to prefix length; `None` for missing or non-contiguous masks.
fn mask_to_prefix(mask: &str) -> Option<u8> {
    let mask: Ipv4Addr = mask.parse().ok()?;
    ipnet::ipv4_mask_to_prefix(mask).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Stub {
        host: &'static str,
        network: &'static str,
        ip: &'static str,
        mask: &'static str,
        prefix: i64,
        prefixlen: i64,
    }

    impl RouteView for Stub {
        fn host(&self) -> &str {
            self.host
        }
        fn network(&self) -> &str {
            self.network
        }
        fn ip(&self) -> &str {
            self.ip
        }
        fn mask(&self) -> &str {
            self.mask
        }
        fn prefix(&self) -> i64 {
            self.prefix
        }
        fn prefixlen(&self) -> i64 {
            self.prefixlen
        }
    }

    fn dest(stub: &Stub) -> String {
        stub.destination().map(|d| d.to_string()).unwrap_or_default()
    }

    #[test]
    fn host_is_returned_as_written() {
        assert_eq!(dest(&Stub { host: "8.8.8.8", ..Stub::default() }), "8.8.8.8");
        assert_eq!(
            dest(&Stub { host: "10.0.0.5/24", ..Stub::default() }),
            "10.0.0.5/24"
        );
    }

    #[test]
    fn equivalent_addressing_styles_agree() {
        let by_mask = Stub {
            network: "192.168.0.0",
            mask: "255.255.255.0",
            ..Stub::default()
        };
        let by_prefix = Stub {
            network: "192.168.0.0",
            prefix: 24,
            ..Stub::default()
        };
        let by_prefixlen = Stub {
            ip: "192.168.0.0",
            prefixlen: 24,
            ..Stub::default()
        };
        let by_host = Stub {
            host: "192.168.0.0/24",
            ..Stub::default()
        };
        for stub in [&by_mask, &by_prefix, &by_prefixlen, &by_host] {
            assert_eq!(dest(stub), "192.168.0.0/24");
        }
    }

    #[test]
    fn prefix_wins_over_prefixlen_and_mask() {
        let stub = Stub {
            network: "10.0.0.0",
            prefix: 8,
            prefixlen: 16,
            mask: "255.255.255.0",
            ..Stub::default()
        };
        assert_eq!(dest(&stub), "10.0.0.0/8");
    }

    #[test]
    fn out_of_range_prefix_falls_through() {
        let stub = Stub {
            network: "10.0.0.0",
            prefix: 33,
            prefixlen: 0,
            mask: "255.255.0.0",
            ..Stub::default()
        };
        assert_eq!(dest(&stub), "10.0.0.0/16");
    }

    #[test]
    fn no_length_information_yields_bare_address() {
        assert_eq!(dest(&Stub { network: "10.0.0.1", ..Stub::default() }), "10.0.0.1");
        assert_eq!(
            dest(&Stub {
                network: "10.0.0.1",
                mask: "255.0.255.0",
                ..Stub::default()
            }),
            "10.0.0.1"
        );
    }

    #[test]
    fn ipv6_never_yields_a_destination() {
        assert!(Stub { host: "2001:db8::1", ..Stub::default() }.destination().is_none());
        assert!(Stub { host: "2001:db8::/32", ..Stub::default() }.destination().is_none());
        assert!(
            Stub {
                network: "2001:db8::",
                prefix: 32,
                ..Stub::default()
            }
            .destination()
            .is_none()
        );
        assert!(Stub::default().destination().is_none());
    }

    #[test]
    fn normalize_accepts_ipv4_and_cidr() {
        assert_eq!(Destination::normalize("8.8.8.8").unwrap().to_string(), "8.8.8.8");
        assert_eq!(Destination::normalize("  1.1.1.1  ").unwrap().to_string(), "1.1.1.1");
        assert_eq!(
            Destination::normalize("192.168.0.0/16").unwrap().to_string(),
            "192.168.0.0/16"
        );
        assert_eq!(
            Destination::normalize("10.1.2.3/8").unwrap().to_string(),
            "10.0.0.0/8"
        );
    }

    #[test]
    fn normalize_rejects_ipv6_and_garbage() {
        assert_eq!(Destination::normalize("2001:db8::1"), Err(DestinationError::Ipv6));
        assert_eq!(Destination::normalize("2001:db8::/32"), Err(DestinationError::Ipv6));
        assert_eq!(Destination::normalize(""), Err(DestinationError::Empty));
        assert_eq!(
            Destination::normalize("not-an-ip"),
            Err(DestinationError::InvalidAddress)
        );
        assert_eq!(
            Destination::normalize("10.0.0.0/33"),
            Err(DestinationError::InvalidCidr)
        );
    }
}
