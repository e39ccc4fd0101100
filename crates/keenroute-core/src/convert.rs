// ── Wire-to-domain route conversions ──
//
// Bridges `keenroute_api` route records and the canonical `Route`. Reading
// derives one destination from whichever addressing style the router used;
// writing picks `host` for single addresses and `network` + `mask` for
// networks.

use keenroute_api::{FlexBool, FlexString, RouteRecord};

use crate::error::CoreError;
use crate::model::{Destination, Route, RouteView};

impl RouteView for RouteRecord {
    fn host(&self) -> &str {
        RouteRecord::host(self)
    }

    fn network(&self) -> &str {
        RouteRecord::network(self)
    }

    fn ip(&self) -> &str {
        RouteRecord::ip(self)
    }

    fn mask(&self) -> &str {
        RouteRecord::mask(self)
    }

    fn prefix(&self) -> i64 {
        RouteRecord::prefix(self)
    }

    fn prefixlen(&self) -> i64 {
        RouteRecord::prefixlen(self)
    }
}

impl TryFrom<&RouteRecord> for Route {
    type Error = CoreError;

    fn try_from(record: &RouteRecord) -> Result<Self, Self::Error> {
        let destination = record
            .destination()
            .ok_or_else(|| CoreError::UnsupportedDestination {
                host: record.host().to_owned(),
                network: record.network().to_owned(),
                ip: record.ip().to_owned(),
            })?;

        Ok(Self {
            destination,
            comment: record.comment().to_owned(),
            gateway: record.gateway().to_owned(),
            interface: record.interface().to_owned(),
            auto: record.auto(),
            reject: record.reject(),
        })
    }
}

/// Convert every record, failing on the first one without an IPv4 destination.
pub fn to_domain_routes(records: &[RouteRecord]) -> Result<Vec<Route>, CoreError> {
    records.iter().map(Route::try_from).collect()
}

fn non_empty(value: &str) -> Option<FlexString> {
    (!value.is_empty()).then(|| FlexString::new(value))
}

impl From<&Route> for RouteRecord {
    fn from(route: &Route) -> Self {
        let mut record = RouteRecord {
            comment: Some(FlexString::new(route.comment.as_str())),
            gateway: non_empty(&route.gateway),
            interface: non_empty(&route.interface),
            auto: Some(FlexBool::new(route.auto)),
            reject: route.reject.then(|| FlexBool::new(true)),
            ..RouteRecord::default()
        };

        match route.destination {
            Destination::Address(addr) => {
                record.host = Some(FlexString::new(addr.to_string()));
            }
            Destination::Network(net) => {
                record.network = Some(FlexString::new(net.network().to_string()));
                record.mask = Some(FlexString::new(net.netmask().to_string()));
            }
        }
        record
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> RouteRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn record_to_route_carries_attributes() {
        let rec = record(json!({
            "network": "10.1.0.0",
            "mask": "255.255.0.0",
            "interface": "Wireguard0",
            "comment": "vpn",
            "auto": "true",
            "reject": 1
        }));
        let route = Route::try_from(&rec).unwrap();
        assert_eq!(route.destination.to_string(), "10.1.0.0/16");
        assert_eq!(route.interface, "Wireguard0");
        assert_eq!(route.comment, "vpn");
        assert!(route.auto);
        assert!(route.reject);
    }

    #[test]
    fn ipv6_record_names_its_fields() {
        let records = vec![
            record(json!({ "host": "1.1.1.1" })),
            record(json!({ "host": "2001:db8::1" })),
        ];
        match to_domain_routes(&records) {
            Err(CoreError::UnsupportedDestination { host, .. }) => assert_eq!(host, "2001:db8::1"),
            other => panic!("expected UnsupportedDestination, got: {other:?}"),
        }
    }

    #[test]
    fn address_route_is_sent_as_host() {
        let route = Route {
            destination: Destination::normalize("8.8.8.8").unwrap(),
            comment: String::new(),
            gateway: "10.0.0.1".into(),
            interface: String::new(),
            auto: false,
            reject: false,
        };
        let value = serde_json::to_value(RouteRecord::from(&route)).unwrap();
        assert_eq!(
            value,
            json!({ "host": "8.8.8.8", "comment": "", "gateway": "10.0.0.1", "auto": false })
        );
    }

    #[test]
    fn network_route_is_sent_as_network_and_mask() {
        let route = Route {
            destination: Destination::normalize("192.168.0.0/24").unwrap(),
            comment: "lan".into(),
            gateway: String::new(),
            interface: "Wireguard0".into(),
            auto: true,
            reject: true,
        };
        let value = serde_json::to_value(RouteRecord::from(&route)).unwrap();
        assert_eq!(
            value,
            json!({
                "network": "192.168.0.0",
                "mask": "255.255.255.0",
                "comment": "lan",
                "interface": "Wireguard0",
                "auto": true,
                "reject": true
            })
        );
    }
}
