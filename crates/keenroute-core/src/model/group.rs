// ── Route file model ──
//
// The on-disk shape of a route file: a list of groups, each sharing routing
// attributes across literal hosts and domains still to be resolved.

use serde::{Deserialize, Deserializer, Serialize};

/// Hosts and domains sharing one set of routing attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGroup {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub gateway: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub interface: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub auto: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub reject: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hosts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
}

impl RouteGroup {
    /// Label used in diagnostics: the quoted comment, or `#n` (1-based).
    pub fn label(&self, index: usize) -> String {
        if self.comment.is_empty() {
            format!("#{}", index + 1)
        } else {
            format!("{:?}", self.comment)
        }
    }

    /// `true` when exactly one of gateway or interface is set.
    pub fn has_single_target(&self) -> bool {
        self.gateway.is_empty() != self.interface.is_empty()
    }
}

/// A whole route file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesFile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes: Vec<RouteGroup>,
}

impl RoutesFile {
    /// Number of literal hosts across every group.
    pub fn host_count(&self) -> usize {
        self.routes.iter().map(|g| g.hosts.len()).sum()
    }

    pub fn has_domains(&self) -> bool {
        self.routes.iter().any(|g| !g.domains.is_empty())
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Treat an explicit `~`/empty YAML value like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_full_group() {
        let yaml = r"
routes:
  - comment: vpn
    interface: Wireguard0
    auto: true
    hosts: [1.1.1.1, 10.0.0.0/8]
    domains: [example.com]
";
        let file: RoutesFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            file.routes,
            vec![RouteGroup {
                comment: "vpn".into(),
                interface: "Wireguard0".into(),
                auto: true,
                hosts: vec!["1.1.1.1".into(), "10.0.0.0/8".into()],
                domains: vec!["example.com".into()],
                ..RouteGroup::default()
            }]
        );
    }

    #[test]
    fn null_and_missing_keys_are_defaults() {
        let yaml = "routes:\n  - gateway: 10.0.0.1\n    hosts:\n    comment: ~\n";
        let file: RoutesFile = serde_yaml::from_str(yaml).unwrap();
        let group = &file.routes[0];
        assert_eq!(group.gateway, "10.0.0.1");
        assert!(group.hosts.is_empty());
        assert!(group.comment.is_empty());

        let empty: RoutesFile = serde_yaml::from_str("routes:\n").unwrap();
        assert!(empty.routes.is_empty());
        let bare: RoutesFile = serde_yaml::from_str("{}").unwrap();
        assert!(bare.routes.is_empty());
    }

    #[test]
    fn serialization_omits_defaults_but_keeps_hosts() {
        let file = RoutesFile {
            routes: vec![RouteGroup {
                gateway: "10.0.0.1".into(),
                ..RouteGroup::default()
            }],
        };
        let yaml = serde_yaml::to_string(&file).unwrap();
        assert_eq!(yaml, "routes:\n- gateway: 10.0.0.1\n  hosts: []\n");
    }

    #[test]
    fn labels_prefer_comment() {
        let named = RouteGroup {
            comment: "office".into(),
            ..RouteGroup::default()
        };
        assert_eq!(named.label(3), "\"office\"");
        assert_eq!(RouteGroup::default().label(0), "#1");
    }

    #[test]
    fn single_target_rule() {
        let mut group = RouteGroup::default();
        assert!(!group.has_single_target());
        group.gateway = "10.0.0.1".into();
        assert!(group.has_single_target());
        group.interface = "Wireguard0".into();
        assert!(!group.has_single_target());
    }
}
