// ── Domain resolution ──
//
// Resolves the `domains` of each route group to IPv4 addresses and merges
// them into the group's hosts. Lookups run one at a time, each bounded by
// `LOOKUP_TIMEOUT`. Results are never cached between runs.

use std::collections::HashSet;
use std::future::Future;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tracing::debug;

use crate::error::CoreError;
use crate::model::RoutesFile;

/// Upper bound for a single DNS lookup.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Name resolution backend.
pub trait DomainLookup {
    fn lookup(&self, domain: &str) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send;
}

/// Resolver backed by the operating system (`getaddrinfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl DomainLookup for SystemResolver {
    fn lookup(&self, domain: &str) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send {
        let domain = domain.to_owned();
        async move {
            let addrs = tokio::net::lookup_host((domain.as_str(), 0)).await?;
            Ok(addrs.map(|sa| sa.ip()).collect())
        }
    }
}

/// What a resolution pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Groups that had at least one domain.
    pub groups: usize,
    /// Distinct domains looked up.
    pub domains: usize,
    /// Addresses appended to host lists.
    pub ips_added: usize,
}

/// Resolve every group's domains in place.
///
/// Hosts are trimmed, blank entries dropped and duplicates removed before
/// new addresses are appended. Already present addresses are not re-added,
/// so running this twice only reports genuinely new addresses.
pub async fn resolve_domains<L: DomainLookup>(
    file: &mut RoutesFile,
    resolver: &L,
) -> Result<ResolveSummary, CoreError> {
    let mut summary = ResolveSummary::default();

    for (index, group) in file.routes.iter_mut().enumerate() {
        if group.domains.is_empty() {
            continue;
        }
        let label = group.label(index);
        if !group.has_single_target() {
            return Err(CoreError::GroupTarget { group: label });
        }
        summary.groups += 1;

        let mut seen_hosts = HashSet::new();
        let mut hosts = Vec::with_capacity(group.hosts.len());
        for host in group.hosts.iter().map(|h| h.trim()) {
            if !host.is_empty() && seen_hosts.insert(host.to_owned()) {
                hosts.push(host.to_owned());
            }
        }

        let mut seen_domains = HashSet::new();
        for domain in group.domains.iter().map(|d| d.trim()) {
            if domain.is_empty() {
                return Err(CoreError::EmptyDomain { group: label });
            }
            if !seen_domains.insert(domain) {
                continue;
            }
            summary.domains += 1;

            let resolve_err = |reason: String| CoreError::Resolve {
                group: label.clone(),
                domain: domain.to_owned(),
                reason,
            };
            let ips = lookup_ipv4(resolver, domain).await.map_err(resolve_err)?;
            if ips.is_empty() {
                return Err(resolve_err("no IPv4 records found".into()));
            }
            debug!(domain, count = ips.len(), "resolved domain");

            for ip in ips {
                let ip = ip.to_string();
                if seen_hosts.insert(ip.clone()) {
                    hosts.push(ip);
                    summary.ips_added += 1;
                }
            }
        }

        group.hosts = hosts;
    }

    Ok(summary)
}

/// Distinct IPv4 addresses for one domain, in resolver order.
async fn lookup_ipv4<L: DomainLookup>(resolver: &L, domain: &str) -> Result<Vec<Ipv4Addr>, String> {
    if let Ok(ip) = domain.parse::<IpAddr>() {
        return match ip {
            IpAddr::V4(v4) => Ok(vec![v4]),
            IpAddr::V6(_) => Err("IPv6 is not supported".into()),
        };
    }

    let addrs = tokio::time::timeout(LOOKUP_TIMEOUT, resolver.lookup(domain))
        .await
        .map_err(|_| format!("lookup timed out after {}s", LOOKUP_TIMEOUT.as_secs()))?
        .map_err(|e| e.to_string())?;

    let mut ips: Vec<Ipv4Addr> = Vec::new();
    for addr in addrs {
        if let IpAddr::V4(v4) = addr {
            if !ips.contains(&v4) {
                ips.push(v4);
            }
        }
    }
    Ok(ips)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::RouteGroup;

    /// Table-driven resolver that records every lookup.
    #[derive(Default)]
    struct StubResolver {
        answers: HashMap<&'static str, Vec<IpAddr>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubResolver {
        fn with(mut self, domain: &'static str, ips: &[&str]) -> Self {
            self.answers
                .insert(domain, ips.iter().map(|ip| ip.parse().unwrap()).collect());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DomainLookup for StubResolver {
        fn lookup(&self, domain: &str) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send {
            self.calls.lock().unwrap().push(domain.to_owned());
            let result = self.answers.get(domain).cloned().ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "no such host")
            });
            async move { result }
        }
    }

    /// Never answers.
    struct HangingResolver;

    impl DomainLookup for HangingResolver {
        fn lookup(&self, _domain: &str) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send {
            std::future::pending()
        }
    }

    fn file(hosts: &[&str], domains: &[&str]) -> RoutesFile {
        RoutesFile {
            routes: vec![RouteGroup {
                comment: "sites".into(),
                interface: "Wireguard0".into(),
                hosts: hosts.iter().map(|h| (*h).to_string()).collect(),
                domains: domains.iter().map(|d| (*d).to_string()).collect(),
                ..RouteGroup::default()
            }],
        }
    }

    #[tokio::test]
    async fn merges_ipv4_answers_and_dedups() {
        let resolver = StubResolver::default().with(
            "example.com",
            &["93.184.216.34", "2606:2800:220:1::", "93.184.216.34", "1.1.1.1"],
        );
        let mut routes = file(&[" 1.1.1.1 ", "", "1.1.1.1"], &["example.com", "example.com"]);

        let summary = resolve_domains(&mut routes, &resolver).await.unwrap();

        assert_eq!(
            summary,
            ResolveSummary {
                groups: 1,
                domains: 1,
                ips_added: 1
            }
        );
        assert_eq!(routes.routes[0].hosts, vec!["1.1.1.1", "93.184.216.34"]);
        assert_eq!(routes.routes[0].domains, vec!["example.com", "example.com"]);
        assert_eq!(resolver.calls(), vec!["example.com"]);
    }

    #[tokio::test]
    async fn second_run_adds_nothing_but_looks_up_again() {
        let resolver = StubResolver::default().with("example.com", &["1.2.3.4"]);
        let mut routes = file(&[], &["example.com"]);

        let first = resolve_domains(&mut routes, &resolver).await.unwrap();
        let second = resolve_domains(&mut routes, &resolver).await.unwrap();

        assert_eq!(first.ips_added, 1);
        assert_eq!(second.ips_added, 0);
        assert_eq!(routes.routes[0].hosts, vec!["1.2.3.4"]);
        assert_eq!(resolver.calls().len(), 2);
    }

    #[tokio::test]
    async fn literal_addresses_skip_dns() {
        let resolver = StubResolver::default();
        let mut routes = file(&[], &["9.9.9.9"]);
        resolve_domains(&mut routes, &resolver).await.unwrap();
        assert_eq!(routes.routes[0].hosts, vec!["9.9.9.9"]);
        assert!(resolver.calls().is_empty());

        let mut v6 = file(&[], &["2001:db8::1"]);
        let err = resolve_domains(&mut v6, &resolver).await.unwrap_err();
        assert!(err.to_string().contains("IPv6 is not supported"), "got: {err}");
    }

    #[tokio::test]
    async fn failures_name_group_and_domain() {
        let resolver = StubResolver::default().with("v6only.example", &["2001:db8::1"]);

        let mut missing = file(&[], &["nx.example"]);
        match resolve_domains(&mut missing, &resolver).await {
            Err(CoreError::Resolve { group, domain, .. }) => {
                assert_eq!(group, "\"sites\"");
                assert_eq!(domain, "nx.example");
            }
            other => panic!("expected Resolve error, got: {other:?}"),
        }

        let mut v6only = file(&[], &["v6only.example"]);
        let err = resolve_domains(&mut v6only, &resolver).await.unwrap_err();
        assert!(err.to_string().contains("no IPv4 records found"), "got: {err}");
    }

    #[tokio::test]
    async fn blank_domain_and_bad_target_are_rejected() {
        let resolver = StubResolver::default();

        let mut blank = file(&[], &["  "]);
        let err = resolve_domains(&mut blank, &resolver).await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyDomain { .. }), "got: {err:?}");

        let mut both = file(&[], &["example.com"]);
        both.routes[0].gateway = "10.0.0.1".into();
        let err = resolve_domains(&mut both, &resolver).await.unwrap_err();
        assert!(matches!(err, CoreError::GroupTarget { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn groups_without_domains_are_untouched() {
        let resolver = StubResolver::default();
        let mut routes = file(&[" 1.1.1.1", "1.1.1.1"], &[]);
        let summary = resolve_domains(&mut routes, &resolver).await.unwrap();
        assert_eq!(summary, ResolveSummary::default());
        assert_eq!(routes.routes[0].hosts, vec![" 1.1.1.1", "1.1.1.1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_lookup_times_out() {
        let mut routes = file(&[], &["slow.example"]);
        let err = resolve_domains(&mut routes, &HangingResolver).await.unwrap_err();
        assert!(err.to_string().contains("timed out"), "got: {err}");
    }
}
