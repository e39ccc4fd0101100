// ── Route file projection ──
//
// Two-way mapping between flat routes and the grouped route file, plus
// reading and writing the file itself.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::CoreError;
use crate::model::route::RouteAttributes;
use crate::model::{Destination, Route, RouteGroup, RoutesFile};

/// Group routes sharing identical attributes.
///
/// Groups appear in first-seen order and hosts keep encounter order.
pub fn group_routes(routes: &[Route]) -> RoutesFile {
    let mut groups: IndexMap<RouteAttributes, Vec<String>> = IndexMap::new();
    for route in routes {
        groups
            .entry(route.attributes())
            .or_default()
            .push(route.destination.to_string());
    }

    RoutesFile {
        routes: groups
            .into_iter()
            .map(|(attrs, hosts)| RouteGroup {
                comment: attrs.comment,
                gateway: attrs.gateway,
                interface: attrs.interface,
                auto: attrs.auto,
                reject: attrs.reject,
                hosts,
                domains: Vec::new(),
            })
            .collect(),
    }
}

/// Expand every group into one route per host.
///
/// Groups without hosts are skipped. Every other group must name exactly
/// one of gateway or interface, and every host must be IPv4 or IPv4 CIDR.
pub fn flatten_groups(file: &RoutesFile) -> Result<Vec<Route>, CoreError> {
    let mut routes = Vec::with_capacity(file.host_count());
    for (index, group) in file.routes.iter().enumerate() {
        if group.hosts.is_empty() {
            continue;
        }
        if !group.has_single_target() {
            return Err(CoreError::GroupTarget {
                group: group.label(index),
            });
        }
        for host in &group.hosts {
            let destination =
                Destination::normalize(host).map_err(|e| CoreError::InvalidHost {
                    group: group.label(index),
                    host: host.clone(),
                    reason: e.to_string(),
                })?;
            routes.push(Route {
                destination,
                comment: group.comment.clone(),
                gateway: group.gateway.clone(),
                interface: group.interface.clone(),
                auto: group.auto,
                reject: group.reject,
            });
        }
    }
    Ok(routes)
}

// ── File I/O ─────────────────────────────────────────────────────────

/// Read a route file. A file that does not exist reads as empty.
pub fn load_routes_file(path: &Path) -> Result<RoutesFile, CoreError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "route file not found, starting empty");
            return Ok(RoutesFile::default());
        }
        Err(source) => {
            return Err(CoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if text.trim().is_empty() {
        return Ok(RoutesFile::default());
    }
    serde_yaml::from_str(&text).map_err(|source| CoreError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a route file, creating parent directories as needed.
pub fn save_routes_file(path: &Path, file: &RoutesFile) -> Result<(), CoreError> {
    let io_err = |source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let yaml = serde_yaml::to_string(file).map_err(|source| CoreError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, yaml).map_err(io_err)?;
    debug!(path = %path.display(), groups = file.routes.len(), "route file written");
    Ok(())
}
