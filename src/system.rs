//! Runtime environment diagnostics.
//!
//! Detects whether the process runs inside a container (Docker or
//! Kubernetes) and collects a host snapshot, so startup logs identify
//! the deployment environment at a glance.

use std::path::Path;

use serde::Serialize;
use sysinfo::System;

// ─── Types ───────────────────────────────────────────────────────────────────

/// Deployment environment snapshot logged at startup.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeInfo {
    pub is_container: bool,
    /// "docker" or "kubernetes" when containerized.
    pub container_kind: Option<String>,
    /// Container id parsed from the init cpuset, when available.
    pub container_id: Option<String>,
    pub hostname: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
}

// ─── Detection ───────────────────────────────────────────────────────────────

/// Check whether the process is running inside a container.
///
/// Three checks, first hit wins:
/// 1. `/.dockerenv` exists
/// 2. `/proc/1/cgroup` mentions docker
/// 3. `KUBERNETES_SERVICE_HOST` or `DOCKER_CONTAINER` is set
pub fn is_running_in_container() -> bool {
    if Path::new("/.dockerenv").exists() {
        tracing::debug!("container detected via /.dockerenv");
        return true;
    }

    if let Ok(cgroup) = std::fs::read_to_string("/proc/1/cgroup") {
        if cgroup_mentions_docker(&cgroup) {
            tracing::debug!("container detected via /proc/1/cgroup");
            return true;
        }
    }

    if std::env::var_os("KUBERNETES_SERVICE_HOST").is_some()
        || std::env::var_os("DOCKER_CONTAINER").is_some()
    {
        tracing::debug!("container detected via environment variables");
        return true;
    }

    false
}

/// Collect the runtime environment snapshot.
pub fn runtime_info() -> RuntimeInfo {
    let is_container = is_running_in_container();
    let container_kind = if !is_container {
        None
    } else if std::env::var_os("KUBERNETES_SERVICE_HOST").is_some() {
        Some("kubernetes".to_string())
    } else {
        Some("docker".to_string())
    };

    let container_id = std::fs::read_to_string("/proc/1/cpuset")
        .ok()
        .and_then(|cpuset| parse_container_id(&cpuset));

    RuntimeInfo {
        is_container,
        container_kind,
        container_id,
        hostname: System::host_name(),
        os_name: System::name(),
        os_version: System::os_version(),
    }
}

/// Log the runtime snapshot once at startup.
pub fn log_runtime_info() {
    let info = runtime_info();
    tracing::info!(
        is_container = info.is_container,
        container_kind = info.container_kind.as_deref().unwrap_or("none"),
        hostname = info.hostname.as_deref().unwrap_or("unknown"),
        os = info.os_name.as_deref().unwrap_or("unknown"),
        os_version = info.os_version.as_deref().unwrap_or("unknown"),
        "runtime environment"
    );
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn cgroup_mentions_docker(content: &str) -> bool {
    content.lines().any(|line| line.contains("docker"))
}

/// Parse the container id from an init cpuset path like
/// `/docker/3f02…`; `None` for non-docker cpusets.
fn parse_container_id(cpuset: &str) -> Option<String> {
    let cpuset = cpuset.trim();
    if !cpuset.contains("docker") {
        return None;
    }
    cpuset
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cgroup_scan_matches_docker_lines() {
        let cgroup = "12:pids:/docker/3f02\n11:memory:/docker/3f02\n";
        assert!(cgroup_mentions_docker(cgroup));

        let host = "12:pids:/init.scope\n11:memory:/user.slice\n";
        assert!(!cgroup_mentions_docker(host));
    }

    #[test]
    fn test_container_id_from_docker_cpuset() {
        assert_eq!(
            parse_container_id("/docker/3f02a6ed9b74\n"),
            Some("3f02a6ed9b74".to_string())
        );
    }

    #[test]
    fn test_container_id_absent_outside_docker() {
        assert_eq!(parse_container_id("/\n"), None);
        assert_eq!(parse_container_id("/user.slice"), None);
    }
}
