//! System snapshot provider.
//!
//! Supplies the monitor with real host data: active interface addresses via
//! `pnet` interface enumeration, and visible SSIDs by shelling out to a
//! terse `nmcli` listing (overridable in config). Everything here sits
//! behind the [`SnapshotProvider`] seam; the monitor core knows nothing of
//! these mechanisms.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::process::Output;

use async_trait::async_trait;
use chrono::Utc;
use netwatch_monitor::{ProviderError, ProviderResult, SnapshotProvider};
use netwatch_types::ConnectionRecord;
use pnet::datalink;
use tracing::debug;

use crate::config::ProviderConfig;

/// Provider backed by the host's interfaces and wireless scan tooling.
pub struct SystemProvider {
    config: ProviderConfig,
}

impl SystemProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    async fn run_wifi_command(&self) -> ProviderResult<Output> {
        let (program, args) = self
            .config
            .wifi_command
            .split_first()
            .ok_or_else(|| ProviderError::Unavailable("empty wifi command".to_string()))?;

        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await?;
        Ok(output)
    }
}

#[async_trait]
impl SnapshotProvider for SystemProvider {
    async fn wifi_networks(&self) -> ProviderResult<BTreeSet<String>> {
        if !self.config.wifi_scan {
            debug!("wifi scan disabled; reporting no visible networks");
            return Ok(BTreeSet::new());
        }

        let output = self.run_wifi_command().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_scan_failure(&stderr));
        }

        Ok(parse_ssid_list(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn connections(&self) -> ProviderResult<Vec<ConnectionRecord>> {
        let include_ipv6 = self.config.include_ipv6;

        // Interface enumeration is a handful of ioctls, but it is still
        // blocking work and does not belong on the runtime threads.
        tokio::task::spawn_blocking(move || enumerate_connections(include_ipv6))
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }
}

/// List active, non-loopback addresses in interface enumeration order.
fn enumerate_connections(include_ipv6: bool) -> Vec<ConnectionRecord> {
    let now = Utc::now();
    let mut connections = Vec::new();

    for interface in datalink::interfaces() {
        if !interface.is_up() || interface.is_loopback() {
            continue;
        }
        for network in &interface.ips {
            let address = network.ip();
            if address.is_loopback() {
                continue;
            }
            if !include_ipv6 && matches!(address, IpAddr::V6(_)) {
                continue;
            }
            connections.push(ConnectionRecord::observed_at(
                address.to_string(),
                interface.name.clone(),
                now,
            ));
        }
    }

    connections
}

/// Parse terse SSID output: one SSID per line, blanks (hidden networks)
/// dropped, duplicates collapsed.
fn parse_ssid_list(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "--")
        .map(String::from)
        .collect()
}

fn classify_scan_failure(stderr: &str) -> ProviderError {
    let lowered = stderr.to_lowercase();
    if lowered.contains("not authorized") || lowered.contains("permission") {
        ProviderError::PermissionDenied(stderr.to_string())
    } else {
        ProviderError::Unavailable(stderr.to_string())
    }
}
