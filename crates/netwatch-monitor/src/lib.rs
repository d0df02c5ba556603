//! # Netwatch Monitor - Observation-Diff-Alert Loop
//!
//! This crate implements the core of Netwatch: periodic acquisition of
//! network state, comparison against the last known state, and generation of
//! alert events for newly observed connection addresses.
//!
//! ## Overview
//!
//! The monitor wakes on a fixed interval, asks a [`SnapshotProvider`] for the
//! visible wireless networks and active local addresses, diffs the
//! connections against the previous poll by address, appends one alert per
//! genuinely new address to the alert log, and publishes the whole updated
//! state as a single composite value.
//!
//! ## Key Components
//!
//! - [`NetworkMonitor`]: the polling loop and single writer of shared state
//! - [`SnapshotProvider`]: contract for the external source of raw data
//! - [`diff::new_connections`]: pure diff over connection sequences
//! - [`AlertLog`]: append-only alert accumulation (unbounded by default)
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use netwatch_monitor::{MonitorConfig, NetworkMonitor, SnapshotProvider};
//! use tokio::sync::watch;
//!
//! # async fn example(provider: Arc<dyn SnapshotProvider>) {
//! let monitor = NetworkMonitor::new(MonitorConfig::default(), provider);
//!
//! // Attach readers before spawning; the monitor is the only writer.
//! let state = monitor.state();
//! let events = monitor.subscribe();
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! tokio::spawn(monitor.run(shutdown_rx));
//! # }
//! ```
//!
//! ## Failure Posture
//!
//! Provider failures are never fatal and never surface to presenters as a
//! fault state. A single failed call degrades that portion of the snapshot
//! to empty; a cycle where both calls fail is skipped outright, leaving the
//! previous connections and the published snapshot and alerts untouched and
//! bumping only the skipped-cycle counter. The only user-visible effect of
//! an underlying failure is an absence of updates for that cycle.

#![deny(unsafe_code)]

pub mod alerts;
pub mod config;
pub mod diff;
pub mod error;
pub mod monitor;
pub mod provider;

// Re-export main types
pub use alerts::{alerts_for, AlertLog, BoundedAlertLog, UnboundedAlertLog};
pub use config::MonitorConfig;
pub use error::{ProviderError, ProviderResult};
pub use monitor::{MonitorEvent, MonitorState, NetworkMonitor, PollOutcome};
pub use provider::SnapshotProvider;

#[cfg(any(test, feature = "test-utils"))]
pub use provider::ScriptedProvider;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn end_to_end_poll_diff_alert() {
        let provider = ScriptedProvider::new();
        provider.push_wifi(Ok(vec!["home", "office"]));
        provider.push_connections(Ok(vec![("192.168.1.10", "wlan0")]));
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Ok(vec![
            ("192.168.1.10", "wlan0"),
            ("192.168.1.23", "wlan0"),
        ]));

        let mut monitor = NetworkMonitor::new(MonitorConfig::default(), Arc::new(provider));
        let state = monitor.state();

        monitor.poll_once().await;
        monitor.poll_once().await;

        let current = state.borrow().clone();
        assert_eq!(current.completed_cycles, 2);
        assert_eq!(current.snapshot.connections.len(), 2);
        // One alert for the bootstrap address, one for the newcomer.
        assert_eq!(current.alerts.len(), 2);
        assert!(current.alerts[1].message.contains("192.168.1.23"));
    }
}
