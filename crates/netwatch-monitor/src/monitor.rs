//! Network monitor for continuous observation of local network presence.
//!
//! The NetworkMonitor polls a snapshot provider on a fixed interval, diffs
//! the result against the previous poll, and raises alerts for newly
//! observed connection addresses.

use std::collections::BTreeSet;
use std::sync::Arc;

use netwatch_types::{Alert, ConnectionRecord, NetworkSnapshot};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

use crate::alerts::{alerts_for, AlertLog, UnboundedAlertLog};
use crate::config::MonitorConfig;
use crate::diff::new_connections;
use crate::provider::SnapshotProvider;

/// Events emitted by the network monitor.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A previously unseen connection address was observed.
    AlertRaised(Alert),

    /// A poll cycle completed and the published state was replaced.
    CycleCompleted {
        cycle: u64,
        new_connections: usize,
    },

    /// Both provider calls failed; the cycle was skipped. Only the skipped
    /// counter in the published state moved.
    CycleSkipped { cycle: u64 },
}

/// Composite state published to presenters.
///
/// Replaced wholesale on every completed cycle via a watch channel, so a
/// reader on another task never observes a partially updated snapshot. A
/// skipped cycle bumps only the skipped counter; the snapshot and alert
/// projection stay untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorState {
    /// Capture from the last completed poll.
    pub snapshot: NetworkSnapshot,

    /// Full alert-log projection, oldest first.
    pub alerts: Vec<Alert>,

    /// Number of completed poll cycles.
    pub completed_cycles: u64,

    /// Number of skipped poll cycles (both provider calls failed).
    pub skipped_cycles: u64,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            snapshot: NetworkSnapshot::empty(),
            alerts: Vec::new(),
            completed_cycles: 0,
            skipped_cycles: 0,
        }
    }
}

/// Outcome of a single poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The cycle ran; `new_alerts` alerts were appended.
    Completed { new_alerts: usize },

    /// Both provider calls failed; nothing changed.
    Skipped,
}

/// Continuously observes network state and alerts on unseen addresses.
///
/// The monitor is the only writer of its state: `run` consumes the monitor,
/// and readers attach through [`NetworkMonitor::state`] (pull) or
/// [`NetworkMonitor::subscribe`] (push) before it is spawned.
pub struct NetworkMonitor {
    /// Configuration.
    config: MonitorConfig,

    /// Source of raw network-state data.
    provider: Arc<dyn SnapshotProvider>,

    /// Accumulating alert log.
    log: Box<dyn AlertLog>,

    /// Connections from the last completed poll. Empty at start; replaced
    /// wholesale, never merged.
    previous: Vec<ConnectionRecord>,

    /// Completed poll cycles.
    completed_cycles: u64,

    /// Skipped poll cycles (both provider calls failed).
    skipped_cycles: u64,

    /// Composite state publisher.
    state_tx: watch::Sender<MonitorState>,

    /// Event broadcaster.
    event_tx: broadcast::Sender<MonitorEvent>,
}

impl NetworkMonitor {
    /// Create a monitor with the default unbounded alert log.
    pub fn new(config: MonitorConfig, provider: Arc<dyn SnapshotProvider>) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_buffer.max(1));
        let (state_tx, _) = watch::channel(MonitorState::default());

        Self {
            config,
            provider,
            log: Box::new(UnboundedAlertLog::new()),
            previous: Vec::new(),
            completed_cycles: 0,
            skipped_cycles: 0,
            state_tx,
            event_tx,
        }
    }

    /// Replace the alert log implementation (e.g. with a bounded one).
    pub fn with_alert_log(mut self, log: Box<dyn AlertLog>) -> Self {
        self.log = log;
        self
    }

    /// Subscribe to monitor events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the published composite state.
    pub fn state(&self) -> watch::Receiver<MonitorState> {
        self.state_tx.subscribe()
    }

    /// Number of alerts currently retained in the log.
    pub fn alert_count(&self) -> usize {
        self.log.len()
    }

    /// Run one poll cycle: acquire, diff, alert, publish.
    ///
    /// Provider calls fail independently. A single failure degrades that
    /// portion of the snapshot to empty; when both fail the cycle is skipped,
    /// the previous connections and the published snapshot and alerts stay
    /// as they were, and only the skipped counter is bumped. State mutation
    /// and the publish happen after the last await, so cancelling this
    /// future at a provider call cannot leave a torn update behind.
    #[instrument(skip(self), fields(cycle = self.completed_cycles + self.skipped_cycles))]
    pub async fn poll_once(&mut self) -> PollOutcome {
        let wifi = self.provider.wifi_networks().await;
        let connections = self.provider.connections().await;

        if wifi.is_err() && connections.is_err() {
            self.skipped_cycles += 1;
            let cycle = self.completed_cycles + self.skipped_cycles;
            warn!(cycle, "both provider calls failed; skipping cycle");
            let skipped = self.skipped_cycles;
            self.state_tx.send_modify(|state| state.skipped_cycles = skipped);
            let _ = self.event_tx.send(MonitorEvent::CycleSkipped { cycle });
            return PollOutcome::Skipped;
        }

        let wifi = wifi.unwrap_or_else(|e| {
            debug!(error = %e, "wifi listing failed; treating as empty");
            BTreeSet::new()
        });
        let connections = connections.unwrap_or_else(|e| {
            debug!(error = %e, "connection listing failed; treating as empty");
            Vec::new()
        });

        let snapshot = NetworkSnapshot::new(wifi, connections);
        let new = new_connections(&self.previous, &snapshot.connections);
        let alerts = alerts_for(&new);

        for alert in &alerts {
            info!(message = %alert.message, "alert raised");
            let _ = self.event_tx.send(MonitorEvent::AlertRaised(alert.clone()));
        }

        self.log.append(alerts);
        self.previous = snapshot.connections.clone();
        self.completed_cycles += 1;
        let cycle = self.completed_cycles + self.skipped_cycles;

        let state = MonitorState {
            snapshot,
            alerts: self.log.snapshot(),
            completed_cycles: self.completed_cycles,
            skipped_cycles: self.skipped_cycles,
        };
        self.state_tx.send_replace(state);

        let _ = self.event_tx.send(MonitorEvent::CycleCompleted {
            cycle,
            new_connections: new.len(),
        });

        PollOutcome::Completed {
            new_alerts: new.len(),
        }
    }

    /// Run the monitor loop until `shutdown` becomes true or its sender is
    /// dropped.
    ///
    /// Shutdown is observed at both suspension points: while awaiting the
    /// provider and during the inter-poll delay. Provider failures are never
    /// fatal to the loop.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.config.poll_interval_secs,
            "starting network monitor"
        );

        loop {
            tokio::select! {
                _ = self.poll_once() => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        info!(
            completed_cycles = self.completed_cycles,
            skipped_cycles = self.skipped_cycles,
            alerts = self.log.len(),
            "network monitor stopped"
        );
    }
}

/// Resolves once the shutdown flag is true or the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::alerts::BoundedAlertLog;
    use crate::error::ProviderError;
    use crate::provider::ScriptedProvider;

    fn monitor_with(provider: ScriptedProvider) -> NetworkMonitor {
        NetworkMonitor::new(MonitorConfig::default(), Arc::new(provider))
    }

    #[tokio::test]
    async fn first_poll_alerts_on_every_connection() {
        let provider = ScriptedProvider::new();
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0"), ("10.0.0.3", "eth0")]));

        let mut monitor = monitor_with(provider);
        let outcome = monitor.poll_once().await;

        assert_eq!(outcome, PollOutcome::Completed { new_alerts: 2 });
        assert_eq!(monitor.alert_count(), 2);
    }

    #[tokio::test]
    async fn identical_repeat_raises_no_alerts() {
        let provider = ScriptedProvider::new();
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));

        let mut monitor = monitor_with(provider);
        monitor.poll_once().await;
        let outcome = monitor.poll_once().await;

        assert_eq!(outcome, PollOutcome::Completed { new_alerts: 0 });
        assert_eq!(monitor.alert_count(), 1);
    }

    #[tokio::test]
    async fn new_address_raises_one_alert() {
        let provider = ScriptedProvider::new();
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0"), ("10.0.0.5", "wlan0")]));

        let mut monitor = monitor_with(provider);
        let mut events = monitor.subscribe();

        monitor.poll_once().await;
        monitor.poll_once().await;

        assert_eq!(monitor.alert_count(), 2);

        // First cycle: one alert plus completion; second cycle: the new
        // address only.
        let mut raised = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let MonitorEvent::AlertRaised(alert) = event {
                raised.push(alert);
            }
        }
        assert_eq!(raised.len(), 2);
        assert!(raised[1].message.contains("10.0.0.5"));
    }

    #[tokio::test]
    async fn wifi_failure_does_not_block_connection_diffing() {
        let provider = ScriptedProvider::new();
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));
        provider.push_wifi(Err(ProviderError::PermissionDenied("location".into())));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0"), ("10.0.0.5", "wlan0")]));

        let mut monitor = monitor_with(provider);
        let state = monitor.state();

        monitor.poll_once().await;
        assert_eq!(state.borrow().snapshot.wifi_networks.len(), 1);

        let outcome = monitor.poll_once().await;
        assert_eq!(outcome, PollOutcome::Completed { new_alerts: 1 });

        // The wifi projection becomes empty rather than stale.
        let current = state.borrow().clone();
        assert!(current.snapshot.wifi_networks.is_empty());
        assert_eq!(current.snapshot.connections.len(), 2);
        assert_eq!(current.alerts.len(), 2);
    }

    #[tokio::test]
    async fn total_failure_skips_cycle_and_preserves_state() {
        let provider = ScriptedProvider::new();
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));
        provider.push_wifi(Err(ProviderError::Unavailable("scan failed".into())));
        provider.push_connections(Err(ProviderError::Unavailable("no interfaces".into())));
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));

        let mut monitor = monitor_with(provider);
        let state = monitor.state();

        monitor.poll_once().await;
        let before = state.borrow().clone();

        let outcome = monitor.poll_once().await;
        assert_eq!(outcome, PollOutcome::Skipped);

        // Only the skipped counter moves; the snapshot and alert projection
        // survive the outage untouched.
        let after = state.borrow().clone();
        assert_eq!(after.snapshot, before.snapshot);
        assert_eq!(after.alerts, before.alerts);
        assert_eq!(after.completed_cycles, before.completed_cycles);
        assert_eq!(after.skipped_cycles, 1);
        assert_eq!(monitor.alert_count(), 1);

        // The address survived the outage: previous connections were not
        // cleared, so it does not re-alert.
        let outcome = monitor.poll_once().await;
        assert_eq!(outcome, PollOutcome::Completed { new_alerts: 0 });
    }

    #[tokio::test]
    async fn connections_failure_alone_degrades_to_empty() {
        let provider = ScriptedProvider::new();
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Err(ProviderError::Unavailable("enumeration failed".into())));

        let mut monitor = monitor_with(provider);
        let state = monitor.state();

        monitor.poll_once().await;
        let outcome = monitor.poll_once().await;

        // The connection portion is empty, not stale; diffing against it
        // raises nothing.
        assert_eq!(outcome, PollOutcome::Completed { new_alerts: 0 });
        assert!(state.borrow().snapshot.connections.is_empty());
        assert_eq!(monitor.alert_count(), 1);
    }

    #[tokio::test]
    async fn published_state_carries_latest_snapshot() {
        let provider = ScriptedProvider::new();
        provider.push_wifi(Ok(vec!["home", "office"]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));

        let mut monitor = monitor_with(provider);
        let state = monitor.state();

        monitor.poll_once().await;

        let current = state.borrow().clone();
        assert_eq!(current.snapshot.wifi_networks.len(), 2);
        assert!(current.snapshot.wifi_networks.contains("home"));
        assert_eq!(current.snapshot.connections.len(), 1);
        assert_eq!(current.snapshot.connections[0].address, "10.0.0.2");
        // The snapshot was assembled after its records were observed.
        assert!(current.snapshot.captured_at >= current.snapshot.connections[0].observed_at);
    }

    #[tokio::test]
    async fn cycle_numbering_counts_completed_and_skipped_alike() {
        let provider = ScriptedProvider::new();
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));
        provider.push_wifi(Err(ProviderError::Unavailable("scan failed".into())));
        provider.push_connections(Err(ProviderError::Unavailable("no interfaces".into())));
        provider.push_wifi(Ok(vec!["home"]));
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));

        let mut monitor = monitor_with(provider);
        let mut events = monitor.subscribe();
        let state = monitor.state();

        monitor.poll_once().await;
        monitor.poll_once().await;
        monitor.poll_once().await;

        // One shared sequence numbers every cycle regardless of outcome.
        let mut cycles = Vec::new();
        while let Ok(event) = events.try_recv() {
            match event {
                MonitorEvent::CycleCompleted { cycle, .. } => cycles.push(cycle),
                MonitorEvent::CycleSkipped { cycle } => cycles.push(cycle),
                MonitorEvent::AlertRaised(_) => {}
            }
        }
        assert_eq!(cycles, vec![1, 2, 3]);

        let current = state.borrow().clone();
        assert_eq!(current.completed_cycles, 2);
        assert_eq!(current.skipped_cycles, 1);
    }

    #[tokio::test]
    async fn alert_log_grows_monotonically_across_cycles() {
        let provider = ScriptedProvider::new();
        provider.push_connections(Ok(vec![("10.0.0.1", "wlan0")]));
        provider.push_connections(Ok(vec![("10.0.0.1", "wlan0"), ("10.0.0.2", "wlan0")]));
        provider.push_connections(Ok(vec![("10.0.0.3", "wlan0")]));

        let mut monitor = monitor_with(provider);

        let mut expected = 0;
        for new in [1, 1, 1] {
            let outcome = monitor.poll_once().await;
            expected += new;
            assert_eq!(outcome, PollOutcome::Completed { new_alerts: new });
            assert_eq!(monitor.alert_count(), expected);
        }
    }

    #[tokio::test]
    async fn bounded_log_substitutes_without_semantic_change() {
        let provider = ScriptedProvider::new();
        provider.push_connections(Ok(vec![("10.0.0.1", "wlan0"), ("10.0.0.2", "wlan0")]));

        let mut monitor = monitor_with(provider).with_alert_log(Box::new(BoundedAlertLog::new(1)));
        let outcome = monitor.poll_once().await;

        assert_eq!(outcome, PollOutcome::Completed { new_alerts: 2 });
        assert_eq!(monitor.alert_count(), 1);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let provider = ScriptedProvider::new();
        provider.push_connections(Ok(vec![("10.0.0.2", "wlan0")]));

        let config = MonitorConfig {
            poll_interval_secs: 3600,
            ..MonitorConfig::default()
        };
        let monitor = NetworkMonitor::new(config, Arc::new(provider));
        let state = monitor.state();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(monitor.run(shutdown_rx));

        // Wait for the first cycle to publish, then request shutdown while
        // the loop is parked in the inter-poll delay.
        tokio::time::timeout(Duration::from_secs(5), async {
            let mut state = state.clone();
            while state.borrow().completed_cycles == 0 {
                state.changed().await.unwrap();
            }
        })
        .await
        .expect("first cycle never completed");

        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("monitor did not stop on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn dropping_shutdown_sender_stops_the_loop() {
        let provider = ScriptedProvider::new();
        let config = MonitorConfig {
            poll_interval_secs: 3600,
            ..MonitorConfig::default()
        };
        let monitor = NetworkMonitor::new(config, Arc::new(provider));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(monitor.run(shutdown_rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(shutdown_tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("monitor did not stop after sender drop")
            .unwrap();
    }
}
