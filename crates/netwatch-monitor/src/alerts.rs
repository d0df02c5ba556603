//! Alert generation and the append-only alert log.

use std::collections::VecDeque;

use netwatch_types::{Alert, ConnectionRecord};

/// Generate one alert per newly observed connection.
///
/// Deterministic and 1:1; no filtering beyond what the diff engine already
/// produced.
pub fn alerts_for(new_connections: &[ConnectionRecord]) -> Vec<Alert> {
    new_connections.iter().map(Alert::new_connection).collect()
}

/// Accumulating, ordered sequence of alerts.
///
/// The log only grows; entries are never edited or removed. The trait exists
/// so a bounded implementation can be substituted without touching the diff
/// engine or the monitor loop.
pub trait AlertLog: Send {
    /// Append alerts in order.
    fn append(&mut self, alerts: Vec<Alert>);

    /// Current contents, oldest first.
    fn snapshot(&self) -> Vec<Alert>;

    /// Number of retained alerts.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default log: unbounded, monotonically growing for the process lifetime.
///
/// No deduplication, no capping, no expiry.
#[derive(Debug, Default)]
pub struct UnboundedAlertLog {
    alerts: Vec<Alert>,
}

impl UnboundedAlertLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertLog for UnboundedAlertLog {
    fn append(&mut self, alerts: Vec<Alert>) {
        self.alerts.extend(alerts);
    }

    fn snapshot(&self) -> Vec<Alert> {
        self.alerts.clone()
    }

    fn len(&self) -> usize {
        self.alerts.len()
    }
}

/// Ring-buffer log retaining only the most recent alerts.
#[derive(Debug)]
pub struct BoundedAlertLog {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl BoundedAlertLog {
    /// Create a log retaining at most `capacity` alerts.
    pub fn new(capacity: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }
}

impl AlertLog for BoundedAlertLog {
    fn append(&mut self, alerts: Vec<Alert>) {
        for alert in alerts {
            if self.alerts.len() == self.capacity {
                self.alerts.pop_front();
            }
            self.alerts.push_back(alert);
        }
    }

    fn snapshot(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.alerts.len()
    }
}
