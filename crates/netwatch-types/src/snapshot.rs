//! Snapshot types describing observed network state.
//!
//! A snapshot is produced on every poll and never mutated afterwards; the
//! monitor replaces its stored state wholesale rather than editing it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One active local network address at capture time.
///
/// For diffing purposes the identity of a connection is its `address` alone;
/// the interface name and timestamp are descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Textual network address (IP literal). Never the loopback address.
    pub address: String,

    /// Name of the owning network interface.
    pub interface: String,

    /// Capture time of the containing snapshot.
    pub observed_at: DateTime<Utc>,
}

impl ConnectionRecord {
    /// Create a connection record observed now.
    pub fn new(address: impl Into<String>, interface: impl Into<String>) -> Self {
        Self::observed_at(address, interface, Utc::now())
    }

    /// Create a connection record with an explicit capture time.
    pub fn observed_at(
        address: impl Into<String>,
        interface: impl Into<String>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            address: address.into(),
            interface: interface.into(),
            observed_at,
        }
    }
}

impl std::fmt::Display for ConnectionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}", self.address, self.interface)
    }
}

/// Immutable description of network state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// SSIDs currently visible. Duplicates collapsed, unordered.
    pub wifi_networks: BTreeSet<String>,

    /// Active local addresses at capture time, in interface enumeration order.
    pub connections: Vec<ConnectionRecord>,

    /// When this snapshot was captured.
    pub captured_at: DateTime<Utc>,
}

impl NetworkSnapshot {
    /// Create a snapshot captured now.
    pub fn new(wifi_networks: BTreeSet<String>, connections: Vec<ConnectionRecord>) -> Self {
        Self {
            wifi_networks,
            connections,
            captured_at: Utc::now(),
        }
    }

    /// Snapshot with no visible networks and no connections.
    pub fn empty() -> Self {
        Self::new(BTreeSet::new(), Vec::new())
    }
}
