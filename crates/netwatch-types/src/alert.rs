//! Alert records for newly observed connections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::snapshot::ConnectionRecord;

/// A generated record describing one newly observed connection.
///
/// Alerts are immutable once created; the alert log only appends, never edits
/// or removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Human-readable description referencing the triggering connection.
    pub message: String,

    /// When this alert was created.
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    /// Create an alert for a newly observed connection.
    ///
    /// The message template is fixed; tests assert that the triggering
    /// address and interface name are embedded exactly.
    pub fn new_connection(connection: &ConnectionRecord) -> Self {
        Self {
            message: format!(
                "new connection detected: {} on {}",
                connection.address, connection.interface
            ),
            raised_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
