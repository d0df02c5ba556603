//! Configuration for the monitor loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Monitor loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Capacity of the event broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl MonitorConfig {
    /// Inter-poll delay as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}

fn default_event_buffer() -> usize {
    1024
}
