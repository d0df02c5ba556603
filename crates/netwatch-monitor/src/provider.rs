//! Snapshot provider contract.
//!
//! The monitor core never touches platform APIs itself; it depends on a
//! [`SnapshotProvider`] implemented externally (the daemon ships one built on
//! interface enumeration and an SSID scan). Both calls must be cheap enough
//! to run at the configured polling cadence and safe to call repeatedly.

use std::collections::BTreeSet;

use async_trait::async_trait;
use netwatch_types::ConnectionRecord;

use crate::error::ProviderResult;

/// Source of raw network-state data.
///
/// The two calls fail independently: an SSID-list failure must not block
/// connection listing and vice versa. Timeouts are the provider's
/// responsibility; the monitor treats a failed call as an empty portion of
/// the snapshot and carries on.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// SSIDs currently visible, duplicates collapsed.
    async fn wifi_networks(&self) -> ProviderResult<BTreeSet<String>>;

    /// Active local addresses, in interface enumeration order. Loopback
    /// addresses are never included.
    async fn connections(&self) -> ProviderResult<Vec<ConnectionRecord>>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedProvider;

#[cfg(any(test, feature = "test-utils"))]
mod scripted {
    use std::collections::{BTreeSet, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use netwatch_types::ConnectionRecord;

    use crate::error::{ProviderError, ProviderResult};
    use crate::provider::SnapshotProvider;

    /// One scripted poll outcome.
    type WifiStep = Result<Vec<&'static str>, ProviderError>;
    type ConnStep = Result<Vec<(&'static str, &'static str)>, ProviderError>;

    /// Provider that replays a fixed sequence of poll results.
    ///
    /// Each call pops the next scripted step; once a script is exhausted the
    /// last step is repeated. Used by monitor tests and available to
    /// downstream crates via the `test-utils` feature.
    #[derive(Default)]
    pub struct ScriptedProvider {
        wifi: Mutex<VecDeque<WifiStep>>,
        connections: Mutex<VecDeque<ConnStep>>,
        last_wifi: Mutex<Option<WifiStep>>,
        last_connections: Mutex<Option<ConnStep>>,
    }

    impl ScriptedProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue an SSID listing result.
        pub fn push_wifi(&self, step: WifiStep) {
            self.wifi.lock().unwrap().push_back(step);
        }

        /// Queue a connection listing result.
        pub fn push_connections(&self, step: ConnStep) {
            self.connections.lock().unwrap().push_back(step);
        }

        fn clone_step<T: Clone>(step: &Result<T, ProviderError>) -> Result<T, ProviderError> {
            match step {
                Ok(v) => Ok(v.clone()),
                Err(ProviderError::PermissionDenied(m)) => {
                    Err(ProviderError::PermissionDenied(m.clone()))
                }
                Err(ProviderError::Unavailable(m)) => Err(ProviderError::Unavailable(m.clone())),
            }
        }
    }

    #[async_trait]
    impl SnapshotProvider for ScriptedProvider {
        async fn wifi_networks(&self) -> ProviderResult<BTreeSet<String>> {
            let step = {
                let mut queue = self.wifi.lock().unwrap();
                let mut last = self.last_wifi.lock().unwrap();
                if let Some(step) = queue.pop_front() {
                    *last = Some(Self::clone_step(&step));
                    step
                } else {
                    last.as_ref()
                        .map(Self::clone_step)
                        .unwrap_or_else(|| Ok(Vec::new()))
                }
            };
            step.map(|ssids| ssids.into_iter().map(String::from).collect())
        }

        async fn connections(&self) -> ProviderResult<Vec<ConnectionRecord>> {
            let step = {
                let mut queue = self.connections.lock().unwrap();
                let mut last = self.last_connections.lock().unwrap();
                if let Some(step) = queue.pop_front() {
                    *last = Some(Self::clone_step(&step));
                    step
                } else {
                    last.as_ref()
                        .map(Self::clone_step)
                        .unwrap_or_else(|| Ok(Vec::new()))
                }
            };
            step.map(|records| {
                records
                    .into_iter()
                    .map(|(address, interface)| ConnectionRecord::new(address, interface))
                    .collect()
            })
        }
    }
}
