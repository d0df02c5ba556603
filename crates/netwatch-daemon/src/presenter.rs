//! Logging presenter.
//!
//! Fills the presenter role from the monitor's point of view: consumes the
//! event stream and the state watch and renders through `tracing`. Alerts
//! surface at warn level; cycle activity stays at debug. The presenter only
//! reads; the monitor remains the single writer of shared state.

use netwatch_monitor::{MonitorEvent, MonitorState};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

/// Presenter that renders monitor activity to the log.
pub struct LogPresenter {
    events: broadcast::Receiver<MonitorEvent>,
    state: watch::Receiver<MonitorState>,
}

impl LogPresenter {
    pub fn new(
        events: broadcast::Receiver<MonitorEvent>,
        state: watch::Receiver<MonitorState>,
    ) -> Self {
        Self { events, state }
    }

    /// Consume events until the monitor goes away.
    pub async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(MonitorEvent::AlertRaised(alert)) => {
                    warn!(message = %alert.message, raised_at = %alert.raised_at, "security alert");
                }
                Ok(MonitorEvent::CycleCompleted {
                    cycle,
                    new_connections,
                }) => {
                    let state = self.state.borrow().clone();
                    debug!(
                        cycle,
                        new_connections,
                        wifi_networks = state.snapshot.wifi_networks.len(),
                        connections = state.snapshot.connections.len(),
                        alerts = state.alerts.len(),
                        "cycle completed"
                    );
                }
                Ok(MonitorEvent::CycleSkipped { cycle }) => {
                    debug!(cycle, "cycle skipped");
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "presenter lagged behind event stream");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
