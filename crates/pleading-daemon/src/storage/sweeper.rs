//! Background eviction of idle sessions

use super::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;

/// Periodically removes expired sessions from a [`SessionStore`].
pub struct SessionSweeper {
    store: Arc<SessionStore>,
    period: Duration,
}

impl SessionSweeper {
    pub fn new(store: Arc<SessionStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// Start sweeping until `shutdown` flips to true or its sender is dropped.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.period);
            tracing::info!(period_secs = self.period.as_secs(), "Session sweeper started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = self.store.sweep_expired().await;
                        let remaining = self.store.len().await;
                        if removed > 0 {
                            tracing::info!(removed, sessions = remaining, "Swept expired sessions");
                        } else {
                            tracing::debug!(sessions = remaining, "No expired sessions");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("Session sweeper stopped");
        })
    }
}
