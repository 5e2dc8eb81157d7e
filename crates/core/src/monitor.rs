//! Periodic session liveness re-check
//!
//! This only refreshes what the front end shows. The gateway enforces
//! session invalidation on its own when the backend rejects a token.

use crate::session::SessionStore;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Re-reads the session store on a fixed interval
#[derive(Debug, Clone)]
pub struct SessionMonitor {
    session: SessionStore,
    interval: Duration,
}

impl SessionMonitor {
    pub fn new(session: SessionStore, interval: Duration) -> Self {
        Self { session, interval }
    }

    /// Check interval
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the background check.
    ///
    /// The receiver starts with the current state and is notified only when
    /// it changes. The task ends once every receiver has been dropped.
    pub fn spawn(self) -> (watch::Receiver<bool>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(self.session.has_active_session());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    () = tx.closed() => break,
                }

                let active = self.session.has_active_session();
                tx.send_if_modified(|current| {
                    if *current == active {
                        false
                    } else {
                        debug!(active, "Session state changed");
                        *current = active;
                        true
                    }
                });
            }
        });

        (rx, handle)
    }
}
