use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shared::sessions::SessionStore;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

pub fn purge_expired_sessions(store: &dyn SessionStore) -> usize {
    let purged = store.purge_expired(Utc::now());

    if purged > 0 {
        info!(
            purged,
            remaining = store.len(),
            "session purge tick"
        );
    } else {
        debug!(remaining = store.len(), "session purge tick found no idle sessions");
    }

    purged
}

/// Runs the purge on a fixed interval until the returned handle is aborted.
pub fn spawn_session_purge(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        // First tick fires immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            purge_expired_sessions(store.as_ref());
        }
    })
}
