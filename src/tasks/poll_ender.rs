use crate::store::PollStore;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

pub async fn check_expired_polls_task(store: Arc<PollStore>, period: Duration) {
    info!("Starting background task to check for expired polls...");
    let mut interval = interval(period);

    loop {
        interval.tick().await; // Wait for the next interval tick
        let now = Utc::now();
        debug!("Checking for expired polls at {}", now.to_rfc3339());
        close_expired_polls(&store, now).await;
    }
}

/// Ends every active poll whose end time is before `now`; returns how many were ended.
pub async fn close_expired_polls(store: &PollStore, now: DateTime<Utc>) -> usize {
    let expired = store.get_expired_polls(now).await;
    if expired.is_empty() {
        return 0;
    }

    info!("Found {} expired poll(s).", expired.len());
    let mut closed = 0;
    for poll_id in expired {
        match store.end_poll(&poll_id).await {
            Ok(results) => {
                info!("Closed expired poll {}: {}", poll_id, results.winner);
                closed += 1;
            }
            Err(e) => error!("Error closing expired poll {}: {}", poll_id, e),
        }
    }
    closed
}
