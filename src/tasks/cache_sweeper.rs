use crate::source::cache::CachedCountSource;
use crate::source::CountSource;
use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Periodically drops stale entries from `cache`. Runs until the task is
/// aborted.
pub async fn run<S: CountSource>(cache: Arc<CachedCountSource<S>>, every: Duration) {
    info!("Starting cache sweeper, checking every {:?}", every);
    let mut interval = interval(every);

    loop {
        interval.tick().await; // Wait for the next interval tick
        debug!("Sweeping count cache at {}", Utc::now().to_rfc3339());

        let purged = cache.purge_expired().await;
        if purged > 0 {
            info!("Purged {} stale count set(s) from cache", purged);
        }
    }
}
