//! Lock-free policy snapshot cache
//!
//! The decision hot path never touches the policy store directly. It reads
//! an immutable snapshot swapped in atomically, so resolution stays
//! wait-free while a background task refreshes the set on an interval. A
//! failed refresh keeps the previous snapshot serving; only the initial
//! load is strict.

use crate::core::policy::Policy;
use crate::storage::PolicyStore;
use crate::utils::error::Result;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Immutable view of the policy set at one load
pub struct Snapshot {
    pub policies: Vec<Policy>,
    pub loaded_at: Instant,
}

pub struct PolicyCache {
    store: Arc<dyn PolicyStore>,
    snapshot: ArcSwap<Snapshot>,
    refresh_interval: Duration,
}

impl PolicyCache {
    /// Build the cache with a strict initial load
    ///
    /// Startup fails if the store cannot produce a first snapshot; serving
    /// decisions without ever having seen the policy set is not an option.
    pub async fn new(store: Arc<dyn PolicyStore>, refresh_interval: Duration) -> Result<Self> {
        let policies = store.load_policies().await?;
        debug!(count = policies.len(), "loaded initial policy snapshot");
        Ok(Self {
            store,
            snapshot: ArcSwap::from_pointee(Snapshot {
                policies,
                loaded_at: Instant::now(),
            }),
            refresh_interval,
        })
    }

    /// Current snapshot; wait-free
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Reload from the store and swap the snapshot in
    pub async fn refresh(&self) -> Result<usize> {
        let policies = self.store.load_policies().await?;
        let count = policies.len();
        self.snapshot.store(Arc::new(Snapshot {
            policies,
            loaded_at: Instant::now(),
        }));
        debug!(count, "refreshed policy snapshot");
        Ok(count)
    }

    /// Time since the serving snapshot was loaded
    pub fn age(&self) -> Duration {
        self.snapshot.load().loaded_at.elapsed()
    }

    /// Spawn the interval refresh loop
    ///
    /// Refresh failures are logged and the stale snapshot keeps serving
    /// until the next attempt succeeds.
    pub fn spawn_refresh_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(cache.refresh_interval).await;
                if let Err(err) = cache.refresh().await {
                    warn!(
                        error = %err,
                        stale_for_secs = cache.age().as_secs(),
                        "policy refresh failed, serving previous snapshot"
                    );
                }
            }
        })
    }
}
