use crate::client::{EnergyClient, FetchError};
use crate::models::EnergyData;
use chrono::{DateTime, Utc};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::{sync::RwLock, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Default)]
struct CacheSlot {
    data: Option<Arc<EnergyData>>,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
    // Bumped on every invalidation; fetches started under an older
    // generation must not overwrite the slot.
    generation: u64,
}

/// In-memory cache in front of the read endpoint.
///
/// Writes never touch the cached value directly: callers invalidate it and a
/// background refresh reads the fresh state from the server.
#[derive(Clone)]
pub struct EnergyCache {
    client: EnergyClient,
    slot: Arc<RwLock<CacheSlot>>,
    invalidations: Arc<AtomicU64>,
}

impl EnergyCache {
    pub fn new(client: EnergyClient) -> Self {
        Self {
            client,
            slot: Arc::new(RwLock::new(CacheSlot::default())),
            invalidations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Cached data, fetched first if missing or invalidated.
    pub async fn get(&self) -> Result<Arc<EnergyData>, FetchError> {
        {
            let slot = self.slot.read().await;
            if let (Some(data), false) = (&slot.data, slot.stale) {
                return Ok(Arc::clone(data));
            }
        }
        self.refetch().await
    }

    pub async fn refetch(&self) -> Result<Arc<EnergyData>, FetchError> {
        let generation = self.slot.read().await.generation;
        let data = Arc::new(self.client.fetch().await?);

        let mut slot = self.slot.write().await;
        if slot.generation == generation {
            slot.data = Some(Arc::clone(&data));
            slot.fetched_at = Some(Utc::now());
            slot.stale = false;
        } else {
            debug!(
                started = generation,
                current = slot.generation,
                "discarding energy data fetched before an invalidation"
            );
        }
        Ok(data)
    }

    pub async fn invalidate(&self) {
        {
            let mut slot = self.slot.write().await;
            slot.stale = true;
            slot.generation += 1;
        }
        let count = self.invalidations.fetch_add(1, Ordering::SeqCst) + 1;
        info!(invalidations = count, "energy cache invalidated");

        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(err) = cache.refetch().await {
                warn!(error = ?err, "background refresh after invalidation failed");
            }
        });
    }

    pub fn invalidation_count(&self) -> u64 {
        self.invalidations.load(Ordering::SeqCst)
    }

    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.slot.read().await.fetched_at
    }

    pub async fn is_stale(&self) -> bool {
        self.slot.read().await.stale
    }

    pub fn spawn_periodic_refresh(&self, every: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = cache.refetch().await {
                    warn!(error = ?err, "periodic energy refresh failed");
                }
            }
        })
    }
}
