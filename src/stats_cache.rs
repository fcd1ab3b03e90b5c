//! Per-window cache of computed statistics.
//!
//! An entry is served while it is younger than the configured max age. Any write to the
//! result store clears the whole cache and bumps its generation; a computation started
//! under an older generation is never stored.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::trends::{Statistics, TimeWindow};

#[derive(Default)]
struct Entries {
    by_window: HashMap<TimeWindow, Statistics>,
    generation: u64,
}

#[derive(Clone)]
pub struct StatsCache {
    entries: Arc<RwLock<Entries>>,
    max_age_ms: i64,
}

impl StatsCache {
    pub fn new(max_age_secs: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries::default())),
            max_age_ms: (max_age_secs as i64).saturating_mul(1000),
        }
    }

    /// Current generation. Read it before loading the results a computation is based on.
    pub async fn generation(&self) -> u64 {
        self.entries.read().await.generation
    }

    /// Fresh entry for `window`, judged against `now_ms`.
    #[instrument(level = "debug", skip(self), fields(%window))]
    pub async fn get_fresh(&self, window: TimeWindow, now_ms: i64) -> Option<Statistics> {
        let entries = self.entries.read().await;
        let stats = entries.by_window.get(&window)?;
        if now_ms - stats.computed_at < self.max_age_ms {
            debug!(target: "assessment", %window, "Statistics cache hit");
            Some(stats.clone())
        } else {
            debug!(target: "assessment", %window, "Statistics cache entry expired");
            None
        }
    }

    /// Store `stats` computed under `generation`. Returns false, storing nothing, when the
    /// cache was invalidated since.
    #[instrument(level = "debug", skip(self, stats), fields(%window))]
    pub async fn put(&self, window: TimeWindow, stats: Statistics, generation: u64) -> bool {
        let mut entries = self.entries.write().await;
        if entries.generation != generation {
            debug!(target: "assessment", %window, current = entries.generation, "Discarding statistics from an older generation");
            return false;
        }
        entries.by_window.insert(window, stats);
        true
    }

    pub async fn invalidate(&self) {
        let mut entries = self.entries.write().await;
        entries.by_window.clear();
        entries.generation += 1;
    }
}
