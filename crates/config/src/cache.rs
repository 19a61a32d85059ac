//! In-memory mirror of the config store with atomic snapshot publishing.
//!
//! Readers call [`ConfigCache::current`] on every inbound message; the
//! refresh side builds a complete replacement config and publishes it in a
//! single `Arc` swap, so a concurrent reader sees either the previous or
//! the new snapshot, never a mix.

use std::{
    collections::HashSet,
    sync::{Arc, RwLock},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use {
    tokio::task::JoinHandle,
    tokio::time::MissedTickBehavior,
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{
    error::RefreshError,
    schema::BotConfig,
    store::{ConfigStore, StoredConfig},
};

/// Default interval between background refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

struct CacheState {
    config: Arc<BotConfig>,
    last_refreshed_at: Option<i64>,
}

/// Process-wide cache of the bot configuration.
///
/// Starts with [`BotConfig::default`] and keeps the last fully committed
/// snapshot on any refresh failure (stale-but-valid, never cleared).
pub struct ConfigCache {
    store: Arc<dyn ConfigStore>,
    state: RwLock<CacheState>,
}

impl ConfigCache {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            state: RwLock::new(CacheState {
                config: Arc::new(BotConfig::default()),
                last_refreshed_at: None,
            }),
        }
    }

    /// Non-blocking snapshot read, safe concurrent with an in-flight refresh.
    pub fn current(&self) -> Arc<BotConfig> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&state.config)
    }

    /// Unix seconds of the last successful refresh, if any.
    pub fn last_refreshed_at(&self) -> Option<i64> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.last_refreshed_at
    }

    /// Fetch the config row and publish a new snapshot.
    ///
    /// A reachable store with no row keeps the current value (first run:
    /// the defaults) and still counts as a successful refresh. A fetch
    /// failure returns [`RefreshError`] and leaves the cache untouched.
    pub async fn refresh(&self) -> Result<(), RefreshError> {
        let row = self
            .store
            .fetch_config()
            .await
            .map_err(RefreshError::Store)?;

        match row {
            Some(stored) => {
                let next = self.merge(&stored);
                self.publish(next);
                debug!("config refreshed from store");
            },
            None => {
                self.touch();
                info!("no config row found, keeping current config");
            },
        }
        Ok(())
    }

    /// Build the replacement snapshot from a stored row.
    ///
    /// Blank or missing instructions fall back to the current value, so an
    /// admin clearing the field never downgrades the bot to an empty prompt.
    fn merge(&self, stored: &StoredConfig) -> BotConfig {
        let current = self.current();
        let system_instructions = stored
            .system_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| current.system_instructions.clone());

        BotConfig {
            system_instructions,
            allowed_channels: stored.allowed_channels.iter().cloned().collect::<HashSet<_>>(),
        }
    }

    fn publish(&self, config: BotConfig) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.config = Arc::new(config);
        state.last_refreshed_at = Some(now_secs());
    }

    fn touch(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.last_refreshed_at = Some(now_secs());
    }

    /// Spawn the periodic refresh task.
    ///
    /// Each refresh is awaited inline, so at most one is ever in flight;
    /// a refresh outlasting the interval delays the next tick instead of
    /// stacking a second one.
    pub fn spawn_refresh(self: &Arc<Self>, period: Duration) -> RefreshTask {
        let cache = Arc::clone(self);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the startup refresh already ran.
            interval.tick().await;

            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if let Err(error) = cache.refresh().await {
                            warn!(%error, "config refresh failed, keeping previous snapshot");
                        }
                    },
                }
            }
            debug!("config refresh task stopped");
        });

        RefreshTask { handle, cancel }
    }
}

/// Handle to the background refresh task, cancellable on shutdown.
pub struct RefreshTask {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl RefreshTask {
    /// Cancel the task and wait for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        anyhow::{Result, anyhow},
        async_trait::async_trait,
        std::sync::Mutex,
    };

    struct MemoryStore {
        row: Mutex<Option<StoredConfig>>,
        fail: Mutex<bool>,
    }

    impl MemoryStore {
        fn new(row: Option<StoredConfig>) -> Arc<Self> {
            Arc::new(Self {
                row: Mutex::new(row),
                fail: Mutex::new(false),
            })
        }

        fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl ConfigStore for MemoryStore {
        async fn fetch_config(&self) -> Result<Option<StoredConfig>> {
            if *self.fail.lock().unwrap() {
                return Err(anyhow!("store unreachable"));
            }
            Ok(self.row.lock().unwrap().clone())
        }

        async fn upsert_config(&self, config: &StoredConfig) -> Result<()> {
            *self.row.lock().unwrap() = Some(config.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn refresh_roundtrips_stored_row() {
        let store = MemoryStore::new(Some(StoredConfig {
            system_instructions: Some("Be terse.".into()),
            allowed_channels: vec!["42".into(), "7".into()],
        }));
        let cache = ConfigCache::new(store);

        cache.refresh().await.unwrap();

        let config = cache.current();
        assert_eq!(config.system_instructions, "Be terse.");
        assert_eq!(
            config.allowed_channels,
            HashSet::from(["42".to_string(), "7".to_string()])
        );
        assert!(cache.last_refreshed_at().is_some());
    }

    #[tokio::test]
    async fn missing_row_keeps_defaults() {
        let store = MemoryStore::new(None);
        let cache = ConfigCache::new(store);

        cache.refresh().await.unwrap();

        assert_eq!(*cache.current(), BotConfig::default());
    }

    #[tokio::test]
    async fn failed_refresh_leaves_snapshot_untouched() {
        let store = MemoryStore::new(Some(StoredConfig {
            system_instructions: Some("Be terse.".into()),
            allowed_channels: vec!["42".into()],
        }));
        let cache = ConfigCache::new(Arc::clone(&store) as Arc<dyn ConfigStore>);
        cache.refresh().await.unwrap();
        let before = cache.current();

        store.set_fail(true);
        let result = cache.refresh().await;

        assert!(matches!(result, Err(RefreshError::Store(_))));
        assert_eq!(*cache.current(), *before);
    }

    #[tokio::test]
    async fn blank_instructions_fall_back_to_current() {
        let store = MemoryStore::new(Some(StoredConfig {
            system_instructions: Some("Be terse.".into()),
            allowed_channels: vec!["42".into()],
        }));
        let cache = ConfigCache::new(Arc::clone(&store) as Arc<dyn ConfigStore>);
        cache.refresh().await.unwrap();

        store
            .upsert_config(&StoredConfig {
                system_instructions: Some("   ".into()),
                allowed_channels: vec!["42".into()],
            })
            .await
            .unwrap();
        cache.refresh().await.unwrap();

        assert_eq!(cache.current().system_instructions, "Be terse.");
    }

    #[tokio::test]
    async fn refresh_task_picks_up_changes() {
        let store = MemoryStore::new(None);
        let cache = Arc::new(ConfigCache::new(Arc::clone(&store) as Arc<dyn ConfigStore>));
        let task = cache.spawn_refresh(Duration::from_millis(10));

        store
            .upsert_config(&StoredConfig {
                system_instructions: None,
                allowed_channels: vec!["42".into()],
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        task.stop().await;

        assert!(cache.current().allowed_channels.contains("42"));
    }
}
