use std::sync::Arc;

use crate::{
    services::{
        backend::{BackendClient, MarketDataSource, WatchlistRemote},
        cache::CacheManager,
        market_data::loader::MarketDataLoader,
        shared::{
            clock::{Clock, SystemClock},
            env::AppConfig,
        },
        watchlist::WatchlistService,
    },
    store::{file_store::FileStore, KeyValueStore},
};

/// Services built once at start-up and handed to every command.
pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub cache: Arc<CacheManager>,
    pub backend: Arc<BackendClient>,
    pub market_data: MarketDataLoader,
}

impl AppContext {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.cache_dir.clone()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = Arc::new(CacheManager::new(store.clone(), clock.clone()));
        let backend = Arc::new(BackendClient::new(
            &config.api_url,
            config.session_token.clone(),
        )?);
        let source: Arc<dyn MarketDataSource> = backend.clone();
        let market_data = MarketDataLoader::new(cache.clone(), source);

        Ok(AppContext {
            config,
            store,
            clock,
            cache,
            backend,
            market_data,
        })
    }

    /// Watchlist backed by the server when signed in, by the local store otherwise.
    /// Nothing is loaded yet.
    pub fn watchlist_service(&self) -> WatchlistService {
        let remote = if self.backend.is_authenticated() {
            let remote: Arc<dyn WatchlistRemote> = self.backend.clone();
            Some(remote)
        } else {
            None
        };
        WatchlistService::new(remote, self.store.clone(), self.clock.clone())
    }

    pub async fn watchlist(&self) -> anyhow::Result<WatchlistService> {
        let mut watchlist = self.watchlist_service();
        watchlist.sync().await?;
        Ok(watchlist)
    }
}
