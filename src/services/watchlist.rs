use std::{collections::HashSet, sync::Arc};

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    models::user::WatchlistEntry,
    services::{
        backend::WatchlistRemote,
        shared::{clock::Clock, constants::LOCAL_WATCHLIST_KEY, util::normalize_symbol},
    },
    store::KeyValueStore,
};

/// In-memory watchlist mirrored from the backend for signed-in users, or
/// from the local store for guests.
pub struct WatchlistService {
    remote: Option<Arc<dyn WatchlistRemote>>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    entries: Vec<WatchlistEntry>,
}

impl WatchlistService {
    pub fn new(
        remote: Option<Arc<dyn WatchlistRemote>>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        WatchlistService {
            remote,
            store,
            clock,
            entries: vec![],
        }
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn symbols(&self) -> HashSet<String> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = normalize_symbol(symbol);
        self.entries.iter().any(|e| e.symbol == symbol)
    }

    pub async fn sync(&mut self) -> anyhow::Result<()> {
        self.entries = match &self.remote {
            Some(remote) => remote.fetch_watchlist().await?,
            None => self.load_local().await,
        };
        Ok(())
    }

    /// Like `sync`, but a failure leaves the list empty. Returns whether the
    /// list could be loaded.
    pub async fn sync_or_empty(&mut self) -> bool {
        match self.sync().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Couldn't load watchlist, continuing without it: {:#}", e);
                self.entries.clear();
                false
            }
        }
    }

    /// Returns `false` when the symbol was already on the list.
    pub async fn add(&mut self, symbol: &str) -> anyhow::Result<bool> {
        let symbol = normalize_symbol(symbol);
        if self.contains(&symbol) {
            return Ok(false);
        }

        if let Some(remote) = &self.remote {
            remote.add_symbol(&symbol).await?;
        }
        let mut entries = self.entries.clone();
        entries.push(WatchlistEntry {
            symbol: symbol.clone(),
            added_at: self.clock.now().with_timezone(&Utc),
        });
        self.save_local(&entries).await?;
        self.entries = entries;
        info!("Added {} to watchlist", symbol);
        Ok(true)
    }

    /// Returns `false` when the symbol wasn't on the list.
    pub async fn remove(&mut self, symbol: &str) -> anyhow::Result<bool> {
        let symbol = normalize_symbol(symbol);
        if !self.contains(&symbol) {
            return Ok(false);
        }

        if let Some(remote) = &self.remote {
            remote.remove_symbol(&symbol).await?;
        }
        let entries: Vec<WatchlistEntry> = self
            .entries
            .iter()
            .filter(|e| e.symbol != symbol)
            .cloned()
            .collect();
        self.save_local(&entries).await?;
        self.entries = entries;
        info!("Removed {} from watchlist", symbol);
        Ok(true)
    }

    async fn load_local(&self) -> Vec<WatchlistEntry> {
        let raw = match self.store.get(LOCAL_WATCHLIST_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Couldn't read local watchlist, starting empty: {}", e);
                return vec![];
            }
        };
        match raw.map(|raw| serde_json::from_str::<Vec<WatchlistEntry>>(&raw)) {
            Some(Ok(entries)) => entries,
            Some(Err(e)) => {
                warn!("Local watchlist is corrupt, starting empty: {}", e);
                vec![]
            }
            None => vec![],
        }
    }

    async fn save_local(&self, entries: &[WatchlistEntry]) -> anyhow::Result<()> {
        if self.is_remote() {
            return Ok(());
        }
        let raw = serde_json::to_string(entries)?;
        self.store
            .set(LOCAL_WATCHLIST_KEY, &raw)
            .await
            .context("Couldn't persist local watchlist")?;
        Ok(())
    }
}
