//! Local cache for the two backend datasets.
//!
//! Summary data stays valid for the local calendar day it was stored on.
//! Price data stays valid for one hour and is purged as soon as a read finds
//! it stale. Storage problems never reach the caller: they are logged and
//! read as a cache miss.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{
    models::etf::{EtfSummary, PriceBook},
    services::shared::{
        clock::Clock,
        constants::{
            PRICES_DATA_KEY, PRICES_TIMESTAMP_KEY, PRICE_CACHE_TTL_MS, SUMMARY_DATA_KEY,
            SUMMARY_DATE_KEY,
        },
    },
    store::{KeyValueStore, StorageError},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Freshness {
    /// Marker is a `YYYY-MM-DD` date that has to equal today.
    SameCalendarDay,
    /// Marker is an epoch millisecond timestamp younger than `ttl_ms`.
    RollingWindow { ttl_ms: i64 },
}

#[derive(Debug, Clone, Copy)]
struct Dataset {
    name: &'static str,
    data_key: &'static str,
    marker_key: &'static str,
    freshness: Freshness,
    purge_when_stale: bool,
}

const SUMMARY: Dataset = Dataset {
    name: "summary",
    data_key: SUMMARY_DATA_KEY,
    marker_key: SUMMARY_DATE_KEY,
    freshness: Freshness::SameCalendarDay,
    purge_when_stale: false,
};

const PRICES: Dataset = Dataset {
    name: "prices",
    data_key: PRICES_DATA_KEY,
    marker_key: PRICES_TIMESTAMP_KEY,
    freshness: Freshness::RollingWindow {
        ttl_ms: PRICE_CACHE_TTL_MS,
    },
    purge_when_stale: true,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStatus {
    pub name: &'static str,
    pub present: bool,
    pub marker: Option<String>,
    pub valid: bool,
}

/// Turns a storage failure into the documented fallback.
fn degrade<T>(result: Result<T, StorageError>, dataset: &str, operation: &str, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{} cache {} failed, treating as cache miss: {}", dataset, operation, e);
            fallback
        }
    }
}

pub struct CacheManager {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        CacheManager { store, clock }
    }

    pub async fn is_summary_valid(&self) -> bool {
        degrade(self.try_is_valid(SUMMARY).await, SUMMARY.name, "validity check", false)
    }

    pub async fn get_summary(&self) -> Option<Vec<EtfSummary>> {
        degrade(self.try_get(SUMMARY).await, SUMMARY.name, "read", None)
    }

    pub async fn set_summary(&self, summaries: &[EtfSummary]) {
        degrade(self.try_set(SUMMARY, summaries).await, SUMMARY.name, "write", ())
    }

    pub async fn is_prices_valid(&self) -> bool {
        degrade(self.try_is_valid(PRICES).await, PRICES.name, "validity check", false)
    }

    pub async fn get_prices(&self) -> Option<PriceBook> {
        degrade(self.try_get(PRICES).await, PRICES.name, "read", None)
    }

    pub async fn set_prices(&self, prices: &PriceBook) {
        degrade(self.try_set(PRICES, prices).await, PRICES.name, "write", ())
    }

    pub async fn clear_all(&self) {
        for dataset in [SUMMARY, PRICES] {
            degrade(self.try_clear(dataset).await, dataset.name, "clear", ());
        }
    }

    pub async fn clear_prices_only(&self) {
        degrade(self.try_clear(PRICES).await, PRICES.name, "clear", ())
    }

    pub async fn status(&self) -> Vec<DatasetStatus> {
        vec![
            self.dataset_status(SUMMARY, self.is_summary_valid().await)
                .await,
            self.dataset_status(PRICES, self.is_prices_valid().await)
                .await,
        ]
    }

    async fn dataset_status(&self, dataset: Dataset, marker_valid: bool) -> DatasetStatus {
        let present = degrade(
            self.store.get(dataset.data_key).await.map(|v| v.is_some()),
            dataset.name,
            "status",
            false,
        );
        let marker = degrade(
            self.store.get(dataset.marker_key).await,
            dataset.name,
            "status",
            None,
        );
        DatasetStatus {
            name: dataset.name,
            present,
            marker,
            valid: present && marker_valid,
        }
    }

    fn marker_is_fresh(&self, dataset: Dataset, marker: &str) -> bool {
        match dataset.freshness {
            Freshness::SameCalendarDay => marker.trim() == self.clock.today(),
            Freshness::RollingWindow { ttl_ms } => match marker.trim().parse::<i64>() {
                Ok(stored_at) => self.clock.now_millis() - stored_at < ttl_ms,
                Err(_) => {
                    debug!("{} cache marker '{}' is not a timestamp", dataset.name, marker);
                    false
                }
            },
        }
    }

    fn fresh_marker(&self, dataset: Dataset) -> String {
        match dataset.freshness {
            Freshness::SameCalendarDay => self.clock.today(),
            Freshness::RollingWindow { .. } => self.clock.now_millis().to_string(),
        }
    }

    async fn try_is_valid(&self, dataset: Dataset) -> Result<bool, StorageError> {
        Ok(match self.store.get(dataset.marker_key).await? {
            Some(marker) => self.marker_is_fresh(dataset, &marker),
            None => false,
        })
    }

    async fn try_get<T: DeserializeOwned>(
        &self,
        dataset: Dataset,
    ) -> Result<Option<T>, StorageError> {
        if !self.try_is_valid(dataset).await? {
            debug!("{} cache miss", dataset.name);
            if dataset.purge_when_stale {
                self.try_clear(dataset).await?;
            }
            return Ok(None);
        }

        match self.store.get(dataset.data_key).await? {
            Some(raw) => {
                let payload = serde_json::from_str(&raw)?;
                debug!("{} cache hit", dataset.name);
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    async fn try_set<T: Serialize + ?Sized>(
        &self,
        dataset: Dataset,
        payload: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(payload)?;
        self.store.set(dataset.data_key, &raw).await?;
        self.store
            .set(dataset.marker_key, &self.fresh_marker(dataset))
            .await?;
        debug!("{} cache refreshed", dataset.name);
        Ok(())
    }

    async fn try_clear(&self, dataset: Dataset) -> Result<(), StorageError> {
        self.store.remove(dataset.data_key).await?;
        self.store.remove(dataset.marker_key).await?;
        Ok(())
    }
}
