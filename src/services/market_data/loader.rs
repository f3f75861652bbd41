use std::{collections::HashSet, sync::Arc};

use futures::join;
use tracing::{info, warn};

use crate::{
    models::etf::{EtfRow, EtfSummary, PriceBook},
    services::{backend::MarketDataSource, cache::CacheManager},
};

#[derive(Debug)]
pub struct MarketView {
    pub rows: Vec<EtfRow>,
    /// Set when prices couldn't be loaded and rows carry summary data only.
    pub prices_error: Option<String>,
}

/// Joins summaries and prices by symbol. Summary order is kept, symbols that
/// only have a price are appended in symbol order.
pub fn merge_by_symbol(summaries: Vec<EtfSummary>, mut prices: PriceBook) -> Vec<EtfRow> {
    let mut seen = HashSet::new();
    let mut rows: Vec<EtfRow> = vec![];

    for summary in summaries {
        if !seen.insert(summary.symbol.clone()) {
            continue;
        }
        let price = prices.remove(&summary.symbol);
        rows.push(EtfRow {
            symbol: summary.symbol,
            summary: Some(summary.details),
            price,
        });
    }

    rows.extend(prices.into_iter().map(|(symbol, price)| EtfRow {
        symbol,
        summary: None,
        price: Some(price),
    }));
    rows
}

pub struct MarketDataLoader {
    cache: Arc<CacheManager>,
    source: Arc<dyn MarketDataSource>,
}

impl MarketDataLoader {
    pub fn new(cache: Arc<CacheManager>, source: Arc<dyn MarketDataSource>) -> Self {
        MarketDataLoader { cache, source }
    }

    /// Cached summary of today, or a fresh fetch that then gets cached.
    pub async fn load_summary(&self, force_refresh: bool) -> anyhow::Result<Vec<EtfSummary>> {
        if !force_refresh {
            if let Some(summaries) = self.cache.get_summary().await {
                return Ok(summaries);
            }
        }

        let summaries = self.source.fetch_summary().await?;
        info!("Fetched {} ETF summaries from backend", summaries.len());
        self.cache.set_summary(&summaries).await;
        Ok(summaries)
    }

    pub async fn load_prices(&self, force_refresh: bool) -> anyhow::Result<PriceBook> {
        if !force_refresh {
            if let Some(prices) = self.cache.get_prices().await {
                return Ok(prices);
            }
        }

        let prices = self.source.fetch_prices().await?;
        info!("Fetched {} prices from backend", prices.len());
        self.cache.set_prices(&prices).await;
        Ok(prices)
    }

    /// Loads both datasets concurrently. Without summaries there is nothing
    /// to show, so that failure is returned; a price failure only leaves the
    /// rows without live prices.
    pub async fn load_market_view(&self, force_refresh: bool) -> anyhow::Result<MarketView> {
        let (summaries, prices) = join!(
            self.load_summary(force_refresh),
            self.load_prices(force_refresh)
        );

        let summaries = summaries?;
        let (prices, prices_error) = match prices {
            Ok(prices) => (prices, None),
            Err(e) => {
                warn!("Couldn't load prices, showing summary data only: {:#}", e);
                (PriceBook::new(), Some(format!("{:#}", e)))
            }
        };

        Ok(MarketView {
            rows: merge_by_symbol(summaries, prices),
            prices_error,
        })
    }
}
