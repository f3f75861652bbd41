use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfSummary {
    pub symbol: String,
    #[serde(default)]
    pub details: EtfDetails,
}

/// Pre-computed fundamentals as delivered by `/api/summary`. Every field is
/// optional so that a partially populated record still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfDetails {
    #[serde(default)]
    pub last_close_price: Option<Decimal>,
    #[serde(default)]
    pub last_day_volume: Option<f64>,
    #[serde(default, rename = "dailyRSI")]
    pub daily_rsi: Option<f64>,
    #[serde(default, rename = "weeklyRSI")]
    pub weekly_rsi: Option<f64>,
    #[serde(default, rename = "monthlyRSI")]
    pub monthly_rsi: Option<f64>,
    #[serde(default, rename = "1weekReturns")]
    pub one_week_returns: Option<f64>,
    #[serde(default, rename = "1monthReturns")]
    pub one_month_returns: Option<f64>,
    #[serde(default, rename = "1yearReturns")]
    pub one_year_returns: Option<f64>,
    #[serde(default, rename = "2yearReturns")]
    pub two_year_returns: Option<f64>,
    #[serde(default, rename = "downFrom2YearHigh")]
    pub down_from_two_year_high: Option<f64>,
    #[serde(default)]
    pub price_range: BTreeMap<String, PriceRange>,
    #[serde(default)]
    pub record_date: Option<String>,
    #[serde(default)]
    pub price_to_earning: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub min: Option<Decimal>,
    #[serde(default)]
    pub max: Option<Decimal>,
    #[serde(default)]
    pub current: Option<Decimal>,
}

/// One element of the `/api/prices` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub key: String,
    #[serde(flatten)]
    pub snapshot: PriceSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub previous_close: Option<Decimal>,
}

pub type PriceBook = BTreeMap<String, PriceSnapshot>;

pub fn price_book_from_quotes(quotes: Vec<PriceQuote>) -> PriceBook {
    quotes
        .into_iter()
        .map(|quote| (quote.key, quote.snapshot))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    pub current_price: Decimal,
    #[serde(default)]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub previous_close: Option<Decimal>,
}

/// A summary record joined with the live price for the same symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct EtfRow {
    pub symbol: String,
    pub summary: Option<EtfDetails>,
    pub price: Option<PriceSnapshot>,
}

impl EtfRow {
    /// Live price when available, otherwise the last close from the summary.
    pub fn display_price(&self) -> Option<Decimal> {
        self.price
            .as_ref()
            .and_then(|price| price.current_price)
            .or_else(|| self.summary.as_ref().and_then(|s| s.last_close_price))
    }

    pub fn change_percent(&self) -> Option<f64> {
        self.price.as_ref().and_then(|price| price.change_percent)
    }

    pub fn volume(&self) -> Option<f64> {
        self.price
            .as_ref()
            .and_then(|price| price.volume)
            .or_else(|| self.summary.as_ref().and_then(|s| s.last_day_volume))
    }
}
