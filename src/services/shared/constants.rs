pub const DEFAULT_CACHE_DIR: &str = "./cache";

pub const SUMMARY_DATA_KEY: &str = "etf_summary_data";
pub const SUMMARY_DATE_KEY: &str = "etf_summary_date";
pub const PRICES_DATA_KEY: &str = "etf_prices_data";
pub const PRICES_TIMESTAMP_KEY: &str = "etf_prices_timestamp";
pub const LOCAL_WATCHLIST_KEY: &str = "etf_watchlist_local";

// one hour
pub const PRICE_CACHE_TTL_MS: i64 = 3_600_000;

pub const SUMMARY_DATE_FORMAT: &str = "%Y-%m-%d";
