pub mod backend;
pub mod cache;
pub mod calculators;
pub mod files;
pub mod market_data;
pub mod parsers;
pub mod shared;
pub mod watchlist;
