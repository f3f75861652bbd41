use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub symbol: String,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

/// The backend has answered both with a bare array and with a wrapped object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WatchlistResponse {
    Wrapped { watchlist: Vec<WatchlistEntry> },
    Bare(Vec<WatchlistEntry>),
}

impl WatchlistResponse {
    pub fn into_entries(self) -> Vec<WatchlistEntry> {
        match self {
            WatchlistResponse::Wrapped { watchlist } => watchlist,
            WatchlistResponse::Bare(entries) => entries,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddSymbolRequest<'a> {
    pub symbol: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}
