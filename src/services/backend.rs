use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::models::{
    etf::{price_book_from_quotes, EtfSummary, IndexSnapshot, PriceBook, PriceQuote},
    user::{AddSymbolRequest, UserProfile, WatchlistEntry, WatchlistResponse},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Where summary and price data come from on a cache miss.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_summary(&self) -> anyhow::Result<Vec<EtfSummary>>;
    async fn fetch_prices(&self) -> anyhow::Result<PriceBook>;
}

/// Server-side watchlist of the signed-in user.
#[async_trait]
pub trait WatchlistRemote: Send + Sync {
    async fn fetch_watchlist(&self) -> anyhow::Result<Vec<WatchlistEntry>>;
    async fn add_symbol(&self, symbol: &str) -> anyhow::Result<()>;
    async fn remove_symbol(&self, symbol: &str) -> anyhow::Result<()>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndicesResponse {
    Wrapped { indices: Vec<IndexSnapshot> },
    Bare(Vec<IndexSnapshot>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileResponse {
    Wrapped { user: UserProfile },
    Bare(UserProfile),
}

pub struct BackendClient {
    http: Client,
    base_url: String,
    session_token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: &str, session_token: Option<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("etfwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Couldn't build HTTP client")?;

        Ok(BackendClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn require_session(&self) -> anyhow::Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(anyhow!(
                "Not signed in, set ETF_SESSION_TOKEN to use account features"
            ))
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> anyhow::Result<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .with_context(|| format!("Couldn't reach backend for {}", what))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Backend returned {} for {}: {}",
                status,
                what,
                body
            ));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let response = self.send(self.http.get(self.url(path)), path).await?;
        let body = response
            .text()
            .await
            .with_context(|| format!("Couldn't read response body of {}", path))?;
        debug!(path, bytes = body.len(), "backend response received");

        serde_json::from_str::<T>(&body)
            .with_context(|| format!("Unexpected response shape from {}", path))
    }

    pub async fn fetch_indian_indices(&self) -> anyhow::Result<Vec<IndexSnapshot>> {
        let response: IndicesResponse = self.get_json("/api/indices/indian").await?;
        Ok(match response {
            IndicesResponse::Wrapped { indices } => indices,
            IndicesResponse::Bare(indices) => indices,
        })
    }

    pub async fn profile(&self) -> anyhow::Result<UserProfile> {
        self.require_session()?;
        let response: ProfileResponse = self.get_json("/api/auth/profile").await?;
        Ok(match response {
            ProfileResponse::Wrapped { user } => user,
            ProfileResponse::Bare(user) => user,
        })
    }

    pub async fn logout(&self) -> anyhow::Result<()> {
        self.require_session()?;
        self.send(self.http.post(self.url("/api/auth/logout")), "logout")
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MarketDataSource for BackendClient {
    async fn fetch_summary(&self) -> anyhow::Result<Vec<EtfSummary>> {
        self.get_json("/api/summary").await
    }

    async fn fetch_prices(&self) -> anyhow::Result<PriceBook> {
        let quotes: Vec<PriceQuote> = self.get_json("/api/prices").await?;
        Ok(price_book_from_quotes(quotes))
    }
}

#[async_trait]
impl WatchlistRemote for BackendClient {
    async fn fetch_watchlist(&self) -> anyhow::Result<Vec<WatchlistEntry>> {
        self.require_session()?;
        let response: WatchlistResponse = self.get_json("/api/user/watchlist").await?;
        Ok(response.into_entries())
    }

    async fn add_symbol(&self, symbol: &str) -> anyhow::Result<()> {
        self.require_session()?;
        let request = self
            .http
            .post(self.url("/api/user/watchlist/symbol"))
            .json(&AddSymbolRequest { symbol });
        self.send(request, "watchlist add").await?;
        Ok(())
    }

    async fn remove_symbol(&self, symbol: &str) -> anyhow::Result<()> {
        self.require_session()?;
        let request = self
            .http
            .delete(self.url(&format!("/api/user/watchlist/symbol/{}", symbol)));
        self.send(request, "watchlist remove").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = BackendClient::new("https://etf.example.com/", None).unwrap();
        assert_eq!(client.url("/api/summary"), "https://etf.example.com/api/summary");
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn account_calls_need_a_session() {
        let client = BackendClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client.fetch_watchlist().await.unwrap_err();
        assert!(err.to_string().contains("ETF_SESSION_TOKEN"));
        assert!(client.logout().await.is_err());
    }

    #[test]
    fn indices_accept_wrapped_and_bare_shapes() {
        let bare = r#"[{"name":"NIFTY 50","currentPrice":25100.5,"changePercent":0.4}]"#;
        let wrapped = r#"{"indices":[{"name":"SENSEX","currentPrice":82000}]}"#;

        assert!(matches!(
            serde_json::from_str::<IndicesResponse>(bare).unwrap(),
            IndicesResponse::Bare(list) if list[0].name == "NIFTY 50"
        ));
        assert!(matches!(
            serde_json::from_str::<IndicesResponse>(wrapped).unwrap(),
            IndicesResponse::Wrapped { indices } if indices[0].name == "SENSEX"
        ));
    }

    #[test]
    fn watchlist_accepts_wrapped_and_bare_shapes() {
        let bare = r#"[{"symbol":"GOLDBEES.NS","addedAt":"2026-10-01T09:15:00Z"}]"#;
        let wrapped = r#"{"watchlist":[{"symbol":"BANKBEES.NS","addedAt":"2026-10-02T10:00:00Z"}]}"#;

        let bare: WatchlistResponse = serde_json::from_str(bare).unwrap();
        let wrapped: WatchlistResponse = serde_json::from_str(wrapped).unwrap();

        assert_eq!(bare.into_entries()[0].symbol, "GOLDBEES.NS");
        assert_eq!(wrapped.into_entries()[0].symbol, "BANKBEES.NS");
    }
}
