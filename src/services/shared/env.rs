use anyhow::anyhow;
use dotenvy::{dotenv, from_filename, var};
use std::path::PathBuf;

use super::constants::DEFAULT_CACHE_DIR;

pub fn check_for_env_variables() {
    // a missing backend URL is reported here and fails in AppConfig::from_env
    match get_env_variable("ETF_API_URL") {
        Some(_) => println!("Backend URL set ✅"),
        None => println!("ETF_API_URL not set ❌"),
    };
    match get_env_variable("ETF_SESSION_TOKEN") {
        Some(_) => println!("Session token set ✅"),
        None => println!(
            "ETF_SESSION_TOKEN not set, the watchlist is kept locally and profile commands are unavailable ⚠️"
        ),
    };
    match get_env_variable("ETF_CACHE_DIR") {
        Some(dir) => println!("Cache directory set to {} ✅", dir),
        None => println!("ETF_CACHE_DIR not set, using {} ⚠️", DEFAULT_CACHE_DIR),
    };
}

pub fn get_env_variable(variable_to_get: &str) -> Option<String> {
    let environment = var("RUST_ENV").unwrap_or_else(|_| "development".into());

    match environment.as_str() {
        "development" => from_filename(".env.dev").ok(),
        "production" => from_filename(".env.prod").ok(),
        _ => dotenv().ok(),
    };
    var(variable_to_get).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub session_token: Option<String>,
    pub cache_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(get_env_variable)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = lookup("ETF_API_URL").ok_or_else(|| {
            anyhow!("Please set the ETF backend base URL as ETF_API_URL in your environment variables")
        })?;

        Ok(AppConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            session_token: lookup("ETF_SESSION_TOKEN"),
            cache_dir: lookup("ETF_CACHE_DIR")
                .unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string())
                .into(),
        })
    }
}
