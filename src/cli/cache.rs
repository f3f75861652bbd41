use owo_colors::OwoColorize;
use tabled::{Table, Tabled};

use crate::{cli::shared::UNAVAILABLE, context::AppContext};

#[derive(Debug, Tabled)]
struct StringifiedDatasetStatus {
    dataset: String,
    stored: String,
    marker: String,
    valid: String,
}

pub async fn cache_status(ctx: &AppContext) -> anyhow::Result<()> {
    let formatted_statuses: Vec<StringifiedDatasetStatus> = ctx
        .cache
        .status()
        .await
        .into_iter()
        .map(|status| StringifiedDatasetStatus {
            dataset: status.name.to_string(),
            stored: if status.present { "yes" } else { "no" }.to_string(),
            marker: status.marker.unwrap_or_else(|| UNAVAILABLE.to_string()),
            valid: if status.valid {
                "fresh".green().to_string()
            } else {
                "stale".red().to_string()
            },
        })
        .collect();

    println!("Cache directory: {}", ctx.config.cache_dir.display());
    println!("{}", Table::new(&formatted_statuses));
    Ok(())
}

pub async fn clear_cache(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.cache.clear_all().await;
    println!("Cleared cached summary and price data.");
    Ok(())
}

pub async fn clear_price_cache(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.cache.clear_prices_only().await;
    println!("Cleared cached price data.");
    Ok(())
}
