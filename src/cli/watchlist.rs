use itertools::Itertools;
use owo_colors::OwoColorize;
use tabled::{Table, Tabled};

use crate::{context::AppContext, services::shared::util::normalize_symbol};

#[derive(Debug, Tabled)]
struct StringifiedWatchlistEntry {
    symbol: String,
    added: String,
}

fn describe_mode(ctx: &AppContext) -> &'static str {
    if ctx.backend.is_authenticated() {
        "account"
    } else {
        "local"
    }
}

pub async fn list_watchlist(ctx: &AppContext) -> anyhow::Result<()> {
    let watchlist = ctx.watchlist().await?;
    if watchlist.entries().is_empty() {
        println!("Your {} watchlist is empty.", describe_mode(ctx));
        return Ok(());
    }

    let formatted_entries: Vec<StringifiedWatchlistEntry> = watchlist
        .entries()
        .iter()
        .sorted_by(|a, b| a.symbol.cmp(&b.symbol))
        .map(|entry| StringifiedWatchlistEntry {
            symbol: entry.symbol.clone(),
            added: entry.added_at.format("%Y/%m/%d").to_string(),
        })
        .collect();

    println!("{}", Table::new(&formatted_entries));
    println!("{} symbols on your {} watchlist", formatted_entries.len(), describe_mode(ctx));
    Ok(())
}

pub async fn add_to_watchlist(ctx: &AppContext, symbol: &str) -> anyhow::Result<()> {
    let mut watchlist = ctx.watchlist().await?;
    let symbol = normalize_symbol(symbol);
    if watchlist.add(&symbol).await? {
        println!("{} added to watchlist", symbol.green().bold());
    } else {
        println!("{} is already on your watchlist", symbol);
    }
    Ok(())
}

pub async fn remove_from_watchlist(ctx: &AppContext, symbol: &str) -> anyhow::Result<()> {
    let mut watchlist = ctx.watchlist().await?;
    let symbol = normalize_symbol(symbol);
    if watchlist.remove(&symbol).await? {
        println!("{} removed from watchlist", symbol.red().bold());
    } else {
        println!("{} wasn't on your watchlist", symbol);
    }
    Ok(())
}
