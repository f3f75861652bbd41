pub mod account;
pub mod cache;
pub mod calc;
pub mod indices;
pub mod list;
pub mod shared;
pub mod show;
pub mod watchlist;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use account::{logout, profile};
use cache::{cache_status, clear_cache, clear_price_cache};
use calc::{calculate_cagr, calculate_lumpsum, calculate_sip, calculate_xirr};
use indices::indices;
use list::{list, ListArgs};
use shared::confirm_action;
use show::show;
use watchlist::{add_to_watchlist, list_watchlist, remove_from_watchlist};

use crate::{
    context::AppContext,
    services::{
        files::create_necessary_directories,
        market_data::screener::SortKey,
        shared::env::{check_for_env_variables, AppConfig},
    },
};

#[derive(Parser, Debug)]
#[command(version, about = "Screener and return calculators for Indian ETFs")]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    /// All ETFs with live prices and pre-computed indicators
    List {
        #[arg(short, long, value_enum)]
        sort: Option<SortKey>,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
        /// Only symbols containing this text
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// Only symbols on the watchlist
        #[arg(short, long)]
        watchlist: bool,
        /// Ignore cached data
        #[arg(short, long)]
        refresh: bool,
    },
    /// Details of a single ETF
    Show {
        symbol: String,
        #[arg(short, long)]
        refresh: bool,
    },
    /// Indian market indices
    Indices,
    Watchlist {
        #[clap(subcommand)]
        cmd: WatchlistCommand,
    },
    /// Return calculators, work offline
    Calc {
        #[clap(subcommand)]
        cmd: CalcCommand,
    },
    Cache {
        #[clap(subcommand)]
        cmd: CacheCommand,
    },
    Profile,
    Logout,
}

#[derive(Debug, Subcommand, PartialEq)]
enum WatchlistCommand {
    List,
    Add { symbol: String },
    Remove { symbol: String },
}

#[derive(Debug, Subcommand, PartialEq)]
enum CalcCommand {
    /// Annualised return of dated cash flows, investments negative
    Xirr {
        /// DATE:AMOUNT, e.g. 2024-01-01:-10000
        #[arg(long = "flow")]
        flows: Vec<String>,
        /// CSV file with a `date,amount` header
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    Cagr {
        initial: f64,
        #[arg(value_name = "FINAL")]
        final_value: f64,
        years: f64,
    },
    /// Monthly SIP projection, rates in percent per year
    Sip {
        monthly: f64,
        rate: f64,
        years: f64,
        #[arg(short, long, default_value_t = 0.0)]
        inflation: f64,
    },
    Lumpsum {
        amount: f64,
        rate: f64,
        years: f64,
        #[arg(short, long, default_value_t = 0.0)]
        inflation: f64,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
enum CacheCommand {
    Status,
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
    ClearPrices,
}

fn calc(cmd: CalcCommand) -> anyhow::Result<()> {
    match cmd {
        CalcCommand::Xirr { flows, file } => calculate_xirr(&flows, file.as_ref()),
        CalcCommand::Cagr {
            initial,
            final_value,
            years,
        } => calculate_cagr(initial, final_value, years),
        CalcCommand::Sip {
            monthly,
            rate,
            years,
            inflation,
        } => calculate_sip(monthly, rate, years, inflation),
        CalcCommand::Lumpsum {
            amount,
            rate,
            years,
            inflation,
        } => calculate_lumpsum(amount, rate, years, inflation),
    }
}

fn load_context() -> anyhow::Result<AppContext> {
    check_for_env_variables();
    let config = AppConfig::from_env()?;
    create_necessary_directories(&config.cache_dir)?;
    AppContext::new(config)
}

pub async fn cli() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        // calculators work without backend configuration or cache
        Command::Calc { cmd } => {
            calc(cmd)?;
        }
        Command::List {
            sort,
            asc,
            search,
            watchlist,
            refresh,
        } => {
            let args = ListArgs {
                sort,
                ascending: asc,
                search,
                watchlist_only: watchlist,
                refresh,
            };
            list(&load_context()?, args).await?;
        }
        Command::Show { symbol, refresh } => {
            show(&load_context()?, &symbol, refresh).await?;
        }
        Command::Indices => {
            indices(&load_context()?).await?;
        }
        Command::Watchlist { cmd } => {
            let ctx = load_context()?;
            match cmd {
                WatchlistCommand::List => list_watchlist(&ctx).await?,
                WatchlistCommand::Add { symbol } => add_to_watchlist(&ctx, &symbol).await?,
                WatchlistCommand::Remove { symbol } => remove_from_watchlist(&ctx, &symbol).await?,
            }
        }
        Command::Cache { cmd } => {
            let ctx = load_context()?;
            match cmd {
                CacheCommand::Status => cache_status(&ctx).await?,
                CacheCommand::Clear { yes } => {
                    if yes || confirm_action("clear all cached ETF data") {
                        clear_cache(&ctx).await?;
                    }
                }
                CacheCommand::ClearPrices => clear_price_cache(&ctx).await?,
            }
        }
        Command::Profile => {
            profile(&load_context()?).await?;
        }
        Command::Logout => {
            logout(&load_context()?).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn xirr_flows_accept_negative_amounts() {
        let args = Args::try_parse_from([
            "etfwatch",
            "calc",
            "xirr",
            "--flow",
            "2024-01-01:-10000",
            "--flow",
            "2025-01-01:11000",
        ])
        .unwrap();
        assert_eq!(
            args.cmd,
            Command::Calc {
                cmd: CalcCommand::Xirr {
                    flows: vec![
                        "2024-01-01:-10000".to_string(),
                        "2025-01-01:11000".to_string()
                    ],
                    file: None,
                }
            }
        );
    }

    #[test]
    fn list_parses_sort_key() {
        let args = Args::try_parse_from(["etfwatch", "list", "--sort", "year-return", "--asc"])
            .unwrap();
        assert!(matches!(
            args.cmd,
            Command::List {
                sort: Some(SortKey::YearReturn),
                asc: true,
                ..
            }
        ));
    }
}
