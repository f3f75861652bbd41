use owo_colors::OwoColorize;
use serde::Serialize;
use spinners_rs::{Spinner, Spinners};
use tabled::{Table, Tabled};

use crate::{
    cli::shared::{format_change, format_number, format_optional_currency, format_plain_percent, format_ratio},
    context::AppContext,
    models::etf::EtfRow,
    services::market_data::screener::{filter_rows, sort_rows, RowFilter, SortKey},
};

#[derive(Debug, Tabled, Serialize, Clone)]
struct StringifiedEtfRow {
    #[tabled(rename = "")]
    starred: String,
    symbol: String,
    price: String,
    change: String,
    volume: String,
    rsi: String,
    #[tabled(rename = "1W")]
    one_week: String,
    #[tabled(rename = "1M")]
    one_month: String,
    #[tabled(rename = "1Y")]
    one_year: String,
    #[tabled(rename = "2Y")]
    two_years: String,
    #[tabled(rename = "from 2Y high")]
    down_from_high: String,
}

impl StringifiedEtfRow {
    fn new(row: &EtfRow, starred: bool) -> Self {
        let details = row.summary.clone().unwrap_or_default();
        StringifiedEtfRow {
            starred: if starred { "★".to_string() } else { String::new() },
            symbol: row.symbol.clone(),
            price: format_optional_currency(row.display_price()),
            change: format_change(row.change_percent()),
            volume: format_number(row.volume()),
            rsi: format_ratio(details.daily_rsi),
            one_week: format_change(details.one_week_returns),
            one_month: format_change(details.one_month_returns),
            one_year: format_change(details.one_year_returns),
            two_years: format_change(details.two_year_returns),
            down_from_high: format_plain_percent(details.down_from_two_year_high),
        }
    }
}

pub struct ListArgs {
    pub sort: Option<SortKey>,
    pub ascending: bool,
    pub search: Option<String>,
    pub watchlist_only: bool,
    pub refresh: bool,
}

pub async fn list(ctx: &AppContext, args: ListArgs) -> anyhow::Result<()> {
    let mut sp = Spinner::new(Spinners::Point, "Loading ETF data...");
    sp.start();
    let view = ctx.market_data.load_market_view(args.refresh).await;
    sp.stop();
    let view = view?;

    // the filter needs the list, stars alone don't
    let watchlist = if args.watchlist_only {
        ctx.watchlist().await?
    } else {
        let mut watchlist = ctx.watchlist_service();
        watchlist.sync_or_empty().await;
        watchlist
    };

    let filter = RowFilter {
        search: args.search,
        symbols: args.watchlist_only.then(|| watchlist.symbols()),
    };
    let mut rows = filter_rows(view.rows, &filter);
    if let Some(key) = args.sort {
        sort_rows(&mut rows, key, !args.ascending);
    }

    let formatted_rows: Vec<StringifiedEtfRow> = rows
        .iter()
        .map(|row| StringifiedEtfRow::new(row, watchlist.contains(&row.symbol)))
        .collect();

    println!("\n");
    if let Some(prices_error) = &view.prices_error {
        println!(
            "{} live prices unavailable, showing last close: {}",
            "warning:".yellow().bold(),
            prices_error
        );
    }
    if formatted_rows.is_empty() {
        println!("No ETFs match.");
        return Ok(());
    }
    println!("{}", Table::new(&formatted_rows));
    println!("{} ETFs", formatted_rows.len());
    Ok(())
}
