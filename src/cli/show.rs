use anyhow::anyhow;
use owo_colors::{OwoColorize, Style};
use spinners_rs::{Spinner, Spinners};
use tabled::{Table, Tabled};

use crate::{
    cli::shared::{
        format_change, format_number, format_optional_currency, format_plain_percent,
        format_ratio, UNAVAILABLE,
    },
    context::AppContext,
    services::shared::util::normalize_symbol,
};

#[derive(Debug, Tabled)]
struct Field {
    field: &'static str,
    value: String,
}

#[derive(Debug, Tabled)]
struct StringifiedPriceRange {
    period: String,
    min: String,
    max: String,
    current: String,
}

pub async fn show(ctx: &AppContext, symbol: &str, refresh: bool) -> anyhow::Result<()> {
    let symbol = normalize_symbol(symbol);

    let mut sp = Spinner::new(Spinners::Point, "Loading ETF data...");
    sp.start();
    let view = ctx.market_data.load_market_view(refresh).await;
    sp.stop();
    let view = view?;

    let row = view
        .rows
        .into_iter()
        .find(|row| row.symbol == symbol)
        .ok_or_else(|| anyhow!("No ETF with symbol {}", symbol))?;
    let details = row.summary.clone().unwrap_or_default();
    let price = row.price.clone();

    let fields = vec![
        Field {
            field: "Price",
            value: format_optional_currency(row.display_price()),
        },
        Field {
            field: "Change",
            value: format_optional_currency(price.as_ref().and_then(|p| p.change)),
        },
        Field {
            field: "Change %",
            value: format_change(row.change_percent()),
        },
        Field {
            field: "Previous close",
            value: format_optional_currency(price.as_ref().and_then(|p| p.previous_close)),
        },
        Field {
            field: "Last close",
            value: format_optional_currency(details.last_close_price),
        },
        Field {
            field: "Volume",
            value: format_number(row.volume()),
        },
        Field {
            field: "RSI (D/W/M)",
            value: format!(
                "{} / {} / {}",
                format_ratio(details.daily_rsi),
                format_ratio(details.weekly_rsi),
                format_ratio(details.monthly_rsi)
            ),
        },
        Field {
            field: "1W return",
            value: format_change(details.one_week_returns),
        },
        Field {
            field: "1M return",
            value: format_change(details.one_month_returns),
        },
        Field {
            field: "1Y return",
            value: format_change(details.one_year_returns),
        },
        Field {
            field: "2Y return",
            value: format_change(details.two_year_returns),
        },
        Field {
            field: "Down from 2Y high",
            value: format_plain_percent(details.down_from_two_year_high),
        },
        Field {
            field: "P/E",
            value: format_ratio(details.price_to_earning),
        },
        Field {
            field: "Record date",
            value: details
                .record_date
                .clone()
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
        },
    ];

    let heading_style = Style::new().black().on_white().bold();
    println!("\n");
    println!("{}", format!(" {} ", row.symbol).style(heading_style));
    if let Some(prices_error) = &view.prices_error {
        println!(
            "{} live price unavailable: {}",
            "warning:".yellow().bold(),
            prices_error
        );
    }
    println!("{}", Table::new(&fields));

    if !details.price_range.is_empty() {
        let ranges: Vec<StringifiedPriceRange> = details
            .price_range
            .iter()
            .map(|(period, range)| StringifiedPriceRange {
                period: period.clone(),
                min: format_optional_currency(range.min),
                max: format_optional_currency(range.max),
                current: format_optional_currency(range.current),
            })
            .collect();
        println!("{}", Table::new(&ranges));
    }
    Ok(())
}
