use spinners_rs::{Spinner, Spinners};
use tabled::{Table, Tabled};

use crate::{
    cli::shared::{format_change, format_optional_currency, UNAVAILABLE},
    context::AppContext,
    models::etf::IndexSnapshot,
};

#[derive(Debug, Tabled)]
struct StringifiedIndex {
    name: String,
    symbol: String,
    value: String,
    change: String,
    #[tabled(rename = "change %")]
    change_percent: String,
    #[tabled(rename = "previous close")]
    previous_close: String,
}

impl From<IndexSnapshot> for StringifiedIndex {
    fn from(index: IndexSnapshot) -> Self {
        StringifiedIndex {
            name: index.name,
            symbol: index.symbol.unwrap_or_else(|| UNAVAILABLE.to_string()),
            value: format_optional_currency(Some(index.current_price)),
            change: format_optional_currency(index.change),
            change_percent: format_change(index.change_percent),
            previous_close: format_optional_currency(index.previous_close),
        }
    }
}

pub async fn indices(ctx: &AppContext) -> anyhow::Result<()> {
    let mut sp = Spinner::new(Spinners::Point, "Fetching Indian indices...");
    sp.start();
    let indices = ctx.backend.fetch_indian_indices().await;
    sp.stop();

    let formatted_indices: Vec<StringifiedIndex> =
        indices?.into_iter().map(StringifiedIndex::from).collect();

    println!("\n");
    println!("{}", Table::new(&formatted_indices));
    Ok(())
}
