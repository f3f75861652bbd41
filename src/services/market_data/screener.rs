use std::{cmp::Ordering, collections::HashSet};

use clap::ValueEnum;
use rust_decimal::prelude::ToPrimitive;

use crate::models::etf::EtfRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Symbol,
    Price,
    Change,
    Volume,
    Rsi,
    WeekReturn,
    MonthReturn,
    YearReturn,
    TwoYearReturn,
    DownFromHigh,
}

fn metric(row: &EtfRow, key: SortKey) -> Option<f64> {
    let details = row.summary.as_ref();
    match key {
        SortKey::Symbol => None,
        SortKey::Price => row.display_price().and_then(|price| price.to_f64()),
        SortKey::Change => row.change_percent(),
        SortKey::Volume => row.volume(),
        SortKey::Rsi => details.and_then(|d| d.daily_rsi),
        SortKey::WeekReturn => details.and_then(|d| d.one_week_returns),
        SortKey::MonthReturn => details.and_then(|d| d.one_month_returns),
        SortKey::YearReturn => details.and_then(|d| d.one_year_returns),
        SortKey::TwoYearReturn => details.and_then(|d| d.two_year_returns),
        SortKey::DownFromHigh => details.and_then(|d| d.down_from_two_year_high),
    }
    .filter(|value| value.is_finite())
}

/// Stable sort; rows without a value for `key` always end up last.
pub fn sort_rows(rows: &mut [EtfRow], key: SortKey, descending: bool) {
    if key == SortKey::Symbol {
        rows.sort_by(|a, b| {
            let ordering = a.symbol.cmp(&b.symbol);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        return;
    }

    rows.sort_by(|a, b| match (metric(a, key), metric(b, key)) {
        (Some(x), Some(y)) => {
            let ordering = x.total_cmp(&y);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[derive(Debug, Default, Clone)]
pub struct RowFilter {
    /// Case-insensitive substring of the symbol.
    pub search: Option<String>,
    /// Only keep these symbols.
    pub symbols: Option<HashSet<String>>,
}

impl RowFilter {
    fn matches(&self, row: &EtfRow) -> bool {
        let search_matches = match &self.search {
            Some(needle) => row
                .symbol
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            None => true,
        };
        let symbol_matches = match &self.symbols {
            Some(symbols) => symbols.contains(&row.symbol),
            None => true,
        };
        search_matches && symbol_matches
    }
}

pub fn filter_rows(rows: Vec<EtfRow>, filter: &RowFilter) -> Vec<EtfRow> {
    rows.into_iter().filter(|row| filter.matches(row)).collect()
}
