use std::{io::Read, str::FromStr};

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::models::cash_flow::CashFlow;

#[derive(Debug, Deserialize)]
struct CashFlowRecord {
    date: String,
    amount: String,
}

pub fn parse_date(input: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_str(input.trim())
        .with_context(|| format!("'{}' is not a date in YYYY-MM-DD form", input.trim()))
}

fn parse_amount(input: &str) -> anyhow::Result<f64> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    let amount = cleaned
        .parse::<f64>()
        .with_context(|| format!("'{}' is not an amount", input.trim()))?;
    if !amount.is_finite() {
        return Err(anyhow!("'{}' is not a finite amount", input.trim()));
    }
    Ok(amount)
}

/// Parses `DATE:AMOUNT`, e.g. `2024-01-01:-10000`.
pub fn parse_cash_flow_arg(input: &str) -> anyhow::Result<CashFlow> {
    let (date, amount) = input
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected DATE:AMOUNT, got '{}'", input))?;
    Ok(CashFlow::new(parse_date(date)?, parse_amount(amount)?))
}

/// Reads a `date,amount` CSV with a header row.
pub fn read_cash_flows_csv<R: Read>(reader: R) -> anyhow::Result<Vec<CashFlow>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut cash_flows = vec![];
    for (line, record) in rdr.deserialize::<CashFlowRecord>().enumerate() {
        // header is line 1
        let record = record.with_context(|| format!("Invalid cash flow on line {}", line + 2))?;
        cash_flows.push(CashFlow::new(
            parse_date(&record.date)?,
            parse_amount(&record.amount)?,
        ));
    }
    Ok(cash_flows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_argument_accepts_negative_amounts() {
        let flow = parse_cash_flow_arg("2024-01-01:-10,000").unwrap();
        assert_eq!(flow.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(flow.amount, -10_000.0);
    }

    #[test]
    fn malformed_flow_arguments_are_rejected() {
        assert!(parse_cash_flow_arg("2024-01-01").is_err());
        assert!(parse_cash_flow_arg("01/01/2024:100").is_err());
        assert!(parse_cash_flow_arg("2024-01-01:lots").is_err());
        assert!(parse_cash_flow_arg("2024-01-01:inf").is_err());
    }

    #[test]
    fn csv_with_header_is_read_in_order() {
        let csv = "date,amount\n2024-01-01, -5000\n2024-07-01,-5000\n2025-01-01,11000\n";
        let flows = read_cash_flows_csv(csv.as_bytes()).unwrap();

        assert_eq!(flows.len(), 3);
        assert_eq!(flows[2].amount, 11_000.0);
        assert_eq!(flows[1].date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn csv_error_names_the_line() {
        let csv = "date,amount\n2024-01-01,-5000\n2024-07-01\n";
        let err = read_cash_flows_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"), "{err:#}");
    }
}
