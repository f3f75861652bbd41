use std::{fs::File, path::PathBuf};

use anyhow::{bail, Context};
use owo_colors::{OwoColorize, Style};
use tabled::{Table, Tabled};

use crate::{
    cli::shared::{format_change, format_optional_currency, format_plain_percent, UNAVAILABLE},
    models::cash_flow::CashFlow,
    services::{
        calculators::{cagr, lumpsum_projection, sip_projection, xirr, Projection},
        parsers::{parse_cash_flow_arg, read_cash_flows_csv},
        shared::util::decimal_from_f64,
    },
};

#[derive(Debug, Tabled)]
struct Field {
    field: &'static str,
    value: String,
}

fn format_amount(amount: f64) -> String {
    format_optional_currency(decimal_from_f64(amount))
}

fn print_result(label: &str, value: String) {
    let result_style = Style::new().black().on_white().bold();
    println!("{}: {}", label, value.style(result_style));
}

pub fn collect_cash_flows(flows: &[String], file: Option<&PathBuf>) -> anyhow::Result<Vec<CashFlow>> {
    let mut cash_flows = flows
        .iter()
        .map(|flow| parse_cash_flow_arg(flow))
        .collect::<anyhow::Result<Vec<_>>>()?;

    if let Some(path) = file {
        let file = File::open(path).with_context(|| format!("Couldn't open {:?}", path))?;
        cash_flows.extend(read_cash_flows_csv(file)?);
    }
    Ok(cash_flows)
}

pub fn calculate_xirr(flows: &[String], file: Option<&PathBuf>) -> anyhow::Result<()> {
    let cash_flows = collect_cash_flows(flows, file)?;
    if cash_flows.is_empty() {
        bail!("No cash flows given, pass --flow DATE:AMOUNT or --file flows.csv");
    }

    let invested: f64 = cash_flows
        .iter()
        .filter(|flow| flow.amount < 0.0)
        .map(|flow| -flow.amount)
        .sum();
    let returned: f64 = cash_flows
        .iter()
        .filter(|flow| flow.amount > 0.0)
        .map(|flow| flow.amount)
        .sum();

    println!("{} cash flows", cash_flows.len());
    println!("Invested: {}", format_amount(invested));
    println!("Returned: {}", format_amount(returned));

    let rate = xirr(&cash_flows).map(|rate| rate * 100.0);
    print_result("XIRR", format_change(rate));
    if rate.is_none() {
        println!("{}", "No plausible rate for these cash flows, run with VERBOSITY=DEBUG for details.".dimmed());
    }
    Ok(())
}

pub fn calculate_cagr(initial_value: f64, final_value: f64, years: f64) -> anyhow::Result<()> {
    let rate = cagr(initial_value, final_value, years);
    let value = if initial_value > 0.0 && years > 0.0 {
        format_change(Some(rate))
    } else {
        UNAVAILABLE.to_string()
    };
    print_result("CAGR", value);
    Ok(())
}

fn print_projection(projection: &Projection, inflation_rate: f64) {
    let mut fields = vec![
        Field {
            field: "Invested",
            value: format_amount(projection.invested),
        },
        Field {
            field: "Estimated returns",
            value: format_amount(projection.returns),
        },
        Field {
            field: "Total value",
            value: format_amount(projection.total),
        },
    ];
    if inflation_rate > 0.0 {
        fields.push(Field {
            field: "In today's money",
            value: format_amount(projection.inflation_adjusted_total),
        });
        fields.push(Field {
            field: "Purchasing power",
            value: format_plain_percent(Some(projection.purchasing_power)),
        });
    }
    println!("{}", Table::new(&fields));
}

pub fn calculate_sip(
    monthly_investment: f64,
    annual_rate: f64,
    years: f64,
    inflation_rate: f64,
) -> anyhow::Result<()> {
    if monthly_investment <= 0.0 || years <= 0.0 {
        print_result("SIP value", UNAVAILABLE.to_string());
        return Ok(());
    }
    let projection = sip_projection(monthly_investment, annual_rate, years, inflation_rate);
    print_projection(&projection, inflation_rate);
    print_result("SIP value", format_amount(projection.total));
    Ok(())
}

pub fn calculate_lumpsum(
    amount: f64,
    annual_rate: f64,
    years: f64,
    inflation_rate: f64,
) -> anyhow::Result<()> {
    if amount <= 0.0 || years <= 0.0 {
        print_result("Lump sum value", UNAVAILABLE.to_string());
        return Ok(());
    }
    let projection = lumpsum_projection(amount, annual_rate, years, inflation_rate);
    print_projection(&projection, inflation_rate);
    print_result("Lump sum value", format_amount(projection.total));
    if projection.returns < 0.0 {
        println!("{}", "Projected value is below the amount invested.".red());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn flows_from_arguments_and_file_are_combined() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,amount\n2025-01-01,11000").unwrap();
        let path = file.path().to_path_buf();

        let flows = collect_cash_flows(&["2024-01-01:-10000".to_string()], Some(&path)).unwrap();

        assert_eq!(flows.len(), 2);
        let rate = xirr(&flows).unwrap();
        assert!((rate - 0.10).abs() < 1e-3, "got {rate}");
    }

    #[test]
    fn unsolvable_flows_print_instead_of_failing() {
        let flows = ["2024-01-01:-100".to_string(), "2024-06-01:-100".to_string()];
        assert!(calculate_xirr(&flows, None).is_ok());
        assert!(calculate_xirr(&[], None).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let path = PathBuf::from("/nonexistent/flows.csv");
        assert!(collect_cash_flows(&[], Some(&path)).is_err());
    }
}
