use std::io::{self, Write};

use num_format::{Locale, ToFormattedString};
use owo_colors::{OwoColorize, Style};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_decimal_macros::dec;

pub const UNAVAILABLE: &str = "—";

pub fn confirm_action(action: &str) -> bool {
    print!("Would you like to {}? (y/n): ", action);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn format_currency(amount: Decimal, round: bool) -> String {
    if round {
        let amount_rounded: i64 = amount.round().to_i64().unwrap_or_default();
        format!("₹ {}", amount_rounded.to_formatted_string(&Locale::en_IN))
    } else {
        let rounded = amount.round_dp(2);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let absolute = rounded.abs();
        let whole = absolute.trunc().to_i64().unwrap_or_default();
        let paise = (absolute.fract() * dec!(100)).to_i64().unwrap_or_default();
        format!(
            "₹ {}{}.{:02}",
            sign,
            whole.to_formatted_string(&Locale::en_IN),
            paise
        )
    }
}

pub fn format_optional_currency(amount: Option<Decimal>) -> String {
    amount
        .map(|amount| format_currency(amount, false))
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

pub fn format_number(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => (v.round() as i64).to_formatted_string(&Locale::en_IN),
        None => UNAVAILABLE.to_string(),
    }
}

pub fn format_ratio(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}", v),
        None => UNAVAILABLE.to_string(),
    }
}

fn change_style(value: f64) -> Style {
    if value >= 0.0 {
        Style::new().green().bold()
    } else {
        Style::new().red().bold()
    }
}

/// Signed percentage, green for gains and red for losses.
pub fn format_change(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}", format!("{:+.2}%", v).style(change_style(v))),
        None => UNAVAILABLE.to_string(),
    }
}

pub fn format_plain_percent(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}%", v),
        None => UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_indian_digit_grouping() {
        assert_eq!(format_currency(dec!(1234567.4), true), "₹ 12,34,567");
        assert_eq!(format_currency(dec!(1234567.456), false), "₹ 12,34,567.46");
        assert_eq!(format_currency(dec!(-1500.5), false), "₹ -1,500.50");
        assert_eq!(format_currency(dec!(0), false), "₹ 0.00");
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(format_optional_currency(None), UNAVAILABLE);
        assert_eq!(format_number(None), UNAVAILABLE);
        assert_eq!(format_ratio(Some(f64::NAN)), UNAVAILABLE);
        assert_eq!(format_change(None), UNAVAILABLE);
        assert_eq!(format_plain_percent(Some(12.5)), "12.50%");
    }
}
