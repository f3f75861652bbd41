use rust_decimal::{prelude::FromPrimitive, Decimal};

pub fn round_to_decimals(input: Decimal) -> Decimal {
    input.round_dp(2)
}

/// Calculator results are computed in `f64`; this brings them over for display.
/// Non-finite values have no decimal representation.
pub fn decimal_from_f64(input: f64) -> Option<Decimal> {
    if !input.is_finite() {
        return None;
    }
    Decimal::from_f64(input).map(round_to_decimals)
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_and_rounds_finite_values() {
        assert_eq!(decimal_from_f64(1234.5678), Some(dec!(1234.57)));
        assert_eq!(decimal_from_f64(f64::NAN), None);
        assert_eq!(decimal_from_f64(f64::INFINITY), None);
    }

    #[test]
    fn symbols_are_trimmed_and_uppercased() {
        assert_eq!(normalize_symbol("  niftybees.ns "), "NIFTYBEES.NS");
    }
}
