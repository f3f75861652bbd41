//! Annualised internal rate of return for irregularly dated cash flows.
//!
//! Newton-Raphson over the net present value, with the day count simplified
//! to `days / 365`. A single fixed starting guess is used; patterns with
//! several sign changes may have several roots or none, and whichever root
//! the iteration lands on (if any) is reported.

use thiserror::Error;
use tracing::debug;

use crate::models::cash_flow::CashFlow;

pub const INITIAL_GUESS: f64 = 0.10;
const TOLERANCE: f64 = 1e-6;
const MAX_ITERATIONS: usize = 100;
const MIN_DERIVATIVE: f64 = 1e-10;
const MIN_PLAUSIBLE_RATE: f64 = -0.99;
const MAX_PLAUSIBLE_RATE: f64 = 10.0;
const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum XirrError {
    #[error("at least two cash flows are required, got {0}")]
    InsufficientCashFlows(usize),
    #[error("cash flows need at least one negative and one positive amount")]
    Sign,
    #[error("derivative of the NPV vanished at rate {rate}")]
    ZeroDerivative { rate: f64 },
    #[error("no convergence within {0} iterations")]
    NonConvergence(usize),
    #[error("solved rate {0} lies outside the plausible range")]
    ImplausibleRate(f64),
}

/// (years since the first flow, amount), ordered by date.
fn time_weighted_flows(cash_flows: &[CashFlow]) -> Vec<(f64, f64)> {
    let mut sorted = cash_flows.to_vec();
    sorted.sort_by_key(|flow| flow.date);

    let first_date = sorted[0].date;
    sorted
        .iter()
        .map(|flow| {
            let days = (flow.date - first_date).num_days() as f64;
            (days / DAYS_PER_YEAR, flow.amount)
        })
        .collect()
}

fn npv(flows: &[(f64, f64)], rate: f64) -> f64 {
    flows
        .iter()
        .map(|(years, amount)| amount / (1.0 + rate).powf(*years))
        .sum()
}

fn npv_derivative(flows: &[(f64, f64)], rate: f64) -> f64 {
    flows
        .iter()
        .map(|(years, amount)| -(amount * years) / (1.0 + rate).powf(years + 1.0))
        .sum()
}

pub fn solve_xirr(cash_flows: &[CashFlow]) -> Result<f64, XirrError> {
    if cash_flows.len() < 2 {
        return Err(XirrError::InsufficientCashFlows(cash_flows.len()));
    }
    let has_outflow = cash_flows.iter().any(|flow| flow.amount < 0.0);
    let has_inflow = cash_flows.iter().any(|flow| flow.amount > 0.0);
    if !has_outflow || !has_inflow {
        return Err(XirrError::Sign);
    }

    let flows = time_weighted_flows(cash_flows);
    let mut rate = INITIAL_GUESS;

    for iteration in 0..MAX_ITERATIONS {
        let value = npv(&flows, rate);
        if value.abs() < TOLERANCE {
            debug!(rate, iteration, "xirr converged");
            if !(MIN_PLAUSIBLE_RATE..=MAX_PLAUSIBLE_RATE).contains(&rate) {
                return Err(XirrError::ImplausibleRate(rate));
            }
            return Ok(rate);
        }

        let derivative = npv_derivative(&flows, rate);
        if derivative.abs() < MIN_DERIVATIVE {
            return Err(XirrError::ZeroDerivative { rate });
        }

        rate -= value / derivative;
        if !rate.is_finite() {
            return Err(XirrError::NonConvergence(iteration + 1));
        }
    }

    Err(XirrError::NonConvergence(MAX_ITERATIONS))
}

/// XIRR as a fraction (0.12 is 12 % p.a.), or `None` when no sensible rate exists.
pub fn xirr(cash_flows: &[CashFlow]) -> Option<f64> {
    match solve_xirr(cash_flows) {
        Ok(rate) => Some(rate),
        Err(e) => {
            debug!("xirr unavailable: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    }

    #[test]
    fn one_year_ten_percent_round_trip() {
        let flows = [CashFlow::new(day(0), -10_000.0), CashFlow::new(day(365), 11_000.0)];
        let rate = xirr(&flows).unwrap();
        assert!((rate - 0.10).abs() < 1e-4, "got {rate}");
    }

    #[test]
    fn input_order_does_not_matter() {
        let flows = [
            CashFlow::new(day(730), 12_500.0),
            CashFlow::new(day(0), -5_000.0),
            CashFlow::new(day(365), -5_000.0),
        ];
        let rate = xirr(&flows).unwrap();

        let mut reversed = flows;
        reversed.reverse();
        assert_eq!(xirr(&reversed), Some(rate));
        assert!(rate > 0.0 && rate < 1.0);
    }

    #[test]
    fn monthly_investments_with_final_redemption() {
        let mut flows: Vec<CashFlow> = (0..12)
            .map(|month| CashFlow::new(day(month * 30), -1_000.0))
            .collect();
        flows.push(CashFlow::new(day(365), 12_600.0));

        let rate = xirr(&flows).unwrap();
        // a 5 % gain on money that was invested for roughly half a year on average
        assert!(rate > 0.08 && rate < 0.12, "got {rate}");
        assert!(npv(&time_weighted_flows(&flows), rate).abs() < TOLERANCE);
    }

    #[test]
    fn fewer_than_two_flows_is_rejected() {
        assert_eq!(solve_xirr(&[]), Err(XirrError::InsufficientCashFlows(0)));
        assert_eq!(
            solve_xirr(&[CashFlow::new(day(0), -100.0)]),
            Err(XirrError::InsufficientCashFlows(1))
        );
    }

    #[test]
    fn same_sign_flows_never_yield_a_rate() {
        let all_negative = [CashFlow::new(day(0), -100.0), CashFlow::new(day(90), -50.0)];
        let all_positive = [CashFlow::new(day(0), 100.0), CashFlow::new(day(90), 50.0)];
        let zero_and_positive = [CashFlow::new(day(0), 0.0), CashFlow::new(day(90), 50.0)];

        assert_eq!(solve_xirr(&all_negative), Err(XirrError::Sign));
        assert_eq!(solve_xirr(&all_positive), Err(XirrError::Sign));
        assert_eq!(solve_xirr(&zero_and_positive), Err(XirrError::Sign));
        assert_eq!(xirr(&all_positive), None);
    }

    #[test]
    fn implausibly_high_rate_is_unavailable_not_clamped() {
        // 100 turning into 10,000 within a year converges near 9900 % p.a.
        let flows = [CashFlow::new(day(0), -100.0), CashFlow::new(day(365), 10_000.0)];

        match solve_xirr(&flows) {
            Err(XirrError::ImplausibleRate(rate)) => assert!(rate > MAX_PLAUSIBLE_RATE),
            other => panic!("expected ImplausibleRate, got {other:?}"),
        }
        assert_eq!(xirr(&flows), None);
    }

    #[test]
    fn flat_npv_reports_zero_derivative() {
        // every flow on the same day: the NPV does not depend on the rate
        let flows = [CashFlow::new(day(0), -100.0), CashFlow::new(day(0), 50.0)];
        assert!(matches!(
            solve_xirr(&flows),
            Err(XirrError::ZeroDerivative { .. })
        ));
    }

    #[test]
    fn rootless_pattern_yields_no_rate() {
        // -100 + 50x - 100x^2 is negative for every discount factor x
        let flows = [
            CashFlow::new(day(0), -100.0),
            CashFlow::new(day(365), 50.0),
            CashFlow::new(day(730), -100.0),
        ];
        assert!(solve_xirr(&flows).is_err());
        assert_eq!(xirr(&flows), None);
    }
}
