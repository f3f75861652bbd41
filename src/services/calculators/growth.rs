use serde::Serialize;

/// Compound annual growth rate in percent. Degenerate inputs yield 0.
pub fn cagr(initial_value: f64, final_value: f64, years: f64) -> f64 {
    if initial_value <= 0.0 || final_value < 0.0 || years <= 0.0 {
        return 0.0;
    }
    ((final_value / initial_value).powf(1.0 / years) - 1.0) * 100.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Projection {
    pub invested: f64,
    pub total: f64,
    pub returns: f64,
    /// `total` expressed in today's money.
    pub inflation_adjusted_total: f64,
    /// Share of today's purchasing power the future total retains, in percent.
    pub purchasing_power: f64,
}

impl Projection {
    fn new(invested: f64, total: f64, years: f64, inflation_rate: f64) -> Self {
        let inflation_adjusted_total = total / (1.0 + inflation_rate / 100.0).powf(years);
        let purchasing_power = if total > 0.0 {
            inflation_adjusted_total / total * 100.0
        } else {
            0.0
        };
        Projection {
            invested,
            total,
            returns: total - invested,
            inflation_adjusted_total,
            purchasing_power,
        }
    }
}

/// Future value of a monthly SIP, contributions at the start of each month.
///
/// `annual_rate` and `inflation_rate` are percentages.
pub fn sip_projection(
    monthly_investment: f64,
    annual_rate: f64,
    years: f64,
    inflation_rate: f64,
) -> Projection {
    if monthly_investment <= 0.0 || years <= 0.0 {
        return Projection::default();
    }

    let months = years * 12.0;
    let monthly_rate = annual_rate / 12.0 / 100.0;
    let invested = monthly_investment * months;

    let total = if monthly_rate == 0.0 {
        invested
    } else {
        monthly_investment * ((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate
            * (1.0 + monthly_rate)
    };

    Projection::new(invested, total, years, inflation_rate)
}

/// Future value of a single investment compounded annually.
pub fn lumpsum_projection(
    amount: f64,
    annual_rate: f64,
    years: f64,
    inflation_rate: f64,
) -> Projection {
    if amount <= 0.0 || years <= 0.0 {
        return Projection::default();
    }

    let total = amount * (1.0 + annual_rate / 100.0).powf(years);
    Projection::new(amount, total, years, inflation_rate)
}
