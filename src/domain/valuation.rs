//! Discounted-cash-flow valuation with a Gordon-growth terminal value.

use super::error::AnalysisError;
use super::forecast::ForecastSeries;

pub const DEFAULT_TERMINAL_GROWTH: f64 = 0.02;

/// Components of a DCF valuation.
#[derive(Debug, Clone, PartialEq)]
pub struct DcfBreakdown {
    /// net_i / (1 + d)^i for i = 1..=N
    pub discounted_cash_flows: Vec<f64>,
    /// net_N * (1 + g) / (d - g)
    pub terminal_value: f64,
    /// terminal_value / (1 + d)^N
    pub discounted_terminal_value: f64,
    pub valuation: f64,
}

impl DcfBreakdown {
    pub fn explicit_period_value(&self) -> f64 {
        self.discounted_cash_flows.iter().sum()
    }
}

/// DCF valuation of a forecast.
///
/// Fails with a schema error on an empty forecast and with a domain error
/// unless `discount_rate > terminal_growth`.
pub fn dcf_valuation(
    forecast: &ForecastSeries,
    discount_rate: f64,
    terminal_growth: f64,
) -> Result<f64, AnalysisError> {
    dcf_breakdown(forecast, discount_rate, terminal_growth).map(|b| b.valuation)
}

pub fn dcf_breakdown(
    forecast: &ForecastSeries,
    discount_rate: f64,
    terminal_growth: f64,
) -> Result<DcfBreakdown, AnalysisError> {
    let last_net = forecast
        .records()
        .last()
        .map(|r| r.net_cash_flow())
        .ok_or_else(|| AnalysisError::schema("forecast must contain at least one period"))?;

    if !discount_rate.is_finite() || !terminal_growth.is_finite() {
        return Err(AnalysisError::domain(format!(
            "rates must be finite (discount_rate={}, terminal_growth={})",
            discount_rate, terminal_growth
        )));
    }
    if discount_rate <= -1.0 {
        return Err(AnalysisError::domain(format!(
            "discount_rate must be greater than -1, got {}",
            discount_rate
        )));
    }
    if discount_rate <= terminal_growth {
        return Err(AnalysisError::domain(format!(
            "discount_rate ({}) must be greater than terminal_growth ({})",
            discount_rate, terminal_growth
        )));
    }

    let base = 1.0 + discount_rate;
    let discounted_cash_flows: Vec<f64> = forecast
        .net_cash_flows()
        .enumerate()
        .map(|(i, cf)| cf / base.powi(i as i32 + 1))
        .collect();

    let n = forecast.len() as i32;
    let terminal_value = last_net * (1.0 + terminal_growth) / (discount_rate - terminal_growth);
    let discounted_terminal_value = terminal_value / base.powi(n);
    let valuation = discounted_cash_flows.iter().sum::<f64>() + discounted_terminal_value;

    tracing::debug!(discount_rate, terminal_growth, valuation, "dcf valuation");

    Ok(DcfBreakdown {
        discounted_cash_flows,
        terminal_value,
        discounted_terminal_value,
        valuation,
    })
}
