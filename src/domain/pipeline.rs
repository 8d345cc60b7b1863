//! Analysis pipeline.
//!
//! AnalysisConfig carries the forecast, valuation and risk parameters for a
//! single run over one cash-flow series.

use super::cash_flow::CashFlowSeries;
use super::error::AnalysisError;
use super::financial_report::{generate_financial_report, FinancialReport};
use super::forecast::{forecast, ForecastSeries};
use super::risk::{risk_adjusted_return, RiskAdjustedReturn, RiskFactors};
use super::sensitivity::{sensitivity_analysis_with, SensitivityConfig, SensitivityGrid};
use super::valuation::{dcf_breakdown, DcfBreakdown, DEFAULT_TERMINAL_GROWTH};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub periods: usize,
    pub growth_rate: f64,
    pub discount_rate: f64,
    pub terminal_growth: f64,
    pub initial_investment: f64,
    pub risk: RiskFactors,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            periods: 12,
            growth_rate: 0.02,
            discount_rate: 0.10,
            terminal_growth: DEFAULT_TERMINAL_GROWTH,
            initial_investment: 1_000_000.0,
            risk: RiskFactors::default(),
        }
    }
}

impl AnalysisConfig {
    fn sensitivity_config(&self) -> SensitivityConfig {
        SensitivityConfig {
            periods: self.periods,
            terminal_growth: self.terminal_growth,
            ..SensitivityConfig::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub forecast: ForecastSeries,
    pub valuation: DcfBreakdown,
    pub sensitivity: SensitivityGrid,
    /// `None` when the series could not be aggregated.
    pub report: Option<FinancialReport>,
    pub risk_adjusted: RiskAdjustedReturn,
}

/// Runs the analysis and reporting paths over `series`.
///
/// Forecast, valuation and RARM errors propagate; the sensitivity sweep and
/// the financial report degrade per their own rules.
pub fn run_analysis(
    series: &CashFlowSeries,
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome, AnalysisError> {
    tracing::info!(
        records = series.len(),
        periods = config.periods,
        growth_rate = config.growth_rate,
        discount_rate = config.discount_rate,
        "running analysis"
    );

    let forecast = forecast(series, config.periods, config.growth_rate)?;
    let valuation = dcf_breakdown(&forecast, config.discount_rate, config.terminal_growth)?;
    let sensitivity = sensitivity_analysis_with(
        series,
        config.growth_rate,
        config.discount_rate,
        &config.sensitivity_config(),
    )?;
    let report = generate_financial_report(series);
    let risk_adjusted =
        risk_adjusted_return(valuation.valuation, config.initial_investment, &config.risk)?;

    tracing::info!(
        valuation = valuation.valuation,
        rarm = risk_adjusted.rarm,
        "analysis complete"
    );

    Ok(AnalysisOutcome {
        forecast,
        valuation,
        sensitivity,
        report,
        risk_adjusted,
    })
}
