//! Simplified financial statements derived from a cash-flow series.
//!
//! `simplified_ebitda` is total net cash flow. It is not an earnings
//! computation: there are no accruals, interest, tax, depreciation or
//! amortisation inputs to work with.

use serde::{Deserialize, Serialize};

use super::cash_flow::CashFlowSeries;
use super::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    pub cash: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Liabilities {
    pub accounts_payable: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equity {
    pub retained_earnings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub assets: Assets,
    pub liabilities: Liabilities,
    pub equity: Equity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub simplified_ebitda: f64,
    pub total_cash_flow: f64,
    pub budget_vs_actual_variance: f64,
    /// Percent of total budget; 0 when there is no budget or it sums to 0.
    pub variance_percent: f64,
    pub balance_sheet: BalanceSheet,
}

/// Builds the report, or returns `None` and logs the cause when the series
/// is unusable.
pub fn generate_financial_report(series: &CashFlowSeries) -> Option<FinancialReport> {
    match try_financial_report(series) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!(error = %e, "financial report not generated");
            None
        }
    }
}

pub fn try_financial_report(series: &CashFlowSeries) -> Result<FinancialReport, AnalysisError> {
    series.validate()?;

    let total_inflow = series.total_inflow();
    let total_outflow = series.total_outflow();
    let total_cash_flow: f64 = series.records().iter().map(|r| r.net()).sum();
    let simplified_ebitda = total_cash_flow;

    let (budget_vs_actual_variance, variance_percent) = if series.has_budget() {
        let total_budget = series.total_budget();
        let variance = total_inflow - total_budget;
        let pct = if total_budget == 0.0 {
            0.0
        } else {
            variance / total_budget * 100.0
        };
        (variance, pct)
    } else {
        (0.0, 0.0)
    };

    Ok(FinancialReport {
        simplified_ebitda,
        total_cash_flow,
        budget_vs_actual_variance,
        variance_percent,
        balance_sheet: BalanceSheet {
            assets: Assets { cash: total_inflow },
            liabilities: Liabilities {
                accounts_payable: total_outflow,
            },
            equity: Equity {
                retained_earnings: simplified_ebitda,
            },
        },
    })
}
