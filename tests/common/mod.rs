#![allow(dead_code)]

use chrono::NaiveDate;
use renewcast::domain::cash_flow::{CashFlowRecord, CashFlowSeries};
use renewcast::domain::error::AnalysisError;
use renewcast::domain::financial_report::FinancialReport;
use renewcast::domain::forecast::ForecastSeries;
use renewcast::domain::sensitivity::SensitivityGrid;
use renewcast::domain::trial_balance::TrialBalance;
use renewcast::ports::data_port::DataPort;
use renewcast::ports::ledger_port::LedgerPort;
use renewcast::ports::rate_port::RatePort;
use renewcast::ports::report_port::ReportPort;
use std::cell::RefCell;

pub struct MockDataPort {
    pub series: Option<CashFlowSeries>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(series: CashFlowSeries) -> Self {
        Self {
            series: Some(series),
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            series: None,
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_cash_flows(&self) -> Result<CashFlowSeries, AnalysisError> {
        if let Some(reason) = &self.error {
            return Err(AnalysisError::schema(reason.clone()));
        }
        Ok(self.series.clone().unwrap_or_default())
    }
}

pub struct MockRatePort(pub Option<f64>);

impl RatePort for MockRatePort {
    fn discount_rate(&self) -> Result<f64, AnalysisError> {
        self.0
            .ok_or_else(|| AnalysisError::resource("rate feed offline"))
    }
}

pub struct MockLedgerPort {
    pub balance: Option<TrialBalance>,
}

impl LedgerPort for MockLedgerPort {
    fn load_trial_balance(&self) -> Result<TrialBalance, AnalysisError> {
        self.balance
            .clone()
            .ok_or_else(|| AnalysisError::resource("ledger missing"))
    }
}

/// Records what was exported instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingReportPort {
    pub forecasts: RefCell<Vec<ForecastSeries>>,
    pub grids: RefCell<Vec<SensitivityGrid>>,
    pub reports: RefCell<Vec<FinancialReport>>,
}

impl ReportPort for RecordingReportPort {
    fn write_forecast(&self, forecast: &ForecastSeries) -> Result<(), AnalysisError> {
        self.forecasts.borrow_mut().push(forecast.clone());
        Ok(())
    }

    fn write_sensitivity(&self, grid: &SensitivityGrid) -> Result<(), AnalysisError> {
        self.grids.borrow_mut().push(grid.clone());
        Ok(())
    }

    fn write_financial_report(&self, report: &FinancialReport) -> Result<(), AnalysisError> {
        self.reports.borrow_mut().push(*report);
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Six monthly records, January to June 2024, ending at 125000 in / 92000 out.
pub fn sample_series() -> CashFlowSeries {
    let inflows = [100_000.0, 120_000.0, 110_000.0, 130_000.0, 115_000.0, 125_000.0];
    let outflows = [80_000.0, 90_000.0, 85_000.0, 95_000.0, 87_000.0, 92_000.0];
    CashFlowSeries::new(
        inflows
            .iter()
            .zip(outflows.iter())
            .enumerate()
            .map(|(i, (&inflow, &outflow))| {
                CashFlowRecord::new(date(2024, i as u32 + 1, 1), inflow, outflow)
            })
            .collect(),
    )
}

pub fn sample_series_with_budget(budget: f64) -> CashFlowSeries {
    CashFlowSeries::new(
        sample_series()
            .into_records()
            .into_iter()
            .map(|r| r.with_budget(budget))
            .collect(),
    )
}

pub const SAMPLE_CSV: &str = "Date,Inflow,Outflow,Budget\n\
2024-01-01,100000,80000,105000\n\
2024-02-01,120000,90000,105000\n\
2024-03-01,110000,85000,105000\n\
2024-04-01,130000,95000,105000\n\
2024-05-01,115000,87000,105000\n\
2024-06-01,125000,92000,105000\n";
