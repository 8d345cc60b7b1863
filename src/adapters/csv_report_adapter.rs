//! CSV report adapter implementing ReportPort.
//!
//! Writes `forecast.csv`, `sensitivity.csv` and `financial_report.csv` into
//! an output directory chosen by the caller. Currency figures in the
//! financial report are written to two decimals.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::AnalysisError;
use crate::domain::financial_report::{Assets, BalanceSheet, Equity, FinancialReport, Liabilities};
use crate::domain::forecast::ForecastSeries;
use crate::domain::sensitivity::SensitivityGrid;
use crate::ports::report_port::ReportPort;

pub const FORECAST_FILE: &str = "forecast.csv";
pub const SENSITIVITY_FILE: &str = "sensitivity.csv";
pub const FINANCIAL_REPORT_FILE: &str = "financial_report.csv";

const EBITDA: &str = "EBITDA (simplified)";
const TOTAL_CASH_FLOW: &str = "Total Cash Flow";
const VARIANCE: &str = "Budget vs Actual Variance";
const VARIANCE_PCT: &str = "Variance %";
const CASH: &str = "Cash";
const ACCOUNTS_PAYABLE: &str = "Accounts Payable";
const RETAINED_EARNINGS: &str = "Retained Earnings";

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn writer(&self, file: &str) -> Result<csv::Writer<fs::File>, AnalysisError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file);
        csv::Writer::from_path(&path).map_err(|e| csv_error(&path, e))
    }
}

fn csv_error(path: &Path, e: csv::Error) -> AnalysisError {
    AnalysisError::resource(format!("failed to write {}: {}", path.display(), e))
}

impl ReportPort for CsvReportAdapter {
    fn write_forecast(&self, forecast: &ForecastSeries) -> Result<(), AnalysisError> {
        let path = self.output_dir.join(FORECAST_FILE);
        let mut wtr = self.writer(FORECAST_FILE)?;
        wtr.write_record(["Date", "Inflow", "Outflow", "Net Cash Flow"])
            .map_err(|e| csv_error(&path, e))?;
        for r in forecast.records() {
            wtr.write_record([
                r.date().format("%Y-%m-%d").to_string(),
                format!("{:.2}", r.inflow()),
                format!("{:.2}", r.outflow()),
                format!("{:.2}", r.net_cash_flow()),
            ])
            .map_err(|e| csv_error(&path, e))?;
        }
        wtr.flush()?;
        tracing::debug!(path = %path.display(), "forecast written");
        Ok(())
    }

    fn write_sensitivity(&self, grid: &SensitivityGrid) -> Result<(), AnalysisError> {
        let path = self.output_dir.join(SENSITIVITY_FILE);
        let mut wtr = self.writer(SENSITIVITY_FILE)?;
        for cell in &grid.cells {
            wtr.serialize(cell).map_err(|e| csv_error(&path, e))?;
        }
        wtr.flush()?;
        tracing::debug!(path = %path.display(), "sensitivity grid written");
        Ok(())
    }

    fn write_financial_report(&self, report: &FinancialReport) -> Result<(), AnalysisError> {
        let path = self.output_dir.join(FINANCIAL_REPORT_FILE);
        let mut wtr = self.writer(FINANCIAL_REPORT_FILE)?;
        wtr.write_record(["Metric", "Value"])
            .map_err(|e| csv_error(&path, e))?;
        let bs = &report.balance_sheet;
        for (metric, value) in [
            (EBITDA, report.simplified_ebitda),
            (TOTAL_CASH_FLOW, report.total_cash_flow),
            (VARIANCE, report.budget_vs_actual_variance),
            (VARIANCE_PCT, report.variance_percent),
            (CASH, bs.assets.cash),
            (ACCOUNTS_PAYABLE, bs.liabilities.accounts_payable),
            (RETAINED_EARNINGS, bs.equity.retained_earnings),
        ] {
            wtr.write_record([metric.to_string(), format!("{:.2}", value)])
                .map_err(|e| csv_error(&path, e))?;
        }
        wtr.flush()?;
        tracing::debug!(path = %path.display(), "financial report written");
        Ok(())
    }
}

/// Parses a `financial_report.csv` written by [`CsvReportAdapter`].
pub fn read_financial_report(path: &Path) -> Result<FinancialReport, AnalysisError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AnalysisError::resource(format!("failed to read {}: {}", path.display(), e))
    })?;
    let mut rdr = csv::Reader::from_reader(content.as_bytes());

    let mut values: Vec<(String, f64)> = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| AnalysisError::schema(format!("CSV parse error: {}", e)))?;
        let metric = record.get(0).unwrap_or("").to_string();
        let raw = record.get(1).unwrap_or("");
        let value: f64 = raw.trim().parse().map_err(|_| {
            AnalysisError::schema(format!("metric '{}' has non-numeric value '{}'", metric, raw))
        })?;
        values.push((metric, value));
    }

    let get = |name: &str| -> Result<f64, AnalysisError> {
        values
            .iter()
            .find(|(m, _)| m == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| AnalysisError::schema(format!("financial report is missing '{}'", name)))
    };

    Ok(FinancialReport {
        simplified_ebitda: get(EBITDA)?,
        total_cash_flow: get(TOTAL_CASH_FLOW)?,
        budget_vs_actual_variance: get(VARIANCE)?,
        variance_percent: get(VARIANCE_PCT)?,
        balance_sheet: BalanceSheet {
            assets: Assets { cash: get(CASH)? },
            liabilities: Liabilities {
                accounts_payable: get(ACCOUNTS_PAYABLE)?,
            },
            equity: Equity {
                retained_earnings: get(RETAINED_EARNINGS)?,
            },
        },
    })
}
