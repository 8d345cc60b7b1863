//! CSV file cash-flow adapter.

use crate::domain::cash_flow::{CashFlowRecord, CashFlowSeries};
use crate::domain::error::AnalysisError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Header names for each field. Matching is case-insensitive and ignores
/// surrounding whitespace.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub date: String,
    pub inflow: String,
    pub outflow: String,
    /// Used when the header exists; a missing budget column is not an error.
    pub budget: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: "Date".into(),
            inflow: "Inflow".into(),
            outflow: "Outflow".into(),
            budget: Some("Budget".into()),
        }
    }
}

impl ColumnMapping {
    /// Reads `[data]` overrides, falling back to the default header names.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        Self {
            date: config.get_string("data", "date_column").unwrap_or(defaults.date),
            inflow: config
                .get_string("data", "inflow_column")
                .unwrap_or(defaults.inflow),
            outflow: config
                .get_string("data", "outflow_column")
                .unwrap_or(defaults.outflow),
            budget: config
                .get_string("data", "budget_column")
                .or(defaults.budget),
        }
    }
}

pub struct CsvAdapter {
    path: PathBuf,
    mapping: ColumnMapping,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self::with_mapping(path, ColumnMapping::default())
    }

    pub fn with_mapping(path: PathBuf, mapping: ColumnMapping) -> Self {
        Self { path, mapping }
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
}

fn require_column(headers: &csv::StringRecord, name: &str) -> Result<usize, AnalysisError> {
    find_column(headers, name).ok_or_else(|| {
        AnalysisError::schema(format!(
            "missing required column '{}' (found: {})",
            name,
            headers.iter().collect::<Vec<_>>().join(", ")
        ))
    })
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn parse_amount(value: &str, field: &str, line: u64) -> Result<f64, AnalysisError> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',' && *c != '$').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AnalysisError::schema(format!(
            "line {}: {} value '{}' is not numeric",
            line, field, value
        ))),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_cash_flows(&self) -> Result<CashFlowSeries, AnalysisError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| {
                AnalysisError::resource(format!("failed to read {}: {}", self.path.display(), e))
            })?;
        let headers = rdr
            .headers()
            .map_err(|e| AnalysisError::schema(format!("CSV header error: {}", e)))?
            .clone();

        let date_idx = require_column(&headers, &self.mapping.date)?;
        let inflow_idx = require_column(&headers, &self.mapping.inflow)?;
        let outflow_idx = require_column(&headers, &self.mapping.outflow)?;
        let budget_idx = self
            .mapping
            .budget
            .as_deref()
            .and_then(|name| find_column(&headers, name));

        let mut records = Vec::new();
        for result in rdr.records() {
            let record =
                result.map_err(|e| AnalysisError::schema(format!("CSV parse error: {}", e)))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let date_str = record.get(date_idx).unwrap_or("");
            let date = parse_date(date_str).ok_or_else(|| {
                AnalysisError::schema(format!(
                    "line {}: date '{}' could not be parsed (expected YYYY-MM-DD)",
                    line, date_str
                ))
            })?;
            let inflow = parse_amount(record.get(inflow_idx).unwrap_or(""), "inflow", line)?;
            let outflow = parse_amount(record.get(outflow_idx).unwrap_or(""), "outflow", line)?;
            let budget = match budget_idx.and_then(|i| record.get(i)) {
                Some(v) if !v.trim().is_empty() => Some(parse_amount(v, "budget", line)?),
                _ => None,
            };

            records.push(CashFlowRecord {
                date,
                inflow,
                outflow,
                budget,
            });
        }

        if records.is_empty() {
            return Err(AnalysisError::schema(format!(
                "{} contains no cash-flow rows",
                self.path.display()
            )));
        }

        tracing::debug!(path = %self.path.display(), rows = records.len(), "cash flows loaded");
        Ok(CashFlowSeries::new(records))
    }
}
