//! Benchmark-yield quote file adapter implementing RatePort.
//!
//! Reads a `Date,Close` CSV of 10-year benchmark yield quotes expressed in
//! percent (4.25 = 4.25%) and returns the most recent close as a fraction.

use crate::adapters::csv_adapter::parse_date;
use crate::domain::error::AnalysisError;
use crate::ports::rate_port::RatePort;
use std::fs;
use std::path::PathBuf;

pub struct QuoteFileRateAdapter {
    path: PathBuf,
}

impl QuoteFileRateAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RatePort for QuoteFileRateAdapter {
    fn discount_rate(&self) -> Result<f64, AnalysisError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            AnalysisError::resource(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| AnalysisError::schema(format!("quote header error: {}", e)))?
            .clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| AnalysisError::schema(format!("quote file missing '{}' column", name)))
        };
        let date_idx = find("Date")?;
        let close_idx = find("Close")?;

        let mut latest = None;
        for result in rdr.records() {
            let record =
                result.map_err(|e| AnalysisError::schema(format!("quote parse error: {}", e)))?;
            let Some(date) = record.get(date_idx).and_then(parse_date) else {
                continue;
            };
            let Some(close) = record
                .get(close_idx)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
            else {
                continue;
            };
            if latest.is_none_or(|(d, _)| date >= d) {
                latest = Some((date, close));
            }
        }

        let (date, close) = latest.ok_or_else(|| {
            AnalysisError::resource(format!("no usable quotes in {}", self.path.display()))
        })?;
        tracing::debug!(%date, close, "benchmark yield quote");
        Ok(close / 100.0)
    }
}
