//! Report export port.

use crate::domain::error::AnalysisError;
use crate::domain::financial_report::FinancialReport;
use crate::domain::forecast::ForecastSeries;
use crate::domain::sensitivity::SensitivityGrid;

/// Sink for analysis results. The destination is fixed when the adapter is
/// constructed.
pub trait ReportPort {
    fn write_forecast(&self, forecast: &ForecastSeries) -> Result<(), AnalysisError>;

    fn write_sensitivity(&self, grid: &SensitivityGrid) -> Result<(), AnalysisError>;

    fn write_financial_report(&self, report: &FinancialReport) -> Result<(), AnalysisError>;
}
