//! Cash-flow data access port.

use crate::domain::cash_flow::CashFlowSeries;
use crate::domain::error::AnalysisError;

/// Source of historical cash flows. Implementations reject unparseable rows
/// before handing the series to the domain.
pub trait DataPort {
    fn fetch_cash_flows(&self) -> Result<CashFlowSeries, AnalysisError>;
}
