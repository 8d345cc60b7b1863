//! Historical cash-flow records.

use chrono::NaiveDate;

use super::error::AnalysisError;

#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowRecord {
    pub date: NaiveDate,
    pub inflow: f64,
    pub outflow: f64,
    pub budget: Option<f64>,
}

impl CashFlowRecord {
    pub fn new(date: NaiveDate, inflow: f64, outflow: f64) -> Self {
        Self {
            date,
            inflow,
            outflow,
            budget: None,
        }
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// inflow - outflow
    pub fn net(&self) -> f64 {
        self.inflow - self.outflow
    }
}

/// Date-ordered sequence of cash-flow records. Only [`CashFlowSeries::new`]
/// builds one, so the last record is always the latest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashFlowSeries {
    records: Vec<CashFlowRecord>,
}

impl CashFlowSeries {
    /// Builds a series sorted ascending by date. Duplicate dates are kept in
    /// input order.
    pub fn new(mut records: Vec<CashFlowRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[CashFlowRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CashFlowRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&CashFlowRecord> {
        self.records.last()
    }

    /// True when at least one record carries a budget figure.
    pub fn has_budget(&self) -> bool {
        self.records.iter().any(|r| r.budget.is_some())
    }

    pub fn total_inflow(&self) -> f64 {
        self.records.iter().map(|r| r.inflow).sum()
    }

    pub fn total_outflow(&self) -> f64 {
        self.records.iter().map(|r| r.outflow).sum()
    }

    /// Sum of the budget figures that are present.
    pub fn total_budget(&self) -> f64 {
        self.records.iter().filter_map(|r| r.budget).sum()
    }

    /// Checks the invariants every analysis relies on: at least one record,
    /// finite non-negative flows and finite budgets.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.records.is_empty() {
            return Err(AnalysisError::schema(
                "cash-flow series must contain at least one record",
            ));
        }

        for r in &self.records {
            if !r.inflow.is_finite() || r.inflow < 0.0 {
                return Err(AnalysisError::schema(format!(
                    "inflow on {} must be a finite non-negative amount, got {}",
                    r.date, r.inflow
                )));
            }
            if !r.outflow.is_finite() || r.outflow < 0.0 {
                return Err(AnalysisError::schema(format!(
                    "outflow on {} must be a finite non-negative amount, got {}",
                    r.date, r.outflow
                )));
            }
            if let Some(b) = r.budget {
                if !b.is_finite() {
                    return Err(AnalysisError::schema(format!(
                        "budget on {} must be finite, got {}",
                        r.date, b
                    )));
                }
            }
        }

        Ok(())
    }
}
