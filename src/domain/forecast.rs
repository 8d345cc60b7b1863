//! Compound-growth cash-flow forecaster.
//!
//! Projects the last observed inflow/outflow forward one month-end at a time:
//! period `i` carries `seed * (1 + growth_rate)^i`.

use chrono::{Datelike, NaiveDate};

use super::cash_flow::CashFlowSeries;
use super::error::AnalysisError;

/// One projected period. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    date: NaiveDate,
    inflow: f64,
    outflow: f64,
    net_cash_flow: f64,
}

impl ForecastRecord {
    pub fn new(date: NaiveDate, inflow: f64, outflow: f64) -> Self {
        Self {
            date,
            inflow,
            outflow,
            net_cash_flow: inflow - outflow,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn inflow(&self) -> f64 {
        self.inflow
    }

    pub fn outflow(&self) -> f64 {
        self.outflow
    }

    pub fn net_cash_flow(&self) -> f64 {
        self.net_cash_flow
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    records: Vec<ForecastRecord>,
}

impl ForecastSeries {
    pub fn from_records(records: Vec<ForecastRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn net_cash_flows(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.net_cash_flow)
    }
}

/// Projects `periods` month-end records from the last record of `series`.
///
/// `periods` must be at least 1 and the horizon must stay within the calendar;
/// `growth_rate` only has to be finite. A rate of -100% or lower is applied as
/// written (zero or sign-alternating flows).
pub fn forecast(
    series: &CashFlowSeries,
    periods: usize,
    growth_rate: f64,
) -> Result<ForecastSeries, AnalysisError> {
    series.validate()?;

    if periods == 0 {
        return Err(AnalysisError::domain("forecast periods must be at least 1"));
    }
    if !growth_rate.is_finite() {
        return Err(AnalysisError::domain(format!(
            "growth_rate must be finite, got {}",
            growth_rate
        )));
    }

    let seed = series
        .last()
        .ok_or_else(|| AnalysisError::schema("cash-flow series is empty"))?;
    let out_of_range = || {
        AnalysisError::domain(format!(
            "a {}-period forecast from {} runs past the last representable date",
            periods, seed.date
        ))
    };
    nth_month_end_after(seed.date, periods).ok_or_else(out_of_range)?;
    let factor = 1.0 + growth_rate;

    let mut records = Vec::with_capacity(periods);
    for i in 1..=periods {
        let date = nth_month_end_after(seed.date, i).ok_or_else(out_of_range)?;
        let exponent = i32::try_from(i).map_err(|_| out_of_range())?;
        let compound = factor.powi(exponent);
        records.push(ForecastRecord::new(
            date,
            seed.inflow * compound,
            seed.outflow * compound,
        ));
    }

    tracing::debug!(
        periods,
        growth_rate,
        seed_date = %seed.date,
        "forecast projected"
    );

    Ok(ForecastSeries { records })
}

/// Last day of the given month.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// The `n`-th month-end strictly after `date` (`n >= 1`). A date that is
/// already a month-end rolls to the end of the following month.
pub fn nth_month_end_after(date: NaiveDate, n: usize) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let current_end = month_end(date.year(), date.month())?;
    let month_index = i64::from(date.year()) * 12 + i64::from(date.month0());
    let first = if date < current_end {
        month_index
    } else {
        month_index + 1
    };
    let target = first.checked_add(i64::try_from(n - 1).ok()?)?;
    let year = i32::try_from(target.div_euclid(12)).ok()?;
    let month = u32::try_from(target.rem_euclid(12)).ok()? + 1;
    month_end(year, month)
}
