//! Growth x discount sensitivity sweep.
//!
//! Every grid cell runs the forecaster and the valuator independently. A cell
//! whose rates violate a precondition holds `NaN` instead of failing the sweep.

use serde::{Deserialize, Serialize};

use super::cash_flow::CashFlowSeries;
use super::error::AnalysisError;
use super::forecast::forecast;
use super::valuation::{dcf_valuation, DEFAULT_TERMINAL_GROWTH};

const RATE_DECIMALS: f64 = 1e10;
const KEY_TOLERANCE: f64 = 1e-9;
/// Upper bound on steps either side of a base rate.
pub const MAX_AXIS_STEPS: i64 = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityConfig {
    /// Distance from the base rate to each end of an axis.
    pub span: f64,
    pub step: f64,
    pub periods: usize,
    pub terminal_growth: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            span: 0.02,
            step: 0.01,
            periods: 12,
            terminal_growth: DEFAULT_TERMINAL_GROWTH,
        }
    }
}

impl SensitivityConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(AnalysisError::domain("sensitivity step must be positive"));
        }
        if !self.span.is_finite() || self.span < 0.0 {
            return Err(AnalysisError::domain("sensitivity span must be non-negative"));
        }
        let steps = (self.span / self.step).round();
        if steps > MAX_AXIS_STEPS as f64 {
            return Err(AnalysisError::domain(format!(
                "sensitivity span/step gives {} steps per side, limit is {}",
                steps, MAX_AXIS_STEPS
            )));
        }
        if self.periods == 0 {
            return Err(AnalysisError::domain("sensitivity periods must be at least 1"));
        }
        Ok(())
    }

    /// Number of steps on each side of the base rate, clamped to
    /// `0..=MAX_AXIS_STEPS`.
    fn half_width(&self) -> i64 {
        let steps = (self.span / self.step).round();
        if steps.is_nan() {
            0
        } else {
            steps.clamp(0.0, MAX_AXIS_STEPS as f64) as i64
        }
    }

    /// `base + k*step` for k in -n..=n, inclusive of both endpoints.
    pub fn axis(&self, base: f64) -> Vec<f64> {
        let n = self.half_width();
        (-n..=n)
            .map(|k| round_rate(base + k as f64 * self.step))
            .collect()
    }
}

fn round_rate(rate: f64) -> f64 {
    (rate * RATE_DECIMALS).round() / RATE_DECIMALS
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCell {
    #[serde(rename = "Growth Rate")]
    pub growth_rate: f64,
    #[serde(rename = "Discount Rate")]
    pub discount_rate: f64,
    /// `NaN` when the rate pair is invalid.
    #[serde(rename = "Valuation")]
    pub valuation: f64,
}

impl SensitivityCell {
    pub fn is_valid(&self) -> bool {
        !self.valuation.is_nan()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensitivityGrid {
    /// Growth outer, discount inner.
    pub cells: Vec<SensitivityCell>,
}

/// Growth rows x discount columns view of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityTable {
    pub growth_rates: Vec<f64>,
    pub discount_rates: Vec<f64>,
    /// `values[row][col]` is the valuation for `growth_rates[row]`, `discount_rates[col]`.
    pub values: Vec<Vec<f64>>,
}

impl SensitivityGrid {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell for a rate pair, independent of its position in the grid.
    pub fn get(&self, growth_rate: f64, discount_rate: f64) -> Option<&SensitivityCell> {
        self.cells.iter().find(|c| {
            (c.growth_rate - growth_rate).abs() < KEY_TOLERANCE
                && (c.discount_rate - discount_rate).abs() < KEY_TOLERANCE
        })
    }

    pub fn valid_cells(&self) -> impl Iterator<Item = &SensitivityCell> {
        self.cells.iter().filter(|c| c.is_valid())
    }

    pub fn pivot(&self) -> SensitivityTable {
        let mut growth_rates: Vec<f64> = Vec::new();
        let mut discount_rates: Vec<f64> = Vec::new();
        for c in &self.cells {
            if !growth_rates.iter().any(|g| (g - c.growth_rate).abs() < KEY_TOLERANCE) {
                growth_rates.push(c.growth_rate);
            }
            if !discount_rates.iter().any(|d| (d - c.discount_rate).abs() < KEY_TOLERANCE) {
                discount_rates.push(c.discount_rate);
            }
        }
        growth_rates.sort_by(f64::total_cmp);
        discount_rates.sort_by(f64::total_cmp);

        let values = growth_rates
            .iter()
            .map(|&g| {
                discount_rates
                    .iter()
                    .map(|&d| self.get(g, d).map(|c| c.valuation).unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();

        SensitivityTable {
            growth_rates,
            discount_rates,
            values,
        }
    }
}

/// Default 5 x 5 sweep around the base rates (±0.02 in 0.01 steps, 12
/// forecast periods, 2% terminal growth). Never fails.
pub fn sensitivity_analysis(
    series: &CashFlowSeries,
    base_growth: f64,
    base_discount: f64,
) -> SensitivityGrid {
    sweep(series, base_growth, base_discount, &SensitivityConfig::default())
}

/// Sweep with a custom grid shape. Only an invalid `config` is an error; bad
/// rate pairs still produce `NaN` cells.
pub fn sensitivity_analysis_with(
    series: &CashFlowSeries,
    base_growth: f64,
    base_discount: f64,
    config: &SensitivityConfig,
) -> Result<SensitivityGrid, AnalysisError> {
    config.validate()?;
    Ok(sweep(series, base_growth, base_discount, config))
}

fn sweep(
    series: &CashFlowSeries,
    base_growth: f64,
    base_discount: f64,
    config: &SensitivityConfig,
) -> SensitivityGrid {
    let growth_rates = config.axis(base_growth);
    let discount_rates = config.axis(base_discount);

    let mut cells = Vec::with_capacity(growth_rates.len() * discount_rates.len());
    for &g in &growth_rates {
        // One forecast per growth rate serves the whole discount row.
        let projected = forecast(series, config.periods, g);
        for &d in &discount_rates {
            let valuation = match &projected {
                Ok(f) => match dcf_valuation(f, d, config.terminal_growth) {
                    Ok(v) => v,
                    Err(e) => invalid_cell(g, d, &e),
                },
                Err(e) => invalid_cell(g, d, e),
            };
            cells.push(SensitivityCell {
                growth_rate: g,
                discount_rate: d,
                valuation,
            });
        }
    }

    tracing::debug!(
        cells = cells.len(),
        invalid = cells.iter().filter(|c| !c.is_valid()).count(),
        "sensitivity sweep complete"
    );

    SensitivityGrid { cells }
}

// Forecaster and valuator only fail on schema or domain preconditions.
fn invalid_cell(growth_rate: f64, discount_rate: f64, err: &AnalysisError) -> f64 {
    debug_assert!(err.is_recoverable());
    tracing::debug!(growth_rate, discount_rate, error = %err, "sensitivity cell invalid");
    f64::NAN
}
