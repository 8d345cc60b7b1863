//! Renewable-energy risk-adjusted return metric (RARM).
//!
//! rarm = (valuation / initial_investment) * (1 - mean risk score), with each
//! risk factor scored from 0 (none) to 1 (extreme).

use super::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskFactors {
    /// Subsidy or regulatory change.
    pub policy: f64,
    /// Weather-driven generation variability.
    pub intermittency: f64,
    pub market: f64,
    pub operational: f64,
}

impl Default for RiskFactors {
    fn default() -> Self {
        Self {
            policy: 0.2,
            intermittency: 0.2,
            market: 0.2,
            operational: 0.2,
        }
    }
}

impl RiskFactors {
    fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("policy", self.policy),
            ("intermittency", self.intermittency),
            ("market", self.market),
            ("operational", self.operational),
        ]
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, value) in self.named() {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::domain(format!(
                    "{} risk must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Equal-weighted mean of the four factors.
    pub fn total_score(&self) -> f64 {
        self.named().iter().map(|(_, v)| v).sum::<f64>() / 4.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAdjustedReturn {
    pub total_risk_score: f64,
    /// Fraction, e.g. 0.25 = 25%.
    pub rarm: f64,
}

pub fn risk_adjusted_return(
    valuation: f64,
    initial_investment: f64,
    risk: &RiskFactors,
) -> Result<RiskAdjustedReturn, AnalysisError> {
    if !initial_investment.is_finite() || initial_investment <= 0.0 {
        return Err(AnalysisError::domain(format!(
            "initial_investment must be positive, got {}",
            initial_investment
        )));
    }
    if !valuation.is_finite() {
        return Err(AnalysisError::domain("valuation must be finite"));
    }
    risk.validate()?;

    let total_risk_score = risk.total_score();
    Ok(RiskAdjustedReturn {
        total_risk_score,
        rarm: (valuation / initial_investment) * (1.0 - total_risk_score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_factors_score_twenty_percent() {
        let r = risk_adjusted_return(1_500_000.0, 1_000_000.0, &RiskFactors::default()).unwrap();
        assert!((r.total_risk_score - 0.2).abs() < 1e-12);
        assert!((r.rarm - 1.2).abs() < 1e-12);
    }

    #[test]
    fn uneven_factors_average() {
        let risk = RiskFactors {
            policy: 0.0,
            intermittency: 1.0,
            market: 0.5,
            operational: 0.5,
        };
        let r = risk_adjusted_return(100.0, 100.0, &risk).unwrap();
        assert!((r.total_risk_score - 0.5).abs() < 1e-12);
        assert!((r.rarm - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_investment() {
        assert!(matches!(
            risk_adjusted_return(100.0, 0.0, &RiskFactors::default()),
            Err(AnalysisError::Domain { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_factor() {
        let risk = RiskFactors {
            market: 1.5,
            ..RiskFactors::default()
        };
        let err = risk_adjusted_return(100.0, 100.0, &risk).unwrap_err();
        assert!(err.to_string().contains("market"));
    }
}
