//! Configuration validation.
//!
//! Validates the `[analysis]` and `[risk]` sections before a run.

use crate::domain::error::AnalysisError;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), AnalysisError> {
    validate_periods(config)?;
    validate_growth_rate(config)?;
    validate_discount_rate(config)?;
    validate_initial_investment(config)?;
    validate_risk_factors(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> AnalysisError {
    AnalysisError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), AnalysisError> {
    let value = config.get_int("analysis", "periods", 12);
    if value < 1 {
        return Err(invalid("analysis", "periods", "periods must be at least 1"));
    }
    Ok(())
}

fn validate_growth_rate(config: &dyn ConfigPort) -> Result<(), AnalysisError> {
    let value = config.get_double("analysis", "growth_rate", 0.02);
    if !value.is_finite() {
        return Err(invalid("analysis", "growth_rate", "growth_rate must be a number"));
    }
    Ok(())
}

fn validate_discount_rate(config: &dyn ConfigPort) -> Result<(), AnalysisError> {
    let discount = config.get_double("analysis", "discount_rate", 0.10);
    let terminal = config.get_double("analysis", "terminal_growth", 0.02);
    if !terminal.is_finite() {
        return Err(invalid(
            "analysis",
            "terminal_growth",
            "terminal_growth must be a number",
        ));
    }
    if !discount.is_finite() || discount <= terminal {
        return Err(invalid(
            "analysis",
            "discount_rate",
            "discount_rate must be greater than terminal_growth",
        ));
    }
    Ok(())
}

fn validate_initial_investment(config: &dyn ConfigPort) -> Result<(), AnalysisError> {
    let value = config.get_double("analysis", "initial_investment", 1_000_000.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "analysis",
            "initial_investment",
            "initial_investment must be positive",
        ));
    }
    Ok(())
}

fn validate_risk_factors(config: &dyn ConfigPort) -> Result<(), AnalysisError> {
    for key in ["policy", "intermittency", "market", "operational"] {
        let value = config.get_double("risk", key, 0.2);
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid("risk", key, "risk factor must be between 0 and 1"));
        }
    }
    Ok(())
}
