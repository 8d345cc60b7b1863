//! Market discount-rate port.

use crate::domain::error::AnalysisError;

pub trait RatePort {
    /// Discount rate as a decimal fraction (0.045 = 4.5%).
    fn discount_rate(&self) -> Result<f64, AnalysisError>;
}

/// Rate from `feed` when one is configured and answers with a usable value,
/// otherwise `manual`.
pub fn resolve_discount_rate(feed: Option<&dyn RatePort>, manual: f64) -> f64 {
    let Some(feed) = feed else {
        return manual;
    };
    match feed.discount_rate() {
        Ok(rate) if rate.is_finite() => {
            tracing::info!(rate, "using market discount rate");
            rate
        }
        Ok(rate) => {
            tracing::warn!(rate, manual, "market rate unusable, falling back to manual rate");
            manual
        }
        Err(e) => {
            tracing::warn!(error = %e, manual, "market rate unavailable, falling back to manual rate");
            manual
        }
    }
}
