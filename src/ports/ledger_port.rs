//! Trial-balance ledger port.

use crate::domain::error::AnalysisError;
use crate::domain::trial_balance::TrialBalance;

pub trait LedgerPort {
    /// Returns `AnalysisError::Resource` when the ledger is unavailable and
    /// `AnalysisError::Schema` when it lacks the debit/credit fields.
    fn load_trial_balance(&self) -> Result<TrialBalance, AnalysisError>;
}
