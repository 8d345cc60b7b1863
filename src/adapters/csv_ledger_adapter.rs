//! CSV trial-balance ledger adapter (`Account,Debit,Credit`).
//!
//! A ledger path that does not exist yet is seeded with the default
//! four-account ledger, so validation always has an input.

use crate::domain::error::AnalysisError;
use crate::domain::trial_balance::{TrialBalance, TrialBalanceEntry};
use crate::ports::ledger_port::LedgerPort;
use std::fs;
use std::path::{Path, PathBuf};

const HEADERS: [&str; 3] = ["Account", "Debit", "Credit"];

pub struct CsvLedgerAdapter {
    path: PathBuf,
    create_if_missing: bool,
}

impl CsvLedgerAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            create_if_missing: true,
        }
    }

    /// Report a missing file as unavailable instead of seeding it.
    pub fn read_only(path: PathBuf) -> Self {
        Self {
            path,
            create_if_missing: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn write_trial_balance(path: &Path, balance: &TrialBalance) -> Result<(), AnalysisError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AnalysisError::resource(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AnalysisError::resource(format!("failed to create {}: {}", path.display(), e)))?;
    wtr.write_record(HEADERS)
        .map_err(|e| AnalysisError::resource(e.to_string()))?;
    for entry in &balance.entries {
        wtr.write_record([
            entry.account.clone(),
            entry.debit.to_string(),
            entry.credit.to_string(),
        ])
        .map_err(|e| AnalysisError::resource(e.to_string()))?;
    }
    wtr.flush().map_err(|e| {
        AnalysisError::resource(format!("failed to write {}: {}", path.display(), e))
    })?;
    Ok(())
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_amount(value: &str) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        0.0
    } else {
        value.replace(',', "").parse().unwrap_or(f64::NAN)
    }
}

impl LedgerPort for CsvLedgerAdapter {
    fn load_trial_balance(&self) -> Result<TrialBalance, AnalysisError> {
        if !self.path.exists() {
            if !self.create_if_missing {
                return Err(AnalysisError::resource(format!(
                    "ledger {} does not exist",
                    self.path.display()
                )));
            }
            let balance = TrialBalance::default_ledger();
            write_trial_balance(&self.path, &balance)?;
            tracing::info!(path = %self.path.display(), "created default trial balance ledger");
            return Ok(balance);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            AnalysisError::resource(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| AnalysisError::schema(format!("ledger header error: {}", e)))?
            .clone();

        let missing: Vec<&str> = ["Debit", "Credit"]
            .into_iter()
            .filter(|name| column(&headers, name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AnalysisError::schema(format!(
                "ledger is missing required column(s): {}",
                missing.join(", ")
            )));
        }
        let account_idx = column(&headers, "Account");
        let debit_idx = column(&headers, "Debit").unwrap_or(0);
        let credit_idx = column(&headers, "Credit").unwrap_or(0);

        let mut entries = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| AnalysisError::schema(format!("ledger parse error: {}", e)))?;
            let account = account_idx
                .and_then(|idx| record.get(idx))
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| format!("Row {}", i + 1));
            // Unparseable amounts surface as NaN and fail validation by name.
            entries.push(TrialBalanceEntry::new(
                account,
                parse_amount(record.get(debit_idx).unwrap_or("")),
                parse_amount(record.get(credit_idx).unwrap_or("")),
            ));
        }

        Ok(TrialBalance::new(entries))
    }
}
