//! Core domain types and logic.

pub mod cash_flow;
pub mod forecast;
pub mod valuation;
pub mod sensitivity;
pub mod financial_report;
pub mod trial_balance;
pub mod risk;
pub mod pipeline;
pub mod config_validation;
pub mod error;
