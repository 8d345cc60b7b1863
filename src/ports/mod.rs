//! Port traits for the external collaborators of the analysis core.

pub mod config_port;
pub mod data_port;
pub mod ledger_port;
pub mod rate_port;
pub mod report_port;
