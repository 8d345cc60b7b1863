//! renewcast: cash-flow forecasting, DCF valuation and reporting for
//! renewable-energy projects.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`
/// (default `renewcast=info`). Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("renewcast=info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
