//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{ColumnMapping, CsvAdapter};
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::quote_rate_adapter::QuoteFileRateAdapter;
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::AnalysisError;
use crate::domain::pipeline::{run_analysis, AnalysisConfig, AnalysisOutcome};
use crate::domain::risk::RiskFactors;
use crate::domain::trial_balance::validate_trial_balance_source;
use crate::domain::valuation::DEFAULT_TERMINAL_GROWTH;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::rate_port::{resolve_discount_rate, RatePort};
use crate::ports::report_port::ReportPort;

const EXIT_UNBALANCED: u8 = 6;

#[derive(Parser, Debug)]
#[command(
    name = "renewcast",
    about = "Cash-flow forecasting and DCF valuation for renewable-energy projects"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Forecast, value and report on a cash-flow file
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        /// Directory for forecast/sensitivity/report CSVs
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Check that a ledger's debits equal its credits
    TrialBalance {
        #[arg(short, long)]
        ledger: PathBuf,
    },
    /// Validate an analysis configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            data,
            output,
            dry_run,
        } => run_analyze(&config, &data, output.as_deref(), dry_run),
        Command::TrialBalance { ledger } => run_trial_balance(&ledger),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Builds the run parameters from `[analysis]` and `[risk]`. The discount
/// rate comes from `rate_feed` when it answers, otherwise from the config.
pub fn build_analysis_config(
    adapter: &dyn ConfigPort,
    rate_feed: Option<&dyn RatePort>,
) -> Result<AnalysisConfig, AnalysisError> {
    let defaults = AnalysisConfig::default();

    let periods = adapter.get_int("analysis", "periods", defaults.periods as i64);
    let periods = usize::try_from(periods)
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| AnalysisError::ConfigInvalid {
            section: "analysis".into(),
            key: "periods".into(),
            reason: "periods must be at least 1".into(),
        })?;

    let manual_rate = adapter.get_double("analysis", "discount_rate", defaults.discount_rate);

    Ok(AnalysisConfig {
        periods,
        growth_rate: adapter.get_double("analysis", "growth_rate", defaults.growth_rate),
        discount_rate: resolve_discount_rate(rate_feed, manual_rate),
        terminal_growth: adapter.get_double("analysis", "terminal_growth", DEFAULT_TERMINAL_GROWTH),
        initial_investment: adapter.get_double(
            "analysis",
            "initial_investment",
            defaults.initial_investment,
        ),
        risk: RiskFactors {
            policy: adapter.get_double("risk", "policy", defaults.risk.policy),
            intermittency: adapter.get_double("risk", "intermittency", defaults.risk.intermittency),
            market: adapter.get_double("risk", "market", defaults.risk.market),
            operational: adapter.get_double("risk", "operational", defaults.risk.operational),
        },
    })
}

/// Rate feed named by `[rates] quote_file`, resolved against `base_dir`.
/// `use_market_rate = false` switches the feed off and keeps the manual rate.
pub fn build_rate_feed(adapter: &dyn ConfigPort, base_dir: &Path) -> Option<QuoteFileRateAdapter> {
    if !adapter.get_bool("rates", "use_market_rate", true) {
        tracing::info!("market rate disabled, using configured discount rate");
        return None;
    }
    adapter.get_string("rates", "quote_file").map(|file| {
        let path = PathBuf::from(file);
        let path = if path.is_relative() {
            base_dir.join(path)
        } else {
            path
        };
        QuoteFileRateAdapter::new(path)
    })
}

fn run_analyze(config_path: &Path, data_path: &Path, output: Option<&Path>, dry_run: bool) -> ExitCode {
    tracing::info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let feed = build_rate_feed(&adapter, base_dir);
    let config = match build_analysis_config(&adapter, feed.as_ref().map(|f| f as &dyn RatePort)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::with_mapping(data_path.to_path_buf(), ColumnMapping::from_config(&adapter));

    if dry_run {
        return run_dry_run(&data_port, &config);
    }

    let report_port = output.map(|dir| CsvReportAdapter::new(dir.to_path_buf()));
    run_analysis_pipeline(
        &data_port,
        report_port.as_ref().map(|r| r as &dyn ReportPort),
        &config,
    )
}

fn run_dry_run(data_port: &dyn DataPort, config: &AnalysisConfig) -> ExitCode {
    let series = match data_port.fetch_cash_flows().and_then(|s| s.validate().map(|_| s)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("Cash flows: {} records", series.len());
    if let (Some(first), Some(last)) = (series.records().first(), series.last()) {
        println!("  range: {} to {}", first.date, last.date);
    }
    println!("  budget column: {}", if series.has_budget() { "yes" } else { "no" });
    print_parameters(config);
    println!("\nDry run complete: configuration and data are valid");
    ExitCode::SUCCESS
}

/// Loads, analyses and (optionally) exports. Exposed for tests that supply
/// their own ports.
pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    report_port: Option<&dyn ReportPort>,
    config: &AnalysisConfig,
) -> ExitCode {
    let series = match data_port.fetch_cash_flows() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let outcome = match run_analysis(&series, config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_parameters(config);
    print_outcome(&outcome);

    if let Some(port) = report_port {
        if let Err(e) = export(port, &outcome) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    ExitCode::SUCCESS
}

fn export(port: &dyn ReportPort, outcome: &AnalysisOutcome) -> Result<(), AnalysisError> {
    port.write_forecast(&outcome.forecast)?;
    port.write_sensitivity(&outcome.sensitivity)?;
    if let Some(report) = &outcome.report {
        port.write_financial_report(report)?;
    }
    tracing::info!("reports exported");
    Ok(())
}

fn print_parameters(config: &AnalysisConfig) {
    println!("\nParameters:");
    println!("  periods:          {}", config.periods);
    println!("  growth rate:      {:.2}%", config.growth_rate * 100.0);
    println!("  discount rate:    {:.2}%", config.discount_rate * 100.0);
    println!("  terminal growth:  {:.2}%", config.terminal_growth * 100.0);
}

fn print_outcome(outcome: &AnalysisOutcome) {
    println!("\nForecast:");
    println!("  {:<12} {:>14} {:>14} {:>14}", "Date", "Inflow", "Outflow", "Net");
    for r in outcome.forecast.records() {
        println!(
            "  {:<12} {:>14.2} {:>14.2} {:>14.2}",
            r.date(),
            r.inflow(),
            r.outflow(),
            r.net_cash_flow()
        );
    }

    println!("\nDCF valuation:       ${:.2}", outcome.valuation.valuation);
    println!("  terminal value:    ${:.2}", outcome.valuation.terminal_value);
    println!(
        "RARM:                {:.2}% (total risk {:.1}%)",
        outcome.risk_adjusted.rarm * 100.0,
        outcome.risk_adjusted.total_risk_score * 100.0
    );

    let table = outcome.sensitivity.pivot();
    println!("\nSensitivity (rows: growth, columns: discount):");
    print!("  {:>8}", "");
    for d in &table.discount_rates {
        print!(" {:>14}", format!("{:.2}%", d * 100.0));
    }
    println!();
    for (g, row) in table.growth_rates.iter().zip(&table.values) {
        print!("  {:>8}", format!("{:.2}%", g * 100.0));
        for v in row {
            if v.is_nan() {
                print!(" {:>14}", "n/a");
            } else {
                print!(" {:>14.0}", v);
            }
        }
        println!();
    }

    match &outcome.report {
        Some(r) => {
            println!("\nFinancial report:");
            println!("  EBITDA (simplified): {:.2}", r.simplified_ebitda);
            println!(
                "  budget variance:     {:.2} ({:.2}%)",
                r.budget_vs_actual_variance, r.variance_percent
            );
            println!("  cash:                {:.2}", r.balance_sheet.assets.cash);
            println!(
                "  accounts payable:    {:.2}",
                r.balance_sheet.liabilities.accounts_payable
            );
            println!(
                "  retained earnings:   {:.2}",
                r.balance_sheet.equity.retained_earnings
            );
        }
        None => println!("\nFinancial report: unavailable"),
    }
}

fn run_trial_balance(ledger_path: &Path) -> ExitCode {
    let adapter = CsvLedgerAdapter::new(ledger_path.to_path_buf());
    let check = validate_trial_balance_source(&adapter);
    println!("{}", check.message);
    if check.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_UNBALANCED)
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match build_analysis_config(&adapter, None) {
        Ok(config) => {
            print_parameters(&config);
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
