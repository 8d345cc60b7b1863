//! CLI integration tests.
//!
//! Tests cover:
//! - Config parsing (build_analysis_config, build_rate_feed)
//! - Full pipeline with mock ports
//! - Analyze, trial-balance and validate commands against real files on disk

mod common;

use common::*;
use renewcast::adapters::csv_report_adapter::{
    read_financial_report, FINANCIAL_REPORT_FILE, FORECAST_FILE, SENSITIVITY_FILE,
};
use renewcast::adapters::file_config_adapter::FileConfigAdapter;
use renewcast::cli::{self, Cli, Command};
use renewcast::domain::error::AnalysisError;
use renewcast::domain::pipeline::AnalysisConfig;
use renewcast::ports::rate_port::RatePort;
use renewcast::ports::report_port::ReportPort;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[analysis]
periods = 12
growth_rate = 0.02
discount_rate = 0.10
terminal_growth = 0.02
initial_investment = 1000000

[risk]
policy = 0.1
intermittency = 0.3
market = 0.2
operational = 0.2
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_analysis_config_valid_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_analysis_config(&adapter, None).unwrap();

        assert_eq!(config.periods, 12);
        assert!((config.growth_rate - 0.02).abs() < f64::EPSILON);
        assert!((config.discount_rate - 0.10).abs() < f64::EPSILON);
        assert!((config.terminal_growth - 0.02).abs() < f64::EPSILON);
        assert!((config.initial_investment - 1_000_000.0).abs() < f64::EPSILON);
        assert!((config.risk.intermittency - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn build_analysis_config_uses_defaults() {
        let adapter = FileConfigAdapter::from_string("[analysis]\n").unwrap();
        let config = cli::build_analysis_config(&adapter, None).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn build_analysis_config_negative_periods() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nperiods = -3\n").unwrap();
        let err = cli::build_analysis_config(&adapter, None).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigInvalid { key, .. } if key == "periods"));
    }

    #[test]
    fn rate_feed_overrides_manual_rate() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let feed = MockRatePort(Some(0.0425));
        let config = cli::build_analysis_config(&adapter, Some(&feed as &dyn RatePort)).unwrap();
        assert!((config.discount_rate - 0.0425).abs() < f64::EPSILON);
    }

    #[test]
    fn offline_rate_feed_keeps_manual_rate() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let feed = MockRatePort(None);
        let config = cli::build_analysis_config(&adapter, Some(&feed as &dyn RatePort)).unwrap();
        assert!((config.discount_rate - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_feed_path_is_relative_to_config() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("tnx.csv"), "Date,Close\n2024-06-03,4.5\n").unwrap();
        let adapter = FileConfigAdapter::from_string("[rates]\nquote_file = tnx.csv\n").unwrap();

        let feed = cli::build_rate_feed(&adapter, dir.path()).unwrap();
        assert!((feed.discount_rate().unwrap() - 0.045).abs() < 1e-12);

        let none = FileConfigAdapter::from_string("[analysis]\n").unwrap();
        assert!(cli::build_rate_feed(&none, dir.path()).is_none());
    }

    #[test]
    fn market_rate_switch_disables_feed() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("tnx.csv"), "Date,Close\n2024-06-03,4.5\n").unwrap();
        let off = FileConfigAdapter::from_string(
            "[rates]\nquote_file = tnx.csv\nuse_market_rate = no\n",
        )
        .unwrap();
        assert!(cli::build_rate_feed(&off, dir.path()).is_none());

        let on = FileConfigAdapter::from_string(
            "[rates]\nquote_file = tnx.csv\nuse_market_rate = yes\n",
        )
        .unwrap();
        assert!(cli::build_rate_feed(&on, dir.path()).is_some());
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn pipeline_exports_everything() {
        let data = MockDataPort::new(sample_series_with_budget(110_000.0));
        let reports = RecordingReportPort::default();

        let code = cli::run_analysis_pipeline(&data, Some(&reports as &dyn ReportPort), &AnalysisConfig::default());
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(reports.forecasts.borrow().len(), 1);
        assert_eq!(reports.forecasts.borrow()[0].len(), 12);
        assert_eq!(reports.grids.borrow()[0].len(), 25);
        assert_eq!(reports.reports.borrow().len(), 1);
    }

    #[test]
    fn pipeline_without_sink_still_succeeds() {
        let data = MockDataPort::new(sample_series());
        let code = cli::run_analysis_pipeline(&data, None, &AnalysisConfig::default());
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn loader_schema_error_maps_to_exit_code() {
        let data = MockDataPort::failing("missing Date column");
        let reports = RecordingReportPort::default();
        let code = cli::run_analysis_pipeline(&data, Some(&reports as &dyn ReportPort), &AnalysisConfig::default());
        assert_eq!(code, ExitCode::from(3));
        assert!(reports.forecasts.borrow().is_empty());
    }

    #[test]
    fn invalid_rates_map_to_domain_exit_code() {
        let data = MockDataPort::new(sample_series());
        let config = AnalysisConfig {
            discount_rate: 0.01,
            ..AnalysisConfig::default()
        };
        let code = cli::run_analysis_pipeline(&data, None, &config);
        assert_eq!(code, ExitCode::from(4));
    }
}

mod commands {
    use super::*;

    struct Workspace {
        _dir: tempfile::TempDir,
        config: PathBuf,
        data: PathBuf,
        output: PathBuf,
    }

    fn workspace(ini: &str, csv: &str) -> Workspace {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("renewcast.ini");
        let data = dir.path().join("cash_flows.csv");
        fs::write(&config, ini).unwrap();
        fs::write(&data, csv).unwrap();
        let output = dir.path().join("out");
        Workspace {
            _dir: dir,
            config,
            data,
            output,
        }
    }

    #[test]
    fn analyze_writes_reports() {
        let ws = workspace(VALID_INI, SAMPLE_CSV);
        let code = cli::run(Cli {
            command: Command::Analyze {
                config: ws.config.clone(),
                data: ws.data.clone(),
                output: Some(ws.output.clone()),
                dry_run: false,
            },
        });
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(ws.output.join(FORECAST_FILE).exists());
        assert!(ws.output.join(SENSITIVITY_FILE).exists());

        let report = read_financial_report(&ws.output.join(FINANCIAL_REPORT_FILE)).unwrap();
        // 700k actual vs 630k budget
        assert!((report.budget_vs_actual_variance - 70_000.0).abs() < 0.01);
        assert!((report.variance_percent - 11.11).abs() < 0.01);
    }

    #[test]
    fn analyze_dry_run_writes_nothing() {
        let ws = workspace(VALID_INI, SAMPLE_CSV);
        let code = cli::run(Cli {
            command: Command::Analyze {
                config: ws.config.clone(),
                data: ws.data.clone(),
                output: Some(ws.output.clone()),
                dry_run: true,
            },
        });
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!ws.output.exists());
    }

    #[test]
    fn analyze_with_mapped_columns() {
        let ini = format!("{VALID_INI}\n[data]\ndate_column = Month\ninflow_column = Revenue\noutflow_column = Opex\n");
        let csv = "Month,Revenue,Opex\n2024-01-01,100,50\n2024-02-01,110,60\n";
        let ws = workspace(&ini, csv);
        let code = cli::run(Cli {
            command: Command::Analyze {
                config: ws.config.clone(),
                data: ws.data.clone(),
                output: None,
                dry_run: false,
            },
        });
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn analyze_rejects_bad_data() {
        let ws = workspace(VALID_INI, "Date,Inflow,Outflow\n2024-01-01,lots,50\n");
        let code = cli::run(Cli {
            command: Command::Analyze {
                config: ws.config.clone(),
                data: ws.data.clone(),
                output: None,
                dry_run: false,
            },
        });
        assert_eq!(code, ExitCode::from(3));
    }

    #[test]
    fn analyze_rejects_invalid_config() {
        let ws = workspace("[analysis]\ndiscount_rate = 0.01\n", SAMPLE_CSV);
        let code = cli::run(Cli {
            command: Command::Analyze {
                config: ws.config.clone(),
                data: ws.data.clone(),
                output: None,
                dry_run: false,
            },
        });
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn validate_command() {
        let good = write_temp_ini(VALID_INI);
        let code = cli::run(Cli {
            command: Command::Validate {
                config: good.path().to_path_buf(),
            },
        });
        assert_eq!(code, ExitCode::SUCCESS);

        let bad = write_temp_ini("[risk]\npolicy = 2\n");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: bad.path().to_path_buf(),
            },
        });
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn validate_missing_config_file() {
        let code = cli::run(Cli {
            command: Command::Validate {
                config: PathBuf::from("/nonexistent/renewcast.ini"),
            },
        });
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn trial_balance_creates_default_ledger() {
        let dir = tempfile::TempDir::new().unwrap();
        let ledger = dir.path().join("trial_balance.csv");
        let code = cli::run(Cli {
            command: Command::TrialBalance {
                ledger: ledger.clone(),
            },
        });
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(ledger.exists());
    }

    #[test]
    fn trial_balance_unwritable_path_uses_default_ledger() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("ledger_dir");
        fs::write(&blocker, "plain file").unwrap();
        let code = cli::run(Cli {
            command: Command::TrialBalance {
                ledger: blocker.join("trial_balance.csv"),
            },
        });
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn trial_balance_unbalanced_exit_code() {
        let dir = tempfile::TempDir::new().unwrap();
        let ledger = dir.path().join("trial_balance.csv");
        fs::write(&ledger, "Account,Debit,Credit\nCash,150,0\nRevenue,0,100\n").unwrap();
        let code = cli::run(Cli {
            command: Command::TrialBalance { ledger },
        });
        assert_eq!(code, ExitCode::from(6));
    }
}
