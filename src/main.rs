use clap::Parser;
use renewcast::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    renewcast::init_tracing();
    run(Cli::parse())
}
