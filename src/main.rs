mod cli;
mod config;
mod environment;
mod locator;
mod report;
mod runner;
mod system;
mod testutil;
mod tools;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run() -> Result<()> {
    let config = config::ProbeConfig::default();
    let diagnostics = report::diagnose(&system::HostSystem, &config)?;
    let text = report::format_report_human(&diagnostics);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text).context("failed to write report to stdout")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}
