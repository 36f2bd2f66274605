//! LanCopy CLI - send or receive one file over raw TCP
//!
//! The role is auto-detected from the file argument unless `--mode` is given.

use clap::Parser;
use lancopy::config::{CliArgs, OutputFormat, TransferConfig};
use lancopy::core::run_session;
use lancopy::error::Result;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging (stderr, so stdout carries progress and the summary)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Usage errors exit with 1, --help and --version with 0
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        if e.is_usage() {
            eprintln!("       lancopy --help for more information");
        }
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = TransferConfig::from_cli(args)?;

    tracing::debug!(?config, "Resolved configuration");

    let outcome = run_session(&config)?;

    match args.output_format {
        OutputFormat::Text => outcome.print_summary(),
        OutputFormat::Json => println!("{}", outcome.to_json_with_config(&config)?),
    }

    Ok(())
}
