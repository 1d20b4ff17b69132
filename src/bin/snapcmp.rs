//! snapcmp CLI tool
//!
//! Compares every incremental snapshot of a source backup root with the
//! same snapshot in a target root, using an external summary tool.

use anyhow::{Context, Result};
use clap::Parser;
use snapcmp::compare::Comparator;
use snapcmp::config::Cli;
use snapcmp::error::{CompareError, EXIT_CONFIGURATION, EXIT_RESOURCE};
use snapcmp::summarize::ProcessSummarizer;
use snapcmp::{logging, report};

fn main() {
    // Optional .env next to the invocation, loaded before clap reads env vars
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(EXIT_CONFIGURATION);
        }
        Err(e) => e.exit(),
    };
    logging::init(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            e.downcast_ref::<CompareError>()
                .map(CompareError::exit_code)
                .unwrap_or(EXIT_RESOURCE)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let (config, report_options) = cli.into_config()?;

    let summarizer = ProcessSummarizer::new(config.tool.clone()).with_timeout(config.timeout);
    let comparator = Comparator::new(config, summarizer);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let outcome = runtime.block_on(comparator.run())?;

    let message = report::render(&outcome, &report_options);
    if outcome.is_success() {
        println!("✅ {}", message);
    } else {
        println!("❌ {}", message);
    }
    Ok(outcome.exit_code())
}
