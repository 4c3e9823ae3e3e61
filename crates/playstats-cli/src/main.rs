//! Main entry point for playstats.

use anyhow::Context;
use clap::Parser;
use playstats_cli::{App, Cli};
use playstats_common::init_logging;
use playstats_config::ConfigLoader;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config)
        .context("invalid command line settings")?;

    let _guard = init_logging(&config.logging.to_logging_config())
        .context("failed to initialise logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), timezone = %config.analysis.timezone, "Starting playstats");

    let app = App::new(config);
    app.run(&cli.command).map_err(|e| {
        error!(category = e.category(), "{e}");
        anyhow::Error::new(e)
    })
}
