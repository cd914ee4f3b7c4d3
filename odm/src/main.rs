// odm/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use odm_common::config::Config;
use odm_common::error::{OdmError, Result as odmResult};
use tracing::level_filters::LevelFilter;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::CliArgs;

fn init_logging(verbose_level: u8) {
    let level_filter = match verbose_level {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("ODM_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

fn main() -> odmResult<()> {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose);

    let mut config = Config::load()
        .map_err(|e| OdmError::Config(format!("Could not load config: {e}")))?;
    cli_args.apply_to(&mut config);
    debug!("Effective configuration: {:?}", config);

    if let Err(e) = cli_args.command.run(&config) {
        debug!("Command failed: {:?}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
