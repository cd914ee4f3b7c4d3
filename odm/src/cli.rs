// odm/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use odm_common::config::{Config, TransportStrategy};
use odm_common::error::Result;

// Module declarations
pub mod config;
pub mod deps;
pub mod fetch;
pub mod list;
pub mod load;
pub mod mirror;

use crate::cli::config::ShowConfig;
use crate::cli::deps::Deps;
use crate::cli::fetch::Fetch;
use crate::cli::list::List;
use crate::cli::load::Load;
use crate::cli::mirror::Mirror;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "odm", bin_name = "odm")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Local library root (overrides config and ODM_LOCAL_ROOT)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Remote base URL or local source path
    #[arg(long, global = true, value_name = "URL")]
    pub remote: Option<String>,

    /// Pinned upstream version tag
    #[arg(long = "source-version", global = true, value_name = "TAG")]
    pub source_version: Option<String>,

    /// Transport strategy: http or basic
    #[arg(long, global = true, value_parser = parse_transport)]
    pub transport: Option<TransportStrategy>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Materialize library files and their declared dependencies
    Fetch(Fetch),
    /// Materialize whole library directories
    Mirror(Mirror),
    /// Resolve module names and materialize the files defining them
    Load(Load),
    /// Show the dependency table
    Deps(Deps),
    /// List materialized files
    List(List),
    /// Show the effective configuration
    Config(ShowConfig),
}

impl CliArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.local_root = root.clone();
        }
        if let Some(remote) = &self.remote {
            config.remote_base_url = remote.clone();
        }
        if let Some(version) = &self.source_version {
            config.source_version = version.clone();
        }
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
    }
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Fetch(command) => command.run(config),
            Self::Mirror(command) => command.run(config),
            Self::Load(command) => command.run(config),
            Self::Deps(command) => command.run(config),
            Self::List(command) => command.run(config),
            Self::Config(command) => command.run(config),
        }
    }
}

fn parse_transport(s: &str) -> std::result::Result<TransportStrategy, String> {
    s.parse().map_err(|e: odm_common::error::OdmError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_overrides_apply_to_config() {
        let args = CliArgs::parse_from([
            "odm",
            "fetch",
            "Zend/View.php",
            "--root",
            "/tmp/lib",
            "--transport",
            "basic",
            "-vv",
        ]);
        assert_eq!(args.verbose, 2);
        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config.local_root, PathBuf::from("/tmp/lib"));
        assert_eq!(config.transport, TransportStrategy::Basic);
    }

    #[test]
    fn unknown_transport_is_rejected() {
        assert!(CliArgs::try_parse_from(["odm", "list", "--transport", "ftp"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
