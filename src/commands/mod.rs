//! Command-line commands.
//!
//! This module defines the `secws` command line and one handler per
//! subcommand. Handlers return what should be printed; `main` prints it.

pub mod config;
pub mod run;
pub mod types;

use crate::settings::FirewallSettings;
use clap::{Args, Parser, Subcommand};

/// A minimal packet filter: input and output accepted, forward dropped.
#[derive(Parser, Debug)]
#[command(name = "secws", version, about)]
pub struct Cli {
    /// Log filter, e.g. `info` or `secws=debug` (overrides RUST_LOG)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the filter on the simulated host and push traffic through it
    Run(RunArgs),
    /// Manage stored configurations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Load settings from a stored configuration instead of the flags
    #[arg(long)]
    pub config: Option<String>,

    #[command(flatten)]
    pub settings: FirewallSettings,

    /// Packets to send through the input chain
    #[arg(long, default_value_t = 0)]
    pub input: usize,

    /// Packets to send through the output chain
    #[arg(long, default_value_t = 0)]
    pub output: usize,

    /// Packets to send through the forward chain
    #[arg(long, default_value_t = 0)]
    pub forward: usize,

    /// Number of sender threads
    #[arg(long, default_value_t = 4)]
    pub threads: usize,

    /// Send random traffic until interrupted with Ctrl-C
    #[arg(long, default_value_t = false)]
    pub continuous: bool,

    /// Write the reset command to the control attribute after reading it
    #[arg(long, default_value_t = false)]
    pub reset: bool,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Store settings under a name
    Save {
        name: String,
        #[command(flatten)]
        settings: FirewallSettings,
    },
    /// Print a stored configuration
    Show { name: String },
    /// List stored configurations
    List,
    /// Delete a stored configuration
    Delete { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "secws", "run", "--input", "3", "--output", "2", "--forward", "1", "--log-packets",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!((args.input, args.output, args.forward), (3, 2, 1));
        assert!(args.settings.log_packets);
        assert_eq!(args.threads, 4);
    }

    #[test]
    fn test_priority_is_not_an_option() {
        let parsed = Cli::try_parse_from(["secws", "run", "--priority", "100"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_config_save() {
        let cli = Cli::parse_from(["secws", "config", "save", "lab", "--log-packets"]);
        let Command::Config {
            action: ConfigAction::Save { name, settings },
        } = cli.command
        else {
            panic!("expected config save");
        };
        assert_eq!(name, "lab");
        assert!(settings.log_packets);
    }
}
