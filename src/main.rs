#![warn(clippy::all)]

// main entry point
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};

use secws::commands::{self, Cli, Command};
use secws::settings::store::ConfigStore;
use secws::Result;

/// Initialize the application logger
///
/// Defaults to `info`, honours `RUST_LOG`, and lets `--log-level` override
/// both. Lines look like `[12:00:00.000] INFO - secws::lifecycle: ...`.
fn init_logger(level: Option<&str>) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env_filter);
    }
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}] {} - {}: {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder.init();
}

fn execute(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Run(args) => {
            let settings = commands::run::resolve_settings(args)?;
            let status = commands::run::run(args, settings)?;
            if args.json {
                Ok(format!("{}\n", serde_json::to_string_pretty(&status)?))
            } else {
                Ok(status.to_text())
            }
        }
        Command::Config { action } => {
            let store = ConfigStore::open_default()?;
            commands::config::handle(action, &store)
        }
    }
}

/// Main entry point for the secws command
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref());

    info!("secws starting up");

    match execute(&cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
