//! aggctl - CLI entry point.

#![allow(clippy::module_name_repetitions)]

use std::process::ExitCode;

use clap::Parser;

use aggctl::cli::{self, Cli, Commands};
use aggctl::core::logging;
use aggctl::core::{ApiClient, ConnectionProfile};
use aggctl::error::AggctlError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(logging::level_from_env)
        .unwrap_or_default();
    let log_format = logging::format_from_env().unwrap_or_default();
    logging::init(log_level, log_format, logging::file_from_env(), cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> aggctl::Result<()> {
    let format = cli.effective_format();
    let pretty = cli.pretty;
    let no_color = cli.no_color || std::env::var_os("NO_COLOR").is_some();

    let profile = ConnectionProfile::load(cli.config.as_deref())?;
    let client = ApiClient::new(profile)?;

    match cli.command {
        None => {
            if atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout) {
                cli::menu::run(&client, no_color).await
            } else {
                Err(AggctlError::Config(
                    "no command given and no TTY for the interactive menu; try 'aggctl --help'"
                        .to_string(),
                ))
            }
        }
        Some(Commands::Projects) => cli::projects::execute(&client, format, pretty).await,
        Some(Commands::Aggregates(args)) => {
            cli::aggregates::execute(&client, &args, format, pretty, no_color).await
        }
        Some(Commands::Export(args)) => cli::export::execute(&client, &args).await,
        Some(Commands::Rebuild(args)) => {
            cli::rebuild::execute(&client, &args, format, pretty).await
        }
        Some(Commands::History(args)) => {
            cli::history::execute(&client, &args, format, pretty, no_color).await
        }
        Some(Commands::Stats(args)) => cli::stats::execute(&client, &args, format, pretty).await,
        Some(Commands::Health(args)) => cli::health::execute(&client, &args, format, pretty).await,
        Some(Commands::Token(command)) => cli::token::execute(&client, &command).await,
    }
}
