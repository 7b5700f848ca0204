//! rxlookup - RxNav drug terminology lookups from the terminal

use std::process::ExitCode;

use clap::Parser;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod lookup;
mod models;
mod output;

use cli::{CacheCommands, Cli, Commands, ConfigCommands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over `--debug`; otherwise only warnings are shown.
fn init_logging(debug: bool) {
    let default_filter = if debug { "rxlookup=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Search(args) => cli::drug::search(&opts, &args.drug_name).await,
        Commands::Details(args) => cli::drug::details(&opts, &args.rxcui).await,
        Commands::Validate(args) => cli::drug::validate(&opts, &args.rxcui).await,
        Commands::History(args) => cli::drug::history(&opts, &args.rxcui).await,
        Commands::Cache(cmd) => {
            match cmd {
                CacheCommands::Status => cli::cache::status(opts.format)?,
                CacheCommands::Clear { yes } => cli::cache::clear(opts.format, yes)?,
                CacheCommands::Purge => cli::cache::purge(opts.format)?,
                CacheCommands::Path => cli::cache::path()?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(cmd) => {
            match cmd {
                ConfigCommands::Show => cli::config::show(&opts)?,
                ConfigCommands::Init { force } => cli::config::init(&opts, force)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            cli::completions::run(shell);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => {
            println!("rxlookup version {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}
