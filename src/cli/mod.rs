//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;

pub mod cache;
pub mod completions;
pub mod config;
pub mod context;
pub mod drug;

pub use context::CommandContext;

/// Longest drug name accepted by `search`
pub const MAX_DRUG_NAME_LEN: usize = 255;

/// Shortest drug name accepted by `search`
pub const MIN_DRUG_NAME_LEN: usize = 2;

/// rxlookup - search RxNav drug terminology from the terminal
#[derive(Parser, Debug)]
#[command(name = "rxlookup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "RXLOOKUP_FORMAT",
        default_value = "pretty",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "RXLOOKUP_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "RXLOOKUP_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from RxNav
    #[arg(long, global = true, env = "RXLOOKUP_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - human-optimized rich formatting
    #[default]
    Pretty,
    /// Table format - one row per entry
    Table,
    /// JSON format - structured for scripts
    Json,
}

/// Global CLI options passed to all command handlers.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub format: OutputFormat,
    pub config: Option<String>,
    pub no_cache: bool,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            no_cache: cli.no_cache,
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search branded drugs by name (top 5 SBD matches)
    Search(SearchArgs),

    /// Show name, ingredients and dose forms for an RXCUI
    Details(RxcuiArgs),

    /// Check whether an RXCUI is active (exit status 1 if not)
    Validate(RxcuiArgs),

    /// Show ingredient and dose form history for an RXCUI
    History(RxcuiArgs),

    /// Manage the local response cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },

    /// Display version information
    Version,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Drug name, matched by RxNav (2-255 characters)
    #[arg(value_parser = parse_drug_name)]
    pub drug_name: String,
}

#[derive(Args, Debug)]
pub struct RxcuiArgs {
    /// RxNorm concept unique identifier
    #[arg(value_parser = parse_rxcui)]
    pub rxcui: String,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Remove every cached entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Remove expired entries
    Purge,

    /// Print the cache directory
    Path,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_drug_name(s: &str) -> Result<String, String> {
    let len = s.chars().count();
    if len < MIN_DRUG_NAME_LEN {
        return Err(format!(
            "drug name must be at least {} characters",
            MIN_DRUG_NAME_LEN
        ));
    }
    if len > MAX_DRUG_NAME_LEN {
        return Err(format!(
            "drug name must be at most {} characters",
            MAX_DRUG_NAME_LEN
        ));
    }
    Ok(s.to_string())
}

fn parse_rxcui(s: &str) -> Result<String, String> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err("RXCUI must be a non-empty string of digits".to_string());
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_drug_name_bounds() {
        assert!(parse_drug_name("a").is_err());
        assert!(parse_drug_name("ab").is_ok());
        assert!(parse_drug_name(&"x".repeat(255)).is_ok());
        assert!(parse_drug_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_parse_drug_name_keeps_input_verbatim() {
        assert_eq!(parse_drug_name(" Aspirin ").unwrap(), " Aspirin ");
    }

    #[test]
    fn test_parse_rxcui() {
        assert!(parse_rxcui("123456").is_ok());
        assert!(parse_rxcui("").is_err());
        assert!(parse_rxcui("12a").is_err());
        assert!(parse_rxcui("../1").is_err());
    }

    #[test]
    fn test_search_command_parses() {
        let cli = Cli::try_parse_from(["rxlookup", "--format", "json", "search", "aspirin"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Search(args) => assert_eq!(args.drug_name, "aspirin"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_search_rejects_short_name() {
        assert!(Cli::try_parse_from(["rxlookup", "search", "a"]).is_err());
    }

    #[test]
    fn test_global_options_from_cli() {
        let cli = Cli::try_parse_from(["rxlookup", "--no-cache", "validate", "42"]).unwrap();
        let opts = GlobalOptions::from_cli(&cli);
        assert!(opts.no_cache);
        assert_eq!(opts.config_ref(), None);
    }
}
