//! Configuration commands

use colored::Colorize;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Print the effective configuration (file, defaults and env overrides)
pub fn show(opts: &GlobalOptions) -> Result<()> {
    let config = Config::load_at(opts.config_ref())?;
    let path = Config::resolve_path(opts.config_ref())?;

    match opts.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        _ => {
            let source = if path.exists() {
                path.display().to_string()
            } else {
                format!("{} (not found, using defaults)", path.display())
            };
            println!("Config file: {}", source.cyan());
            println!();
            print!(
                "{}",
                serde_yaml::to_string(&config).map_err(ConfigError::from)?
            );
        }
    }
    Ok(())
}

/// Write a default configuration file
pub fn init(opts: &GlobalOptions, force: bool) -> Result<()> {
    let path = Config::resolve_path(opts.config_ref())?;

    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ))
        .into());
    }

    Config::default().save_to(&path)?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
