//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` for
//! viewing and modifying settings from the command line.

use clap::Subcommand;
use ridemap::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., map.zoom)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., camera.animation_ms)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'ridemap config list' to see available keys.",
            key
        ))
    })
}

fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load()?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load()?;
    config_key
        .set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    let path = config.save()?;

    println!("Set {} = {}", config_key.name(), value);
    println!("Saved to {}", path.display());

    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    print!("{}", render_listing(&config));
    Ok(())
}

/// Settings grouped by section, INI style.
fn render_listing(config: &ConfigFile) -> String {
    let mut out = String::from("Configuration Settings\n======================\n\n");
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", section));
            current_section = section;
        }

        let value = key.get(config);
        if value.is_empty() {
            out.push_str(&format!("  {} = (not set)\n", key.field()));
        } else {
            out.push_str(&format!("  {} = {}\n", key.field(), value));
        }
    }

    out
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = parse_key("map.nonsense").unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("map.nonsense")));
    }

    #[test]
    fn test_listing_groups_sections() {
        let listing = render_listing(&ConfigFile::default());
        assert!(listing.contains("[map]\n"));
        assert!(listing.contains("[relay]\n"));
        assert!(listing.contains("  zoom = 14\n"));
        assert!(listing.contains("  port = 3001\n"));
        assert!(listing.contains("  directory = (not set)\n"));
    }
}
