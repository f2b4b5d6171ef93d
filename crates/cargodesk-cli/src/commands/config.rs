//! Config command handlers

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use cargodesk_core::{Config, DuplicateIdPolicy};

use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;

/// Handle `config` subcommands; defaults to `show`
pub fn handle(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => show(output),
        ConfigCommands::Set { key, value } => set(&key, &value, output),
    }
}

fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": Config::config_file_path(),
                    "data_dir": config.data_dir,
                    "simulated_latency_ms": config.simulated_latency_ms,
                    "duplicate_ids": config.duplicate_ids,
                })
            );
        }
        _ => {
            println!("Config file: {}", Config::config_file_path().display());
            println!("data_dir             = {}", config.data_dir.display());
            println!("simulated_latency_ms = {}", config.simulated_latency_ms);
            println!(
                "duplicate_ids        = {}",
                match config.duplicate_ids {
                    DuplicateIdPolicy::Reject => "reject",
                    DuplicateIdPolicy::Overwrite => "overwrite",
                }
            );
        }
    }

    Ok(())
}

fn set(key: &str, value: &str, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key {
        "data_dir" => config.data_dir = PathBuf::from(value),
        "simulated_latency_ms" => {
            config.simulated_latency_ms = value
                .parse()
                .with_context(|| format!("'{value}' is not a valid millisecond count"))?;
        }
        "duplicate_ids" => {
            config.duplicate_ids = match value {
                "reject" => DuplicateIdPolicy::Reject,
                "overwrite" => DuplicateIdPolicy::Overwrite,
                other => bail!("Unknown policy '{other}' (expected reject or overwrite)"),
            };
        }
        other => bail!("Unknown config key '{other}'"),
    }

    config.save().context("Failed to save configuration")?;
    output.message(&format!("Set {key} = {value}"));
    Ok(())
}
