//! Config command implementation.

use anyhow::{Context, Result};

use crate::cli::ConfigAction;
use crate::config::Config;
use crate::style;

pub fn cmd_config(action: ConfigAction, no_color: bool, quiet: bool) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }
        ConfigAction::Show => {
            let config = Config::load();
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            print!("{}", content);
        }
        ConfigAction::Init => {
            let path = Config::path();
            if path.exists() {
                if !quiet {
                    eprintln!(
                        "{}",
                        style::format_info(
                            &format!("Config already exists at {}", path.display()),
                            no_color
                        )
                    );
                }
                return Ok(());
            }
            Config::default().save()?;
            if !quiet {
                eprintln!(
                    "{}",
                    style::format_success(
                        &format!("Created config at {}", path.display()),
                        no_color
                    )
                );
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            config.set(key, &value)?;
            config.save()?;
            if !quiet {
                eprintln!(
                    "{}",
                    style::format_success(&format!("Set {} = {}", key.name(), value), no_color)
                );
            }
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load();
            config.unset(key);
            config.save()?;
            if !quiet {
                eprintln!(
                    "{}",
                    style::format_success(&format!("Unset {}", key.name()), no_color)
                );
            }
        }
    }
    Ok(())
}
