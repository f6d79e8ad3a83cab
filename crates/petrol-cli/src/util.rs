//! Utility functions for CLI operations.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use petrol_store::Ledger;
use tracing::debug;

use crate::config::{Config, resolve_database};

/// Whether prompts can be shown: both stdin and stderr are terminals.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Build the ledger for this invocation. The database opens on first use.
pub fn open_ledger(database: Option<PathBuf>, config: &Config) -> Ledger {
    let path = resolve_database(database, config);
    debug!("Using database {}", path.display());
    Ledger::new(path).with_history_limit(config.history_limit())
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
