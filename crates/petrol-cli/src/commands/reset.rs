//! Reset command implementation.

use anyhow::{Context, Result};
use dialoguer::{Confirm, theme::ColorfulTheme};
use petrol_store::{Ledger, RESET_PROMPT, ResetOutcome};

use crate::style;
use crate::util::is_interactive;

/// Ask before clearing. Declines when there is no terminal to ask on.
fn confirm(yes: bool, interactive: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !interactive {
        return Ok(false);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(RESET_PROMPT)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

pub async fn cmd_reset(ledger: &Ledger, yes: bool, no_color: bool, quiet: bool) -> Result<()> {
    let interactive = is_interactive();
    let confirmed = confirm(yes, interactive)?;
    if !confirmed && !interactive && !quiet {
        eprintln!("Not running in a terminal; pass --yes to reset history.");
    }

    let outcome = ledger
        .reset_history(confirmed)
        .await
        .context("Failed to reset history")?;

    match outcome {
        ResetOutcome::Declined => {}
        ResetOutcome::Cleared { removed, .. } => {
            if !quiet {
                eprintln!(
                    "{}",
                    style::format_success(
                        &format!("Removed {} history entries", removed),
                        no_color
                    )
                );
            }
        }
    }

    Ok(())
}
