//! Command-line fuel cost calculator.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `calc` | Calculate KM per RM and record it |
//! | `history` | Recent or full calculation history |
//! | `stats` | Aggregate statistics |
//! | `reset` | Delete all history (asks first) |
//! | `info` | Database location and size |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |

mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{
    HistoryArgs, cmd_calc, cmd_config, cmd_history, cmd_info, cmd_reset, cmd_stats,
};
use config::{Config, resolve_format};
use format::FormatOptions;
use util::open_ledger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "petrol", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so piped JSON/CSV stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let no_color = cli.no_color || config.no_color;
    let base_opts = FormatOptions::new(no_color, cli.style);
    let output = cli.output.as_ref();

    match cli.command {
        Commands::Calc { form, output: out } => {
            let ledger = open_ledger(cli.database, &config);
            let opts = base_opts.with_no_header(out.no_header).with_compact(out.compact);
            cmd_calc(
                &ledger,
                form,
                resolve_format(out.format, &config),
                output,
                &opts,
                cli.quiet,
            )
            .await?;
        }
        Commands::History {
            all,
            page,
            per_page,
            output: out,
        } => {
            let ledger = open_ledger(cli.database, &config);
            let opts = base_opts.with_no_header(out.no_header).with_compact(out.compact);
            let args = HistoryArgs {
                all,
                page,
                per_page,
                format: resolve_format(out.format, &config),
                output: output.cloned(),
            };
            cmd_history(&ledger, args, &opts).await?;
        }
        Commands::Stats { output: out } => {
            let ledger = open_ledger(cli.database, &config);
            let opts = base_opts.with_no_header(out.no_header).with_compact(out.compact);
            cmd_stats(&ledger, resolve_format(out.format, &config), output, &opts).await?;
        }
        Commands::Reset { yes } => {
            let ledger = open_ledger(cli.database, &config);
            cmd_reset(&ledger, yes, no_color, cli.quiet).await?;
        }
        Commands::Info { output: out } => {
            let ledger = open_ledger(cli.database, &config);
            let opts = base_opts.with_no_header(out.no_header).with_compact(out.compact);
            cmd_info(&ledger, resolve_format(out.format, &config), output, &opts).await?;
        }
        Commands::Config { action } => {
            cmd_config(action, no_color, cli.quiet)?;
        }
        // Handled before tracing init
        Commands::Completions { .. } => {}
    }

    Ok(())
}
