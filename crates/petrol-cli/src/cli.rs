//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse a format name from the config file.
    pub fn from_config(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Rounded tables and colors (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format (defaults to the config file setting, then text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(long)]
    pub compact: bool,
}

#[derive(Parser)]
#[command(name = "petrol")]
#[command(author, version, about = "Fuel cost calculator with local history", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (rich, plain)
    #[arg(long, global = true, value_enum, default_value = "rich")]
    pub style: StyleMode,

    /// Database file (overrides config)
    #[arg(long, global = true, env = "PETROL_DATABASE")]
    pub database: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate fuel efficiency and record it
    ///
    /// Missing values are prompted for when running in a terminal.
    Calc {
        #[command(flatten)]
        form: CalcArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show recent calculations, or the full history with --all
    History {
        /// Show the full history instead of the most recent entries
        #[arg(short, long)]
        all: bool,

        /// Page of the full history to show (1-based)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,

        /// Rows per page for the full history
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=500))]
        per_page: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show aggregate statistics over all calculations
    Stats {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete all recorded calculations
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show database location and size
    Info {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Raw calculator input. Values are validated by the calculator, not clap.
#[derive(Debug, Clone, Default, Args)]
pub struct CalcArgs {
    /// Trip distance in kilometers
    #[arg(short, long)]
    pub mileage: Option<String>,

    /// Fuel grade (e.g. RON95)
    #[arg(long)]
    pub fuel_type: Option<String>,

    /// Price per liter
    #[arg(short, long)]
    pub price: Option<String>,

    /// Total amount paid at the pump
    #[arg(short, long)]
    pub amount: Option<String>,

    /// Number of days the fill-up covered
    #[arg(short, long)]
    pub days: Option<String>,
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Database file path
    Database,
    /// Rows in the recent-history view
    HistoryLimit,
    /// Default output format
    Format,
    /// Disable colored output
    NoColor,
}

impl ConfigKey {
    /// Key name as written on the command line and in the config file.
    pub fn name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().replace('-', "_"))
            .unwrap_or_default()
    }
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
