//! Command implementations for the CLI.

mod calc;
mod config;
mod history;
mod info;
mod reset;
mod stats;

pub use calc::cmd_calc;
pub use config::cmd_config;
pub use history::{HistoryArgs, cmd_history};
pub use info::cmd_info;
pub use reset::cmd_reset;
pub use stats::cmd_stats;
