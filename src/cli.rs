//! Command-line interface for the scenario-runner binary.
//!
//! A `clap::Parser` struct plus a thin `parse_args` wrapper. There is no
//! graphical mode to default to here, so the scenario file is a required
//! positional argument rather than an optional flag.

use std::path::PathBuf;

use clap::Parser;

/// Runs a scenario file through the combat/status-effect/interaction core
/// and prints the resulting message stream.
#[derive(Parser, Debug)]
#[command(name = "rogue-core-cli")]
#[command(about = "Scenario runner for the combat/status-effect/interaction core")]
#[command(version)]
pub struct Args {
    /// Path to a RON or JSON scenario file (map + starting entities).
    pub scenario: PathBuf,

    /// Path to a RON config file overriding difficulty/knowledge/range-band
    /// defaults. Falls back to compiled-in defaults when omitted.
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Overrides the scenario's own seed, for reproducing a specific run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum number of player/monster turn pairs to simulate before
    /// stopping, as a safety bound against scenarios with no resolution.
    #[arg(long, default_value = "200")]
    pub max_turns: u32,
}

pub fn parse_args() -> Args {
    Args::parse()
}
