//! Scenario-runner binary: loads a RON/JSON scenario (map + starting
//! entities), drives the attack/turn pipeline to completion or a turn
//! ceiling, and prints the resulting message stream. Analogous to the
//! teacher's `--headless` mode, minus the Bevy `App` it ran inside.

use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use rogue_core::cli::{self, Args};
use rogue_core::scenario::{load_config, load_scenario, run_scenario};

fn run(args: Args) -> Result<(), String> {
    let scenario = load_scenario(&args.scenario)?;
    let config = load_config(args.config.as_deref())?;

    info!(path = %args.scenario.display(), "loaded scenario");
    let result = run_scenario(&scenario, &config, args.seed, args.max_turns);

    for message in &result.messages {
        println!("{message}");
    }
    println!("--- combat log ---");
    for entry in &result.log.entries {
        println!("[turn {}] {}", entry.turn, entry.message);
    }
    info!(turns_run = result.turns_run, "scenario complete");

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = cli::parse_args();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
