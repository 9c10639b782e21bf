mod script;

use std::process::ExitCode;

use hopper_engine::config::HopperConfig;
use tracing_subscriber::EnvFilter;

use script::{ReplayError, ReplayScript, replay};

const USAGE: &str = "usage: hopper-replay <script.toml> [config.toml]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(&script_path, args.next()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Replay failed: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run(script_path: &str, config_path: Option<String>) -> Result<(), ReplayError> {
    // An explicit config path must load; otherwise fall back like the game does.
    let config = match config_path {
        Some(path) => HopperConfig::from_path(path)?,
        None => HopperConfig::load(),
    };
    let script = ReplayScript::from_path(script_path)?;
    tracing::info!(
        script = script_path,
        segments = script.segments.len(),
        ticks = script.total_ticks(),
        delta = script.delta,
        "Replay starting"
    );

    let report = replay(&script, config)?;
    tracing::info!(score = report.score, phase = ?report.phase, "Replay finished");

    let json = serde_json::to_string_pretty(&report).map_err(ReplayError::Report)?;
    println!("{json}");
    Ok(())
}
