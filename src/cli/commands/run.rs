//! `statues run` — play a game against a scripted motion source

use std::time::Duration;

use tracing::info;

use crate::cli::args::RunArgs;
use crate::config::GameConfig;
use crate::display::ConsoleDisplay;
use crate::error::GameError;
use crate::pose::scripted::ScriptedSampler;
use crate::session::{GameSession, Phase};

/// Poll cadence while waiting for the game to finish.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Runs one full game session and prints the result.
///
/// # Errors
///
/// Returns an error if the configuration or script fails to load, or
/// if the game fails to start (e.g. the first scripted frame has no
/// head in it).
pub async fn execute(args: &RunArgs) -> Result<(), GameError> {
    let config = match &args.config {
        Some(path) => GameConfig::from_yaml_file(path)?,
        None => GameConfig::default(),
    };
    for issue in config.validate() {
        eprintln!("{issue}");
    }

    let sampler = ScriptedSampler::from_path(&args.script)?;
    let session = GameSession::new(config, sampler, ConsoleDisplay);

    session.start().await?;

    let outcome = loop {
        let snapshot = session.snapshot();
        if !snapshot.phase.is_running() {
            break snapshot.phase;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    };

    info!(outcome = ?outcome, "game finished");
    match outcome {
        Phase::Won => println!("result: won"),
        Phase::Over => println!("result: game over"),
        // reachable only if something external reset the session
        _ => println!("result: aborted"),
    }
    Ok(())
}
