//! `statues validate` — check a configuration file without playing

use crate::cli::args::ValidateArgs;
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError};

/// Validates the configuration file, printing every issue found.
///
/// # Errors
///
/// Returns an error if the file is missing, malformed, or fails
/// validation. Warnings are printed but do not fail the command.
pub fn execute(args: &ValidateArgs) -> Result<(), GameError> {
    match GameConfig::from_yaml_file(&args.config) {
        Ok(config) => {
            for issue in config.validate() {
                eprintln!("{issue}");
            }
            println!("{}: ok", args.config.display());
            Ok(())
        }
        Err(GameError::Config(ConfigError::ValidationError { path, errors })) => {
            for issue in &errors {
                eprintln!("{issue}");
            }
            Err(ConfigError::ValidationError { path, errors }.into())
        }
        Err(e) => Err(e),
    }
}
