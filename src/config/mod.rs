//! Game configuration
//!
//! All tunable constants of the game core, deserializable from YAML with
//! defaults matching the reference rules: move more than 10 units between
//! samples to score, 300 ms sampling cadence, 60 second games, 2 second
//! warning windows, freezes of 2-5 seconds.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, GameError, Severity, ValidationIssue};

/// Inclusive range of freeze window durations, in seconds.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FreezeRange {
    /// Shortest freeze window
    pub min: u32,
    /// Longest freeze window
    pub max: u32,
}

impl Default for FreezeRange {
    fn default() -> Self {
        Self { min: 2, max: 5 }
    }
}

/// Configuration for one game session.
///
/// Every field has a default; a config file only needs to name the
/// fields it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Per-axis displacement (in landmark coordinate units) that counts
    /// as movement.
    pub movement_threshold: f64,

    /// Interval between motion samples, in milliseconds. The sampler
    /// loop re-arms this interval after each iteration completes.
    pub detection_interval_ms: u64,

    /// Total game length, in seconds.
    pub game_duration_secs: u32,

    /// Warning window before each freeze, in milliseconds.
    pub tolerance_ms: u64,

    /// Progress awarded per qualifying movement sample.
    pub progress_increment: u32,

    /// Progress required to win.
    pub win_threshold: u32,

    /// Freeze window duration range, in seconds.
    pub freeze_secs: FreezeRange,

    /// Minimum gap between the end of one freeze and the trigger of the
    /// next, in seconds.
    pub min_gap_secs: u32,

    /// No freeze triggers before this many seconds of countdown schedule.
    pub min_lead_in_secs: u32,

    /// No freeze triggers within this many seconds of the schedule tail.
    pub min_trailing_secs: u32,

    /// Confidence floor for the pre-start head presence check.
    pub presence_confidence: f64,

    /// Minimum landmark confidence for a sample to contribute to the
    /// head position.
    pub landmark_confidence: f64,

    /// Optional RNG seed for the pause schedule. `None` draws from
    /// entropy; setting it makes schedules reproducible.
    pub schedule_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 10.0,
            detection_interval_ms: 300,
            game_duration_secs: 60,
            tolerance_ms: 2000,
            progress_increment: 5,
            win_threshold: 100,
            freeze_secs: FreezeRange::default(),
            min_gap_secs: 5,
            min_lead_in_secs: 5,
            min_trailing_secs: 10,
            presence_confidence: 0.2,
            landmark_confidence: 0.5,
            schedule_seed: None,
        }
    }
}

impl GameConfig {
    /// Loads and validates a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the path does not exist,
    /// [`ConfigError::ParseError`] on malformed YAML, and
    /// [`ConfigError::ValidationError`] if validation finds errors.
    pub fn from_yaml_file(path: &Path) -> Result<Self, GameError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            }
            .into());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let issues = config.validate();
        if issues.iter().any(|i| i.severity == Severity::Error) {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: issues,
            }
            .into());
        }

        Ok(config)
    }

    /// Validates the configuration, returning all issues found.
    ///
    /// Issues with [`Severity::Warning`] do not prevent the
    /// configuration from being used.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let mut error = |path: &str, message: String| {
            issues.push(ValidationIssue {
                path: path.to_string(),
                message,
                severity: Severity::Error,
            });
        };

        if self.game_duration_secs == 0 {
            error("game_duration_secs", "must be greater than zero".into());
        }
        if self.movement_threshold <= 0.0 {
            error("movement_threshold", "must be positive".into());
        }
        if self.detection_interval_ms == 0 {
            error("detection_interval_ms", "must be greater than zero".into());
        }
        if self.progress_increment == 0 {
            error("progress_increment", "must be greater than zero".into());
        }
        if self.win_threshold == 0 {
            error("win_threshold", "must be greater than zero".into());
        }
        if self.freeze_secs.min == 0 {
            error("freeze_secs.min", "must be greater than zero".into());
        }
        if self.freeze_secs.min > self.freeze_secs.max {
            error(
                "freeze_secs",
                format!(
                    "min {} exceeds max {}",
                    self.freeze_secs.min, self.freeze_secs.max
                ),
            );
        }
        for (path, value) in [
            ("presence_confidence", self.presence_confidence),
            ("landmark_confidence", self.landmark_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                error(path, format!("{value} is outside [0, 1]"));
            }
        }

        // The schedule spaces triggers min_gap_secs apart after each
        // freeze ends. A warning window longer than that gap can still
        // be open when the next trigger fires, and the dispatched event
        // is dropped instead of opening a freeze.
        if self.tolerance_ms > u64::from(self.min_gap_secs) * 1000 {
            error(
                "tolerance_ms",
                format!(
                    "{} ms exceeds min_gap_secs ({} s), scheduled freezes would be dropped",
                    self.tolerance_ms, self.min_gap_secs
                ),
            );
        }

        // Warn when the game cannot be won even with movement on every
        // sample. This is playable but almost certainly a mistake.
        if self.detection_interval_ms > 0 && self.progress_increment > 0 {
            let samples =
                u64::from(self.game_duration_secs) * 1000 / self.detection_interval_ms;
            let max_progress = samples.saturating_mul(u64::from(self.progress_increment));
            if max_progress < u64::from(self.win_threshold) {
                issues.push(ValidationIssue {
                    path: "win_threshold".to_string(),
                    message: "unreachable within game duration".to_string(),
                    severity: Severity::Warning,
                });
            }
        }

        issues
    }

    /// Sampling cadence as a [`Duration`].
    #[must_use]
    pub const fn detection_interval(&self) -> Duration {
        Duration::from_millis(self.detection_interval_ms)
    }

    /// Warning window length as a [`Duration`].
    #[must_use]
    pub const fn tolerance(&self) -> Duration {
        Duration::from_millis(self.tolerance_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_rules() {
        let config = GameConfig::default();
        assert!((config.movement_threshold - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.detection_interval_ms, 300);
        assert_eq!(config.game_duration_secs, 60);
        assert_eq!(config.tolerance_ms, 2000);
        assert_eq!(config.progress_increment, 5);
        assert_eq!(config.win_threshold, 100);
        assert_eq!(config.freeze_secs, FreezeRange { min: 2, max: 5 });
        assert_eq!(config.min_gap_secs, 5);
        assert_eq!(config.min_lead_in_secs, 5);
        assert_eq!(config.min_trailing_secs, 10);
        assert!(config.schedule_seed.is_none());
    }

    #[test]
    fn test_defaults_validate_clean() {
        assert!(GameConfig::default().validate().is_empty());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = GameConfig {
            game_duration_secs: 0,
            ..GameConfig::default()
        };
        let issues = config.validate();
        assert!(
            issues
                .iter()
                .any(|i| i.path == "game_duration_secs" && i.severity == Severity::Error)
        );
    }

    #[test]
    fn test_inverted_freeze_range_rejected() {
        let config = GameConfig {
            freeze_secs: FreezeRange { min: 6, max: 3 },
            ..GameConfig::default()
        };
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.path == "freeze_secs"));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let config = GameConfig {
            landmark_confidence: 1.5,
            ..GameConfig::default()
        };
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.path == "landmark_confidence"));
    }

    #[test]
    fn test_tolerance_longer_than_gap_rejected() {
        let config = GameConfig {
            tolerance_ms: 6000,
            min_gap_secs: 5,
            ..GameConfig::default()
        };
        let issues = config.validate();
        assert!(
            issues
                .iter()
                .any(|i| i.path == "tolerance_ms" && i.severity == Severity::Error)
        );

        // equal to the gap is still accepted
        let config = GameConfig {
            tolerance_ms: 5000,
            min_gap_secs: 5,
            ..GameConfig::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_unreachable_win_threshold_warns() {
        let config = GameConfig {
            game_duration_secs: 1,
            win_threshold: 1000,
            ..GameConfig::default()
        };
        let issues = config.validate();
        assert!(
            issues
                .iter()
                .any(|i| i.path == "win_threshold" && i.severity == Severity::Warning)
        );
    }

    #[test]
    fn test_durations() {
        let config = GameConfig::default();
        assert_eq!(config.detection_interval(), Duration::from_millis(300));
        assert_eq!(config.tolerance(), Duration::from_secs(2));
    }

    #[test]
    fn test_from_yaml_file_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "game_duration_secs: 30\nmovement_threshold: 15.0").unwrap();

        let config = GameConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.game_duration_secs, 30);
        assert!((config.movement_threshold - 15.0).abs() < f64::EPSILON);
        // Untouched fields keep defaults
        assert_eq!(config.tolerance_ms, 2000);
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let err = GameConfig::from_yaml_file(Path::new("/nonexistent/game.yaml")).unwrap_err();
        assert!(matches!(
            err,
            GameError::Config(ConfigError::MissingFile { .. })
        ));
    }

    #[test]
    fn test_from_yaml_file_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "no_such_field: 1").unwrap();

        let err = GameConfig::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            GameError::Config(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_from_yaml_file_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "game_duration_secs: 0").unwrap();

        let err = GameConfig::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            GameError::Config(ConfigError::ValidationError { .. })
        ));
    }
}
