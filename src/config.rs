//! Training configuration via TOML files.
//!
//! Every field has a default, so a partial (or missing) file configures
//! only what it names.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::boost::RateTargets;

/// Errors from loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Failed to read config file: {err}"),
            ConfigError::Parse(msg) => write!(f, "Failed to parse config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

/// Stage-training settings loaded from TOML.
///
/// ```toml
/// [training]
/// max_rounds = 64
/// min_true_positive_rate = 0.995
/// max_false_positive_rate = 0.5
/// decision_threshold = 0.0
///
/// [logging]
/// log_dir = "logs"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Hard cap on learners per stage.
    pub max_rounds: usize,
    /// Detection rate a stage must reach on the positive class.
    pub min_true_positive_rate: f32,
    /// Pass-through rate a stage may leave on the negative class.
    pub max_false_positive_rate: f32,
    /// Output threshold the rates are measured against.
    pub decision_threshold: f32,
    /// Directory for JSON line-delimited training logs.
    pub log_dir: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let targets = RateTargets::default();
        Self {
            max_rounds: targets.max_rounds,
            min_true_positive_rate: targets.min_true_positive_rate,
            max_false_positive_rate: targets.max_false_positive_rate,
            decision_threshold: targets.decision_threshold,
            log_dir: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    training: TrainingSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TrainingSection {
    max_rounds: Option<usize>,
    min_true_positive_rate: Option<f32>,
    max_false_positive_rate: Option<f32>,
    decision_threshold: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    log_dir: Option<PathBuf>,
}

impl TrainConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        let defaults = Self::default();
        Ok(Self {
            max_rounds: file.training.max_rounds.unwrap_or(defaults.max_rounds),
            min_true_positive_rate: file
                .training
                .min_true_positive_rate
                .unwrap_or(defaults.min_true_positive_rate),
            max_false_positive_rate: file
                .training
                .max_false_positive_rate
                .unwrap_or(defaults.max_false_positive_rate),
            decision_threshold: file
                .training
                .decision_threshold
                .unwrap_or(defaults.decision_threshold),
            log_dir: file.logging.log_dir.unwrap_or(defaults.log_dir),
        })
    }

    /// The stage-sizing targets this configuration asks for.
    pub fn rate_targets(&self) -> RateTargets {
        RateTargets {
            min_true_positive_rate: self.min_true_positive_rate,
            max_false_positive_rate: self.max_false_positive_rate,
            decision_threshold: self.decision_threshold,
            max_rounds: self.max_rounds,
        }
    }
}
