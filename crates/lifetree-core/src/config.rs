//! Configuration loading and typed config structures for the Lifetree journey.
//!
//! The canonical configuration lives in `lifetree.yaml` at the project root.
//! Every field has a default matching the baseline journey, so an empty
//! file (or no file at all) yields a working configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level journey configuration. Mirrors the structure of `lifetree.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LifetreeConfig {
    /// Event generation parameters.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Karma scoring parameters.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Consciousness recording parameters.
    #[serde(default)]
    pub recording: RecordingConfig,

    /// Headless journey parameters.
    #[serde(default)]
    pub journey: JourneyConfig,

    /// Narrator service client settings.
    #[serde(default)]
    pub narrator: NarratorClientConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LifetreeConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `NARRATOR_URL` in the environment overrides `narrator.url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.narrator.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall the journey.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `journey.speed` is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let speed = self.journey.speed;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "journey.speed must be positive and finite, got {speed}"
            )));
        }
        Ok(())
    }
}

/// Event generation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationConfig {
    /// Smallest total number of events (universal events included) a life
    /// aims for.
    #[serde(default = "default_target_events")]
    pub target_min: usize,

    /// Largest total number of events a life aims for. The target of each
    /// life is drawn uniformly from `target_min..=target_max`.
    #[serde(default = "default_target_events")]
    pub target_max: usize,

    /// Minimum distance on the life axis between any two events.
    #[serde(default = "default_min_spacing")]
    pub min_spacing: f64,

    /// Sampling attempts before giving up on reaching the target.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            target_min: default_target_events(),
            target_max: default_target_events(),
            min_spacing: default_min_spacing(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Karma scoring parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoringConfig {
    /// Samples required before a life can be scored or narrated.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
        }
    }
}

/// Consciousness recording parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordingConfig {
    /// Keep one sample every this many frames.
    #[serde(default = "default_sample_interval")]
    pub sample_interval: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            sample_interval: default_sample_interval(),
        }
    }
}

/// Headless journey parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JourneyConfig {
    /// Progress added to the cursor each frame.
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Number of lives to play before stopping.
    #[serde(default = "default_lives")]
    pub lives: u32,

    /// Random seed. `None` seeds from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Consciousness change per pilot nudge.
    #[serde(default = "default_pilot_step")]
    pub pilot_step: f64,

    /// Probability per frame that the pilot nudges consciousness.
    #[serde(default = "default_pilot_change_chance")]
    pub pilot_change_chance: f64,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            lives: default_lives(),
            seed: None,
            pilot_step: default_pilot_step(),
            pilot_change_chance: default_pilot_change_chance(),
        }
    }
}

/// Narrator service client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NarratorClientConfig {
    /// Base URL of the narrator service. `None` disables all remote calls.
    #[serde(default)]
    pub url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Ask the narrator for event sequences instead of sampling locally.
    #[serde(default)]
    pub remote_events: bool,

    /// Ask the narrator for a story when a life ends.
    #[serde(default = "default_true")]
    pub stories: bool,
}

impl NarratorClientConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("NARRATOR_URL")
            && !url.trim().is_empty()
        {
            self.url = Some(url);
        }
    }
}

impl Default for NarratorClientConfig {
    fn default() -> Self {
        Self {
            url: None,
            request_timeout_ms: default_request_timeout_ms(),
            remote_events: false,
            stories: default_true(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_target_events() -> usize {
    25
}

const fn default_min_spacing() -> f64 {
    0.03
}

const fn default_max_attempts() -> u32 {
    100
}

const fn default_min_samples() -> usize {
    50
}

const fn default_sample_interval() -> u32 {
    10
}

const fn default_speed() -> f64 {
    0.0005
}

const fn default_lives() -> u32 {
    3
}

const fn default_pilot_step() -> f64 {
    0.1
}

const fn default_pilot_change_chance() -> f64 {
    0.02
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
