use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Closed interval `[min, max]`, used both for gene bounds and for the
/// per-generation crossover/mutation ranges.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Uniform draw from the interval. Callers must have validated `min <= max`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.min..=self.max)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::invalid(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(
                field,
                format!("min ({}) must be <= max ({})", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Parameters of a single optimization run. Immutable once loaded.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub population_size: usize,
    /// Number of genes per agent. Objectives with an intrinsic size override
    /// it, and may leave it out.
    #[serde(default)]
    pub dimension: usize,
    pub generations: usize,
    /// Maximum number of work units executing at once.
    pub concurrency: usize,
    pub report_interval: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    pub bounds: Bounds,
    pub crossover: Bounds,
    pub mutation: Bounds,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Sphere,
    SumAbsProduct,
    CumulativeSum,
    Rastrigin,
    Booth,
    Beale,
    Matyas,
    TeamCoverage,
}

impl ObjectiveKind {
    /// Whether the objective fixes its own gene count, making
    /// `run.dimension` irrelevant.
    pub fn has_fixed_dimension(self) -> bool {
        matches!(
            self,
            ObjectiveKind::Booth
                | ObjectiveKind::Beale
                | ObjectiveKind::Matyas
                | ObjectiveKind::TeamCoverage
        )
    }
}

fn default_team_size() -> usize {
    6
}

fn default_penalty() -> f64 {
    10_000.0
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ObjectiveConfig {
    pub kind: ObjectiveKind,
    /// CSV dataset, required by `team_coverage`
    #[serde(default)]
    pub data_file: Option<String>,
    #[serde(default = "default_team_size")]
    pub team_size: usize,
    /// Score added per uncovered category
    #[serde(default = "default_penalty")]
    pub penalty: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_repeat() -> usize {
    1
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Runs the whole optimization this many times and reports timing statistics.
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            repeat: default_repeat(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub run: RunConfig,
    pub objective: ObjectiveConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Checks every invariant the engine and objectives rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.run.validate()?;
        if self.run.dimension == 0 && !self.objective.kind.has_fixed_dimension() {
            return Err(ConfigError::invalid(
                "run.dimension",
                "must be greater than zero",
            ));
        }

        let objective = &self.objective;
        if objective.kind == ObjectiveKind::TeamCoverage {
            if objective.data_file.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::invalid(
                    "objective.data_file",
                    "team_coverage requires a dataset file",
                ));
            }
            if objective.team_size == 0 {
                return Err(ConfigError::invalid(
                    "objective.team_size",
                    "must be greater than zero",
                ));
            }
            if !objective.penalty.is_finite() || objective.penalty <= 0.0 {
                return Err(ConfigError::invalid(
                    "objective.penalty",
                    format!("must be finite and positive, got {}", objective.penalty),
                ));
            }
        }

        if self.output.repeat == 0 {
            return Err(ConfigError::invalid(
                "output.repeat",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::invalid(
                "run.population_size",
                "must be greater than zero",
            ));
        }
        if self.generations == 0 {
            return Err(ConfigError::invalid(
                "run.generations",
                "must be greater than zero",
            ));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::invalid(
                "run.concurrency",
                "must be greater than zero",
            ));
        }
        if self.report_interval == 0 {
            return Err(ConfigError::invalid(
                "run.report_interval",
                "must be greater than zero",
            ));
        }

        self.bounds.check("run.bounds")?;
        self.crossover.check("run.crossover")?;
        self.mutation.check("run.mutation")?;

        if self.crossover.min < 0.0 || self.crossover.max > 1.0 {
            return Err(ConfigError::invalid(
                "run.crossover",
                "crossover rates must lie within [0, 1]",
            ));
        }
        if self.mutation.min < 0.0 {
            return Err(ConfigError::invalid(
                "run.mutation",
                "mutation factors must be non-negative",
            ));
        }
        Ok(())
    }
}
