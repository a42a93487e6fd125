use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";
const MIN_SEATS: usize = 2;
const MAX_SEATS: usize = 6;

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchConfig {
    pub run_id: String,
    pub games: GamesConfig,
    pub seats: Vec<SeatConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        self.outputs.validate()?;
        self.logging.normalize();

        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seats.len()) {
            return Err(ValidationError::InvalidField {
                field: "seats".to_string(),
                message: format!(
                    "a table holds {MIN_SEATS} to {MAX_SEATS} seats, found {}",
                    self.seats.len()
                ),
            });
        }
        for (index, seat) in self.seats.iter().enumerate() {
            if seat.name.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: format!("seats[{index}].name"),
                    message: "seat name must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Resolve output templates (`{run_id}` placeholders) to concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
        }
    }
}

/// Game sampling configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    pub count: usize,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Definition of a tournament participant.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SeatConfig {
    pub name: String,
    pub policy: PolicyKind,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    PublicClaim,
    BookBuilder,
    Expectation,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.jsonl.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    pub fn level(&self) -> Option<Level> {
        self.level
            .as_deref()
            .and_then(|raw| raw.to_ascii_uppercase().parse().ok())
    }

    fn normalize(&mut self) {
        if let Some(level) = self.level.as_mut() {
            *level = level.trim().to_ascii_lowercase();
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            level: None,
            json: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Concrete output locations after template resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run id must not be empty".to_string(),
        });
    }
    if let Some(bad) = run_id.chars().find(|ch| !RUN_ID_ALLOWED.contains(*ch)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: format!("run id contains forbidden character '{bad}'"),
        });
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config at {path}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid config at {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
