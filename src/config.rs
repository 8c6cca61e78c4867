use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::predictor::ForestParams;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub predictor: PredictorConfig,
    pub training: TrainingConfig,
    pub goals: GoalsConfig,
}

/// Locations of the flat files, relative to `data_dir`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub credentials_file: String,
    pub workout_log: String,
    pub food_log: String,
    pub training_data: String,
    pub user_profiles: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

/// Random forest hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    pub n_estimators: usize,
    pub random_state: u64,
    pub test_size: f64,
    pub min_samples_split: usize,
    /// 0 means unlimited
    pub max_depth: usize,
}

/// Synthetic training set generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub sample_count: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsConfig {
    pub daily_calorie_target: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                credentials_file: "user_credentials.json".to_string(),
                workout_log: "workout_log.csv".to_string(),
                food_log: "food_log.csv".to_string(),
                training_data: "fitness_data.csv".to_string(),
                user_profiles: "user_profiles.csv".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            predictor: PredictorConfig {
                n_estimators: 100,
                random_state: 42,
                test_size: 0.2,
                min_samples_split: 2,
                max_depth: 0,
            },
            training: TrainingConfig {
                sample_count: 100,
                seed: 42,
            },
            goals: GoalsConfig {
                daily_calorie_target: 2000,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], with an extra file layered above the
    /// standard locations and below the environment.
    pub fn load_from(extra_file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults_builder()
            .map_err(|e| anyhow::anyhow!("Failed to set configuration defaults: {}", e))?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Add environment variables with prefix, e.g. FITNESS_TRACKER_STORAGE__DATA_DIR
            .add_source(
                Environment::with_prefix("FITNESS_TRACKER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Builder seeded with every default value.
    fn defaults_builder() -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("storage.data_dir", defaults.storage.data_dir)?
            .set_default("storage.credentials_file", defaults.storage.credentials_file)?
            .set_default("storage.workout_log", defaults.storage.workout_log)?
            .set_default("storage.food_log", defaults.storage.food_log)?
            .set_default("storage.training_data", defaults.storage.training_data)?
            .set_default("storage.user_profiles", defaults.storage.user_profiles)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("predictor.n_estimators", defaults.predictor.n_estimators as u64)?
            .set_default("predictor.random_state", defaults.predictor.random_state)?
            .set_default("predictor.test_size", defaults.predictor.test_size)?
            .set_default("predictor.min_samples_split", defaults.predictor.min_samples_split as u64)?
            .set_default("predictor.max_depth", defaults.predictor.max_depth as u64)?
            .set_default("training.sample_count", defaults.training.sample_count as u64)?
            .set_default("training.seed", defaults.training.seed)?
            .set_default("goals.daily_calorie_target", u64::from(defaults.goals.daily_calorie_target))?;

        if let Some(file_path) = defaults.logging.file_path {
            builder = builder.set_default("logging.file_path", file_path)?;
        }

        Ok(builder)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate storage config
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.data_dir cannot be empty"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate predictor config
        if self.predictor.n_estimators == 0 {
            return Err(anyhow::anyhow!("n_estimators must be greater than 0"));
        }
        if !(self.predictor.test_size > 0.0 && self.predictor.test_size < 1.0) {
            return Err(anyhow::anyhow!("test_size must be between 0 and 1 (exclusive)"));
        }
        if self.predictor.min_samples_split < 2 {
            return Err(anyhow::anyhow!("min_samples_split must be at least 2"));
        }

        // Validate training config
        if self.training.sample_count == 0 {
            return Err(anyhow::anyhow!("sample_count must be greater than 0"));
        }

        Ok(())
    }

    /// Resolve a file name from the storage section against `data_dir`
    pub fn data_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.storage.data_dir).join(file_name)
    }

    /// Point every store at `data_dir`
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.storage.data_dir = data_dir.as_ref().to_string_lossy().into_owned();
        self
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

impl PredictorConfig {
    /// Forest hyperparameters for the predictor
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            random_state: self.random_state,
            min_samples_split: self.min_samples_split,
            max_depth: (self.max_depth > 0).then_some(self.max_depth),
        }
    }
}
