//! Training set for the calorie predictor.
//!
//! The set lives in a CSV file. When the file is absent a synthetic set is
//! generated from a fixed seed and written once; an existing file is loaded
//! as-is with no deduplication or schema checks beyond parsing.

use csv::{ReaderBuilder, Writer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{FitnessError, Result};
use crate::models::TrainingSample;
use crate::utils::round_to;

/// CSV-backed training set.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    path: PathBuf,
    sample_count: usize,
    seed: u64,
}

impl TrainingSet {
    /// Training set at `path`, generating `sample_count` rows from `seed` if absent.
    pub fn new(path: impl Into<PathBuf>, sample_count: usize, seed: u64) -> Self {
        Self {
            path: path.into(),
            sample_count,
            seed,
        }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the synthetic set unless the file already exists.
    ///
    /// Returns true when a new file was generated.
    pub fn ensure(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let samples = generate_samples(self.sample_count, self.seed);
        let mut writer = Writer::from_path(&self.path)?;
        for sample in &samples {
            writer.serialize(sample)?;
        }
        writer.flush()?;

        info!(
            path = %self.path.display(),
            rows = samples.len(),
            seed = self.seed,
            "Generated synthetic training set"
        );
        Ok(true)
    }

    /// Ensure the file exists, then read every row.
    pub fn load(&self) -> Result<Vec<TrainingSample>> {
        self.ensure()?;

        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| FitnessError::malformed(&self.path, e))?;
        let samples = reader
            .deserialize()
            .map(|row| row.map_err(|e| FitnessError::malformed(&self.path, e)))
            .collect::<Result<Vec<TrainingSample>>>()?;

        debug!(path = %self.path.display(), rows = samples.len(), "Loaded training set");
        Ok(samples)
    }
}

/// Synthetic rows: uniform draws over plausible physiological ranges.
#[must_use]
pub fn generate_samples(count: usize, seed: u64) -> Vec<TrainingSample> {
    let mut rng = StdRng::seed_from_u64(seed);

    (1..=count)
        .map(|id| TrainingSample {
            user_id: u32::try_from(id).unwrap_or(u32::MAX),
            age: f64::from(rng.gen_range(18_u32..60)),
            bmi: round_to(rng.gen_range(18.0..35.0), 2),
            duration: f64::from(rng.gen_range(5_u32..60)),
            heart_rate: f64::from(rng.gen_range(60_u32..150)),
            body_temp: round_to(rng.gen_range(36.0..40.0), 2),
            calories: f64::from(rng.gen_range(100_u32..800)),
        })
        .collect()
}
