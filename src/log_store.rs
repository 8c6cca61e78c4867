//! Append-only CSV stores for workouts and meals.
//!
//! Each store owns one file. The header row is written by the first append to
//! an absent or empty file; later appends add a single record. There is no
//! locking, so two processes appending at once may interleave records.

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FitnessError, Result};
use crate::models::{FoodEntry, WorkoutEntry};

/// Record that can live in a per-user log.
pub trait LogEntry: Serialize + DeserializeOwned {
    /// Short name used in logs and metrics
    const KIND: &'static str;

    /// Owner of the record
    fn username(&self) -> &str;

    /// Day the record applies to
    fn date(&self) -> NaiveDate;

    /// Calories counted by the record
    fn calories(&self) -> f64;
}

impl LogEntry for WorkoutEntry {
    const KIND: &'static str = "workout";

    fn username(&self) -> &str {
        &self.username
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn calories(&self) -> f64 {
        self.calories_burned
    }
}

impl LogEntry for FoodEntry {
    const KIND: &'static str = "food";

    fn username(&self) -> &str {
        &self.username
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn calories(&self) -> f64 {
        self.calories
    }
}

/// CSV file holding records of one type.
#[derive(Debug, Clone)]
pub struct CsvLog<T> {
    path: PathBuf,
    _entry: PhantomData<fn() -> T>,
}

/// Workout log (`workout_log.csv`)
pub type WorkoutLog = CsvLog<WorkoutEntry>;

/// Food log (`food_log.csv`)
pub type FoodLog = CsvLog<FoodEntry>;

impl<T: LogEntry> CsvLog<T> {
    /// Store backed by `path`; nothing is touched until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entry: PhantomData,
        }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Append one record, writing the header first when the file is new or empty.
    pub fn append(&self, entry: &T) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let needs_header = fs::metadata(&self.path).map_or(true, |meta| meta.len() == 0);
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(needs_header).from_writer(file);

        writer.serialize(entry)?;
        writer.flush()?;

        debug!(
            kind = T::KIND,
            path = %self.path.display(),
            header = needs_header,
            "Appended log entry"
        );
        crate::metrics::record_entry_logged(T::KIND);
        Ok(())
    }

    /// Read every record. An absent or empty file yields no records; an
    /// unparsable row is fatal.
    pub fn load_all(&self) -> Result<Vec<T>> {
        if !self.exists() {
            debug!(kind = T::KIND, path = %self.path.display(), "Log absent, treating as empty");
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| FitnessError::malformed(&self.path, e))?;

        reader
            .deserialize()
            .map(|row| row.map_err(|e| FitnessError::malformed(&self.path, e)))
            .collect()
    }

    /// Records owned by exactly `username`.
    pub fn load_for_user(&self, username: &str) -> Result<Vec<T>> {
        let mut entries = self.load_all()?;
        entries.retain(|entry| entry.username() == username);
        Ok(entries)
    }
}
