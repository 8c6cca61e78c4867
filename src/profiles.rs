//! Read-only lookup of externally provisioned user profiles.

use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FitnessError, Result};
use crate::models::UserProfile;

/// Profiles stored in `user_profiles.csv`. This crate never writes the file.
#[derive(Debug, Clone)]
pub struct ProfileDirectory {
    path: PathBuf,
}

impl ProfileDirectory {
    /// Directory backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First profile whose username matches exactly; `None` when the file is absent.
    pub fn find(&self, username: &str) -> Result<Option<UserProfile>> {
        if !self.path.is_file() {
            debug!(path = %self.path.display(), "No profile file");
            return Ok(None);
        }

        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| FitnessError::malformed(&self.path, e))?;

        for row in reader.deserialize::<UserProfile>() {
            let profile = row.map_err(|e| FitnessError::malformed(&self.path, e))?;
            if profile.username == username {
                return Ok(Some(profile));
            }
        }
        Ok(None)
    }
}
