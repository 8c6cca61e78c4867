//! Username → password digest store persisted as a JSON object.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{FitnessError, Result};

/// Accounts created when no credential file exists yet.
pub const DEFAULT_ACCOUNTS: [(&str, &str); 2] = [("Tejaswini", "junnu_30"), ("Thanvith", "thannu_13")];

/// Lowercase hex SHA-256 digest of `password`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Credential store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    credentials: BTreeMap<String, String>,
}

impl CredentialStore {
    /// Load the store at `path`, seeding and persisting the default accounts
    /// when the file does not exist yet.
    ///
    /// An existing file that is not a JSON object of strings is fatal.
    pub fn load_or_init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let credentials: BTreeMap<String, String> =
                serde_json::from_str(&raw).map_err(|e| FitnessError::malformed(&path, e))?;
            debug!(path = %path.display(), users = credentials.len(), "Loaded credential store");
            return Ok(Self { path, credentials });
        }

        let credentials = DEFAULT_ACCOUNTS
            .iter()
            .map(|(user, password)| ((*user).to_string(), hash_password(password)))
            .collect();
        let store = Self { path, credentials };
        store.save()?;
        info!(path = %store.path.display(), "Initialized credential store with default accounts");
        Ok(store)
    }

    /// True when `username` exists and `password` hashes to its stored digest.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let matched = self
            .credentials
            .get(username)
            .is_some_and(|stored| *stored == hash_password(password));
        if !matched {
            warn!(username, "Login rejected");
        }
        matched
    }

    /// Provision a new account and persist the store.
    pub fn add_user(&mut self, username: &str, password: &str) -> Result<()> {
        if self.credentials.contains_key(username) {
            return Err(FitnessError::UserExists(username.to_string()));
        }
        self.credentials.insert(username.to_string(), hash_password(password));
        self.save()?;
        info!(username, "Provisioned user");
        Ok(())
    }

    /// Write the whole map back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(&self.credentials)?)?;
        Ok(())
    }

    /// Known usernames, sorted.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.credentials.keys().map(String::as_str)
    }

    /// Whether `username` has an account.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.credentials.contains_key(username)
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
