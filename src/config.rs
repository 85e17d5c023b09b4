// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backup configuration loaded from environment variables.
//!
//! Every option has a default, so a run with no environment and no flags
//! reads `./fs-apikey.json` and writes `./fs-backup.json`.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

/// Default location of the service-account key file.
pub const DEFAULT_CREDENTIAL_PATH: &str = "./fs-apikey.json";
/// Default location of the backup file.
pub const DEFAULT_OUTPUT_PATH: &str = "./fs-backup.json";
/// Collections exported when none are configured.
pub const DEFAULT_COLLECTIONS: [&str; 3] = ["favmrts", "favourites", "ownroutes"];

/// Backup configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Service-account key file
    pub credential_path: PathBuf,
    /// Where the backup JSON is written
    pub output_path: PathBuf,
    /// Collections to export, in output order
    pub collections: Vec<String>,
    /// Overrides the project ID from the credential
    pub project_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credential_path: PathBuf::from(DEFAULT_CREDENTIAL_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            collections: DEFAULT_COLLECTIONS.iter().map(|c| c.to_string()).collect(),
            project_id: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// The result is not validated; call [`Config::validate`] once every
    /// override has been applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let collections = match non_empty("BACKUP_COLLECTIONS") {
            Some(list) => list.split(',').map(|c| c.trim().to_string()).collect(),
            None => defaults.collections,
        };

        Ok(Self {
            credential_path: non_empty("BACKUP_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or(defaults.credential_path),
            output_path: non_empty("BACKUP_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            collections,
            project_id: non_empty("GCP_PROJECT_ID").map(|v| v.trim().to_string()),
        })
    }

    /// Apply command-line overrides. Unset overrides keep the current value.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.credential_path {
            self.credential_path = path;
        }
        if let Some(path) = overrides.output_path {
            self.output_path = path;
        }
        if !overrides.collections.is_empty() {
            self.collections = overrides.collections;
        }
        if let Some(project) = overrides.project_id {
            self.project_id = Some(project);
        }
        self
    }

    /// Check that the collection list can produce a well-formed backup.
    ///
    /// Each name becomes a top-level key of the output, so names must be
    /// non-empty and unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collections.is_empty() {
            return Err(ConfigError::NoCollections);
        }

        let mut seen = HashSet::new();
        for name in &self.collections {
            if name.is_empty() {
                return Err(ConfigError::EmptyCollectionName);
            }
            if name.contains('/') {
                return Err(ConfigError::InvalidCollectionName(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateCollection(name.clone()));
            }
        }

        Ok(())
    }
}

/// Values given on the command line, layered over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub credential_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub collections: Vec<String>,
    pub project_id: Option<String>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No collections configured")]
    NoCollections,

    #[error("Collection names must not be empty")]
    EmptyCollectionName,

    #[error("Collection name must not contain '/': {0}")]
    InvalidCollectionName(String),

    #[error("Collection listed more than once: {0}")]
    DuplicateCollection(String),
}
