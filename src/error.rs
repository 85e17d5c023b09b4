// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for a backup run.
//!
//! Every variant is fatal: the run stops at the first error and nothing is
//! written to the output path.

use std::path::PathBuf;

/// Backup error type.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Failed to load credential from {}: {message}", .path.display())]
    Credential { path: PathBuf, message: String },

    #[error("Failed to connect to Firestore: {0}")]
    Connect(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to export collection {collection}: {message}")]
    Export { collection: String, message: String },

    #[error("Failed to serialize backup: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write backup to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BackupError {
    /// Shorthand for an export failure on `collection`.
    pub fn export(collection: &str, message: impl ToString) -> Self {
        BackupError::Export {
            collection: collection.to_string(),
            message: message.to_string(),
        }
    }

    /// Name of the collection whose export failed, if this is an export error.
    pub fn collection(&self) -> Option<&str> {
        match self {
            BackupError::Export { collection, .. } => Some(collection),
            _ => None,
        }
    }
}

/// Result type alias for backup operations
pub type Result<T> = std::result::Result<T, BackupError>;
