// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backup workflow.
//!
//! 1. Load the service credential and connect to Firestore
//! 2. Export each configured collection, one at a time, in order
//! 3. Write the aggregate as pretty-printed JSON to the output path
//!
//! The output file is only touched after every export has succeeded.

use crate::config::Config;
use crate::db::FirestoreDb;
use crate::error::{BackupError, Result};
use crate::models::{BackupDocument, ServiceCredential};
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Source of exported collection data.
pub trait CollectionExporter {
    /// Fetch everything stored in `collection`.
    fn export(&self, collection: &str) -> impl Future<Output = Result<Value>>;
}

impl<E: CollectionExporter + ?Sized> CollectionExporter for &E {
    fn export(&self, collection: &str) -> impl Future<Output = Result<Value>> {
        (**self).export(collection)
    }
}

/// Runs a backup against an exporter.
pub struct BackupService<E> {
    exporter: E,
}

impl<E: CollectionExporter> BackupService<E> {
    pub fn new(exporter: E) -> Self {
        Self { exporter }
    }

    /// Export `collections` sequentially into one document.
    ///
    /// Each export is awaited before the next starts. The first failure
    /// aborts the loop.
    pub async fn export_all(&self, collections: &[String]) -> Result<BackupDocument> {
        let mut document = BackupDocument::new();

        for collection in collections {
            tracing::info!("Backing up collection: {}", collection);
            let data = self.exporter.export(collection).await?;
            document.insert(collection.as_str(), data);
        }

        Ok(document)
    }

    /// Export `collections` and write the result to `output_path`.
    pub async fn backup(&self, collections: &[String], output_path: &Path) -> Result<()> {
        let document = self.export_all(collections).await?;
        write_backup(&document, output_path).await?;

        tracing::info!(
            collections = document.len(),
            "✅ Backup saved to {}",
            output_path.display()
        );
        Ok(())
    }
}

/// Run a full backup as described by `config`.
///
/// Credential problems surface before any network call is made.
pub async fn run(config: &Config) -> Result<PathBuf> {
    tracing::info!(
        credentials = %config.credential_path.display(),
        collections = ?config.collections,
        "Exporting Firestore collections..."
    );

    let credential = ServiceCredential::load(&config.credential_path)?;
    let db = FirestoreDb::connect(&credential, config.project_id.as_deref()).await?;

    BackupService::new(db)
        .backup(&config.collections, &config.output_path)
        .await?;

    Ok(config.output_path.clone())
}

/// Log a failed run. Called once, at the top-level failure boundary.
pub fn report_failure(err: &BackupError) {
    tracing::error!(error = %err, "❌ Error exporting Firestore");
}

/// Serialize `document` and replace the file at `path` with it.
///
/// The JSON goes to a hidden sibling file first and is renamed into place,
/// so `path` holds either the old backup or the complete new one.
pub async fn write_backup(document: &BackupDocument, path: &Path) -> Result<()> {
    let json = document.to_json_pretty()?;
    let tmp_path = temp_path_for(path);

    let write_err = |source| BackupError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Err(e) = tokio::fs::write(&tmp_path, json.as_bytes()).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }

    tracing::debug!(path = %path.display(), bytes = json.len(), "Backup file written");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
