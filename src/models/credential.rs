// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Service-account credential loaded from a local key file.

use crate::error::BackupError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Google service-account key, as downloaded from the Cloud console.
///
/// Only the fields needed to pick a project and authenticate are kept; the
/// file itself is handed to the Firestore client for token exchange.
#[derive(Clone, Deserialize)]
pub struct ServiceCredential {
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub project_id: String,
    pub client_email: String,
    private_key: String,
    /// Path the credential was read from
    #[serde(skip)]
    pub path: PathBuf,
}

impl ServiceCredential {
    /// Read and validate a key file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BackupError> {
        let path = path.as_ref();
        let fail = |message: String| BackupError::Credential {
            path: path.to_path_buf(),
            message,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let mut credential = Self::parse(&raw).map_err(fail)?;
        credential.path = path.to_path_buf();

        tracing::debug!(
            path = %path.display(),
            project = %credential.project_id,
            client_email = %credential.client_email,
            "Loaded service credential"
        );

        Ok(credential)
    }

    /// Parse key file contents.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let credential: Self = serde_json::from_str(raw).map_err(|e| e.to_string())?;

        if let Some(kind) = &credential.account_type {
            if kind != SERVICE_ACCOUNT_TYPE {
                return Err(format!(
                    "expected credential type \"{}\", found \"{}\"",
                    SERVICE_ACCOUNT_TYPE, kind
                ));
            }
        }
        if credential.project_id.trim().is_empty() {
            return Err("project_id is empty".to_string());
        }
        if credential.client_email.trim().is_empty() {
            return Err("client_email is empty".to_string());
        }
        if credential.private_key.trim().is_empty() {
            return Err("private_key is empty".to_string());
        }

        Ok(credential)
    }
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredential")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("path", &self.path)
            .finish()
    }
}
