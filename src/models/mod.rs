// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for a backup run.

pub mod backup;
pub mod credential;

pub use backup::BackupDocument;
pub use credential::ServiceCredential;
