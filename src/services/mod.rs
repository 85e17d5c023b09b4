// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backup workflow.

pub mod backup;

pub use backup::{report_failure, run, write_backup, BackupService, CollectionExporter};
