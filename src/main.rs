// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-Backup CLI
//!
//! Exports the configured Firestore collections to a JSON file.

use clap::Parser;
use firestore_backup::config::{Config, ConfigOverrides};
use firestore_backup::{logging, services};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "firestore-backup")]
#[command(about = "Export Firestore collections to a local JSON file", long_about = None)]
#[command(version)]
struct Cli {
    /// Service-account key file (overrides BACKUP_CREDENTIALS)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Where to write the backup (overrides BACKUP_OUTPUT)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Collection to export, repeatable, kept in order (overrides BACKUP_COLLECTIONS)
    #[arg(short, long = "collection")]
    collections: Vec<String>,

    /// Project ID, if different from the key file (overrides GCP_PROJECT_ID)
    #[arg(long)]
    project_id: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            credential_path: cli.credentials,
            output_path: cli.output,
            collections: cli.collections,
            project_id: cli.project_id,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging();

    // Validate only after flags are applied, so a flag can replace a bad env value.
    let config = match Config::from_env()
        .map(|env_config| env_config.with_overrides(cli.into()))
        .and_then(|config| config.validate().map(|()| config))
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "❌ Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match services::run(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            services::report_failure(&e);
            ExitCode::FAILURE
        }
    }
}
