// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Process-wide `tracing` subscriber setup.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive that overrides the configured one.
pub const LOG_ENV: &str = "CARDSTACK_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `cardstack.<pid>.log` inside this directory (created if missing).
    Directory(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),
}

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Installs the global subscriber. Returns the log file path when logging to a directory.
pub fn init(target: LogTarget, default_directive: &str) -> Result<Option<PathBuf>, LoggingError> {
    match target {
        LogTarget::Stderr => {
            let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(true);
            tracing_subscriber::registry()
                .with(filter(default_directive))
                .with(layer)
                .try_init()
                .map_err(|_| LoggingError::AlreadyInitialized)?;
            Ok(None)
        }
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(format!("cardstack.{}.log", std::process::id()));
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);
            tracing_subscriber::registry()
                .with(filter(default_directive))
                .with(layer)
                .try_init()
                .map_err(|_| LoggingError::AlreadyInitialized)?;
            tracing::info!(path = ?path, "logging to file");
            Ok(Some(path))
        }
    }
}
