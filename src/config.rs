// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Engine configuration, read from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Dimension;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub default_stack_name: String,
    pub default_width: u32,
    pub default_height: u32,
    /// Whether next/previous wrap around at the ends of the stack.
    pub wrap_navigation: bool,
    pub max_dispatch_depth: usize,
    pub backstack_capacity: usize,
    pub dispatch_thread_name: String,
    /// Default `EnvFilter` directive when `CARDSTACK_LOG` is unset.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_stack_name: "Untitled".to_owned(),
            default_width: 640,
            default_height: 480,
            wrap_navigation: true,
            max_dispatch_depth: crate::dispatch::context::DEFAULT_MAX_DEPTH,
            backstack_capacity: crate::nav::backstack::DEFAULT_CAPACITY,
            dispatch_thread_name: "cardstack-dispatch".to_owned(),
            log_filter: "cardstack=info".to_owned(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_width == 0 || self.default_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "stack dimension must be non-zero (got {}x{})",
                self.default_width, self.default_height
            )));
        }
        if self.max_dispatch_depth == 0 {
            return Err(ConfigError::Invalid("max_dispatch_depth must be at least 1".into()));
        }
        if self.backstack_capacity == 0 {
            return Err(ConfigError::Invalid("backstack_capacity must be at least 1".into()));
        }
        if self.dispatch_thread_name.trim().is_empty() {
            return Err(ConfigError::Invalid("dispatch_thread_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn default_dimension(&self) -> Dimension {
        Dimension::new(self.default_width, self.default_height)
    }
}
