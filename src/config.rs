//! Combined generator configuration and JSON loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clouds::CloudConfig;
use crate::error::GenerationError;
use crate::terrain::TerrainConfig;

/// Errors that can occur while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] GenerationError),
}

/// Settings for a full terrain + cloud generation run.
///
/// Either section may be omitted to skip that generator. Missing fields
/// inside a section take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub terrain: Option<TerrainConfig>,
    pub clouds: Option<CloudConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            terrain: Some(TerrainConfig::default()),
            clouds: Some(CloudConfig::default()),
        }
    }
}

impl GeneratorConfig {
    /// Hilly terrain under dense cumulus banks.
    pub fn highlands(seed: u64) -> Self {
        Self {
            terrain: Some(TerrainConfig::hills(seed)),
            clouds: Some(CloudConfig::cumulus(seed)),
        }
    }

    /// Flat plains with a few scattered clouds.
    pub fn plains(seed: u64) -> Self {
        Self {
            terrain: Some(TerrainConfig::flat(seed)),
            clouds: Some(CloudConfig::sparse(seed)),
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes this configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every present section.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if let Some(terrain) = &self.terrain {
            terrain.validate()?;
        }
        if let Some(clouds) = &self.clouds {
            clouds.validate()?;
        }
        Ok(())
    }

    /// Overrides the seed of every present section.
    pub fn with_seed(mut self, seed: u64) -> Self {
        if let Some(terrain) = &mut self.terrain {
            terrain.seed = seed;
        }
        if let Some(clouds) = &mut self.clouds {
            clouds.seed = seed;
        }
        self
    }
}
