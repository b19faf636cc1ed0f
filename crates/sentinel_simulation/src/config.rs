//! Конфигурация симуляции (seed, tick rate, параметры агента)
//!
//! JSON документ, все поля опциональны:
//! ```json
//! { "seed": 7, "tick_hz": 60.0, "agent": { "detect_range": 3.0 } }
//! ```

use std::path::Path;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AgentConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {value}")]
    Invalid { field: &'static str, value: f32 },
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Частота FixedUpdate
    pub tick_hz: f32,
    /// Параметры для новых агентов
    pub agent: AgentConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            agent: AgentConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_hz.is_finite() || self.tick_hz <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "tick_hz",
                value: self.tick_hz,
            });
        }

        self.agent.validate()
    }

    /// Длительность одного тика (секунды)
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_hz
    }
}
