use std::time::Duration;

use crate::config::ConfigError;
use crate::config_env::{parse_u32_env, parse_u64_env, parse_usize_env};

const DEFAULT_CIRCUIT_BREAKER_FAILURE_THRESHOLD: u32 = 5;
const DEFAULT_CIRCUIT_BREAKER_COOLDOWN_SECONDS: u64 = 60;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 20;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 256;

#[derive(Debug, Clone)]
pub struct LlmReliabilityConfig {
    pub circuit_breaker_failure_threshold: u32,
    pub circuit_breaker_cooldown_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub cache_max_entries: usize,
}

impl Default for LlmReliabilityConfig {
    fn default() -> Self {
        Self {
            circuit_breaker_failure_threshold: DEFAULT_CIRCUIT_BREAKER_FAILURE_THRESHOLD,
            circuit_breaker_cooldown_seconds: DEFAULT_CIRCUIT_BREAKER_COOLDOWN_SECONDS,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl LlmReliabilityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            circuit_breaker_failure_threshold: parse_u32_env(
                "LLM_CIRCUIT_BREAKER_FAILURE_THRESHOLD",
                defaults.circuit_breaker_failure_threshold,
            )?,
            circuit_breaker_cooldown_seconds: parse_u64_env(
                "LLM_CIRCUIT_BREAKER_COOLDOWN_SECONDS",
                defaults.circuit_breaker_cooldown_seconds,
            )?,
            cache_ttl_seconds: parse_u64_env("LLM_CACHE_TTL_SECONDS", defaults.cache_ttl_seconds)?,
            cache_max_entries: parse_usize_env(
                "LLM_CACHE_MAX_ENTRIES",
                defaults.cache_max_entries,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.circuit_breaker_failure_threshold == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "LLM_CIRCUIT_BREAKER_FAILURE_THRESHOLD must be greater than 0".to_string(),
            ));
        }
        if self.circuit_breaker_cooldown_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "LLM_CIRCUIT_BREAKER_COOLDOWN_SECONDS must be greater than 0".to_string(),
            ));
        }
        if self.cache_ttl_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "LLM_CACHE_TTL_SECONDS must be greater than 0".to_string(),
            ));
        }
        if self.cache_max_entries == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "LLM_CACHE_MAX_ENTRIES must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn circuit_breaker_cooldown(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_cooldown_seconds)
    }

    pub(crate) fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}
