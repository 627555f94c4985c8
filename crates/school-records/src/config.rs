//! Configuration loaded from `SCHOOL_*` environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `SCHOOL_EXCHANGE` | `distrischool.events` |
//! | `SCHOOL_STORE_BUFFER` | `32` |
//! | `SCHOOL_PUBLISH_TIMEOUT_MS` | `2000` |
//! | `SCHOOL_PUBLISH_ATTEMPTS` | `2` |
//! | `SCHOOL_REDELIVERY_ATTEMPTS` | `5` |
//! | `SCHOOL_REDELIVERY_BACKOFF_MS` | `200` |
//! | `SCHOOL_PASSWORD_MEMORY_KIB` | `19456` |
//! | `SCHOOL_PASSWORD_ITERATIONS` | `2` |

use record_framework::{EmitSettings, RedeliverySettings};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_EXCHANGE: &str = "distrischool.events";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    pub exchange: String,
    pub store_buffer: usize,
    pub publish_timeout_ms: u64,
    pub publish_attempts: u32,
    pub redelivery_attempts: u32,
    pub redelivery_backoff_ms: u64,
    pub password_memory_kib: u32,
    pub password_iterations: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            exchange: DEFAULT_EXCHANGE.to_string(),
            store_buffer: 32,
            publish_timeout_ms: 2000,
            publish_attempts: 2,
            redelivery_attempts: 5,
            redelivery_backoff_ms: 200,
            password_memory_kib: 19 * 1024,
            password_iterations: 2,
        }
    }
}

impl SystemConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            exchange: lookup("SCHOOL_EXCHANGE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.exchange),
            store_buffer: parse(&lookup, "SCHOOL_STORE_BUFFER", defaults.store_buffer)?,
            publish_timeout_ms: parse(
                &lookup,
                "SCHOOL_PUBLISH_TIMEOUT_MS",
                defaults.publish_timeout_ms,
            )?,
            publish_attempts: parse(&lookup, "SCHOOL_PUBLISH_ATTEMPTS", defaults.publish_attempts)?,
            redelivery_attempts: parse(
                &lookup,
                "SCHOOL_REDELIVERY_ATTEMPTS",
                defaults.redelivery_attempts,
            )?,
            redelivery_backoff_ms: parse(
                &lookup,
                "SCHOOL_REDELIVERY_BACKOFF_MS",
                defaults.redelivery_backoff_ms,
            )?,
            password_memory_kib: parse(
                &lookup,
                "SCHOOL_PASSWORD_MEMORY_KIB",
                defaults.password_memory_kib,
            )?,
            password_iterations: parse(
                &lookup,
                "SCHOOL_PASSWORD_ITERATIONS",
                defaults.password_iterations,
            )?,
        })
    }

    pub fn emit_settings(&self) -> EmitSettings {
        EmitSettings {
            timeout: Duration::from_millis(self.publish_timeout_ms),
            attempts: self.publish_attempts,
        }
    }

    pub fn redelivery_settings(&self) -> RedeliverySettings {
        RedeliverySettings {
            attempts: self.redelivery_attempts,
            initial_backoff: Duration::from_millis(self.redelivery_backoff_ms),
            timeout: Duration::from_millis(self.publish_timeout_ms),
            ..RedeliverySettings::default()
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
