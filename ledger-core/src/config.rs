//! Configuration for the ledger

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Retry configuration for mutating operations
    pub retry: RetryConfig,

    /// Deadlines
    pub timeouts: TimeoutConfig,

    /// Validation applied to deposit/withdraw/transfer amounts
    pub amount_policy: AmountPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "ledger-core".to_string(),
            retry: RetryConfig::default(),
            timeouts: TimeoutConfig::default(),
            amount_policy: AmountPolicy::default(),
        }
    }
}

/// Which failures the retry loop may retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryPolicy {
    /// Retry every failure, including permanent ones
    Blind,
    /// Retry only transient failures (timeouts)
    #[default]
    Transient,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    pub delay_ms: u64,

    /// Failure classification
    pub policy: RetryPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            policy: RetryPolicy::Transient,
        }
    }
}

impl RetryConfig {
    /// Delay between attempts
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Deadline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for create/get (milliseconds)
    pub read_timeout_ms: u64,

    /// Deadline for a single attempt of a mutating operation (milliseconds)
    pub attempt_timeout_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 5000,
            attempt_timeout_ms: 5000,
        }
    }
}

/// Amount validation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountPolicy {
    /// Accept any amount, negative deposits included
    #[default]
    Permissive,
    /// Reject amounts that are zero or negative
    Positive,
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(value) = std::env::var("LEDGER_RETRY_MAX_ATTEMPTS") {
            config.retry.max_attempts = parse_var("LEDGER_RETRY_MAX_ATTEMPTS", &value)?;
        }

        if let Ok(value) = std::env::var("LEDGER_RETRY_DELAY_MS") {
            config.retry.delay_ms = parse_var("LEDGER_RETRY_DELAY_MS", &value)?;
        }

        if let Ok(value) = std::env::var("LEDGER_RETRY_POLICY") {
            config.retry.policy = match value.as_str() {
                "blind" => RetryPolicy::Blind,
                "transient" => RetryPolicy::Transient,
                other => {
                    return Err(crate::Error::Config(format!(
                        "LEDGER_RETRY_POLICY must be blind or transient, got {}",
                        other
                    )))
                }
            };
        }

        if let Ok(value) = std::env::var("LEDGER_READ_TIMEOUT_MS") {
            config.timeouts.read_timeout_ms = parse_var("LEDGER_READ_TIMEOUT_MS", &value)?;
        }

        if let Ok(value) = std::env::var("LEDGER_ATTEMPT_TIMEOUT_MS") {
            config.timeouts.attempt_timeout_ms = parse_var("LEDGER_ATTEMPT_TIMEOUT_MS", &value)?;
        }

        if let Ok(value) = std::env::var("LEDGER_AMOUNT_POLICY") {
            config.amount_policy = match value.as_str() {
                "permissive" => AmountPolicy::Permissive,
                "positive" => AmountPolicy::Positive,
                other => {
                    return Err(crate::Error::Config(format!(
                        "LEDGER_AMOUNT_POLICY must be permissive or positive, got {}",
                        other
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the executor cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(crate::Error::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.timeouts.read_timeout_ms == 0 || self.timeouts.attempt_timeout_ms == 0 {
            return Err(crate::Error::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> crate::Result<T> {
    value
        .parse()
        .map_err(|_| crate::Error::Config(format!("Invalid value for {}: {}", name, value)))
}
