//! Calculator configuration.
//!
//! Settings come from defaults, an optional TOML file and `ANNUITY_*`
//! environment variables, in increasing order of precedence. The binary
//! applies its command-line overrides on top.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{DEFAULT_BALANCE_EPSILON, DEFAULT_MAX_PERIODS, ScheduleLimits};
use crate::types::Money;

pub const ENV_MAX_PERIODS: &str = "ANNUITY_MAX_PERIODS";
pub const ENV_BALANCE_EPSILON: &str = "ANNUITY_BALANCE_EPSILON";
pub const ENV_LOG_LEVEL: &str = "ANNUITY_LOG_LEVEL";

/// Log levels accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ScheduleError::Config(format!(
                "invalid log level: {s}. Must be one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// The level as a tracing filter directive.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LogLevel::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Upper bound on generated periods.
    pub max_periods: u32,
    /// Balance at or below which the loan counts as repaid.
    pub balance_epsilon: Money,
    pub log_level: LogLevel,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_periods: DEFAULT_MAX_PERIODS,
            balance_epsilon: DEFAULT_BALANCE_EPSILON,
            log_level: LogLevel::Info,
        }
    }
}

impl CalculatorConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> ScheduleResult<Self> {
        let config: CalculatorConfig = toml::from_str(content)
            .map_err(|e| ScheduleError::Config(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ScheduleResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScheduleError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads the optional file, then applies the process environment.
    pub fn load(path: Option<&Path>) -> ScheduleResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overrides settings from `ANNUITY_*` variables resolved through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> ScheduleResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_PERIODS) {
            self.max_periods = value.trim().parse().map_err(|_| {
                ScheduleError::Config(format!("{ENV_MAX_PERIODS} is not a period count: {value}"))
            })?;
        }

        if let Some(value) = lookup(ENV_BALANCE_EPSILON) {
            self.balance_epsilon = Decimal::from_str(value.trim()).map_err(|_| {
                ScheduleError::Config(format!("{ENV_BALANCE_EPSILON} is not an amount: {value}"))
            })?;
        }

        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(value.trim())?;
        }

        self.validate()
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        if self.max_periods == 0 {
            return Err(ScheduleError::Config("max_periods must be at least 1".into()));
        }
        if self.balance_epsilon < Decimal::ZERO {
            return Err(ScheduleError::Config("balance_epsilon cannot be negative".into()));
        }
        Ok(())
    }

    pub fn limits(&self) -> ScheduleLimits {
        ScheduleLimits {
            max_periods: self.max_periods,
            balance_epsilon: self.balance_epsilon,
        }
    }
}
