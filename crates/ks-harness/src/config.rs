//! Harness configuration
//!
//! Defaults reproduce the stock debuggee. A TOML file named by
//! [`CONFIG_ENV_VAR`] can override any field, which lets test scripts shorten
//! the rendezvous poll or bound the non-terminating loop.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming a TOML config file
pub const CONFIG_ENV_VAR: &str = "KITCHENSINK_CONFIG";

/// How the rendezvous driver releases parked workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseMode {
    /// Each broadcast only wakes workers already parked when it is issued.
    /// A worker that parks late misses it and waits for the next one, so the
    /// driver keeps broadcasting until the running count reaches zero.
    #[default]
    Broadcast,
    /// The first broadcast opens a gate that late workers check before
    /// parking; a single broadcast releases everyone.
    Predicate,
}

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Delay between rendezvous polls and broadcasts
    pub poll_interval_ms: u64,
    /// Release strategy for the rendezvous
    pub release_mode: ReleaseMode,
    /// Depth of the Calling feature's recursion
    pub recursion_depth: i32,
    /// Variable read by the Environment feature
    pub environment_variable: String,
    /// Sleep per NonTerminating iteration
    pub tick_interval_ms: u64,
    /// Bound on NonTerminating iterations; `None` loops forever
    pub non_terminating_ticks: Option<u64>,
}

impl HarnessConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With poll interval
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With release mode
    #[inline]
    #[must_use]
    pub fn with_release_mode(mut self, mode: ReleaseMode) -> Self {
        self.release_mode = mode;
        self
    }

    /// With recursion depth
    #[inline]
    #[must_use]
    pub fn with_recursion_depth(mut self, depth: i32) -> Self {
        self.recursion_depth = depth;
        self
    }

    /// With the variable the Environment feature reads
    #[inline]
    #[must_use]
    pub fn with_environment_variable(mut self, name: impl Into<String>) -> Self {
        self.environment_variable = name.into();
        self
    }

    /// With a bounded non-terminating loop
    #[inline]
    #[must_use]
    pub fn with_non_terminating_ticks(mut self, ticks: u64, interval: Duration) -> Self {
        self.non_terminating_ticks = Some(ticks);
        self.tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Poll interval as a duration
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Tick interval as a duration
    #[inline]
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject values that parse but cannot be used.
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.recursion_depth < 0 {
            return Err(ConfigError::InvalidValue {
                key: "recursion_depth",
                reason: format!("must not be negative, got {}", self.recursion_depth),
            });
        }
        if self.environment_variable.is_empty() || self.environment_variable.contains('=') {
            return Err(ConfigError::InvalidValue {
                key: "environment_variable",
                reason: "must be a non-empty name without '='".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate TOML.
    ///
    /// # Errors
    /// Parse failures and invalid values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file.
    ///
    /// # Errors
    /// IO failures, parse failures and invalid values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or defaults when unset.
    ///
    /// # Errors
    /// See [`HarnessConfig::load`].
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => {
                tracing::debug!(path = ?path, "loading harness config");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            release_mode: ReleaseMode::Broadcast,
            recursion_depth: 30,
            environment_variable: "VAR_NAME_1".to_string(),
            tick_interval_ms: 1000,
            non_terminating_ticks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_debuggee() {
        let config = HarnessConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.release_mode, ReleaseMode::Broadcast);
        assert_eq!(config.recursion_depth, 30);
        assert_eq!(config.environment_variable, "VAR_NAME_1");
        assert_eq!(config.non_terminating_ticks, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = HarnessConfig::from_toml_str(
            r#"
            poll_interval_ms = 5
            release_mode = "predicate"
            "#,
        )
        .unwrap();

        assert_eq!(config.poll_interval_ms, 5);
        assert_eq!(config.release_mode, ReleaseMode::Predicate);
        assert_eq!(config.recursion_depth, 30);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = HarnessConfig::from_toml_str("worker_count = 8").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_poll_interval_is_invalid() {
        let err = HarnessConfig::from_toml_str("poll_interval_ms = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "poll_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn negative_depth_is_invalid() {
        let config = HarnessConfig::new().with_recursion_depth(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "non_terminating_ticks = 3\ntick_interval_ms = 1").unwrap();

        let config = HarnessConfig::load(file.path()).unwrap();
        assert_eq!(config.non_terminating_ticks, Some(3));
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = HarnessConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
