//! Error types for the harness
//!
//! Two very different kinds of failure live here:
//! - [`ErrorRecord`]: a recoverable, integer-coded error that a feature
//!   raises and catches itself. It never reaches the registry.
//! - [`FeatureError`] / [`HarnessError`]: infrastructure failures (a worker
//!   that could not be spawned, a bad config file) that abort the run.
//!
//! Fatal faults such as integer division by zero are not modeled as errors
//! at all; they panic and take the process down.

use std::path::PathBuf;

/// A raised error carrying an integer code
///
/// Created at the raise site and consumed by the matching handler. A rethrow
/// creates a new record with a derived code rather than re-raising this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("error record raised with code {code}")]
pub struct ErrorRecord {
    code: i32,
}

impl ErrorRecord {
    /// Create a record carrying `code`
    #[inline]
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self { code }
    }

    /// The code set at the raise site
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self.code
    }
}

/// Failures that stop a feature run
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// A worker thread could not be created
    #[error("failed to spawn worker {label}: {source}")]
    Spawn {
        /// Label of the worker
        label: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked before reporting its outcome
    #[error("worker {0} panicked")]
    WorkerPanicked(String),

    /// The running counter would have gone negative
    #[error("running counter underflow")]
    CounterUnderflow,

    /// A lifecycle moved along an edge its state machine does not allow
    #[error(transparent)]
    StateMachine(#[from] StateMachineError),
}

/// Illegal lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// `from -> to` is not an edge of `machine`
    #[error("illegal {machine} transition: {from} -> {to}")]
    IllegalTransition {
        /// Name of the state machine
        machine: &'static str,
        /// Current state
        from: &'static str,
        /// Requested state
        to: &'static str,
    },
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::HarnessConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field parsed but holds an unusable value
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Offending field
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Top-level harness error
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A feature failed while running
    #[error("feature {name} failed: {source}")]
    Feature {
        /// Feature name
        name: &'static str,
        /// What went wrong
        #[source]
        source: FeatureError,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HarnessError {
    /// Name of the failing feature, if a feature failed
    #[must_use]
    pub fn feature_name(&self) -> Option<&'static str> {
        match self {
            Self::Feature { name, .. } => Some(name),
            Self::Config(_) => None,
        }
    }
}
