//! Kitchen-sink harness (ks-harness)
//!
//! Shared plumbing for the debuggee features:
//! - [`Feature`]: a named unit of debuggee behavior with a `run` operation
//! - [`FeatureFlags`]: which features the command line enabled
//! - [`FeatureRegistry`]: constructs and runs enabled features in a fixed order
//! - [`Logger`]: one call, one line, heterogeneous values
//! - [`ErrorRecord`]: the integer-coded error raised and caught by features
//!
//! # Example
//!
//! ```rust,ignore
//! use ks_harness::prelude::*;
//!
//! let flags = FeatureFlags::from_args(["-fCalling", "-fThreading"]);
//! let sink: Arc<dyn LineSink> = Arc::new(StdoutSink);
//! registry.run_enabled(&flags, &HarnessConfig::default(), &sink)?;
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod feature;
pub mod flags;
pub mod logging;
pub mod registry;
pub mod state_machine;

// Re-exports
pub use config::{HarnessConfig, ReleaseMode, CONFIG_ENV_VAR};
pub use error::{ConfigError, ErrorRecord, FeatureError, HarnessError, StateMachineError};
pub use feature::{Feature, FeatureKind};
pub use flags::FeatureFlags;
pub use logging::{LineSink, LogValue, Logger, MemorySink, StdoutSink};
pub use registry::{FeatureConstructor, FeatureRegistry, RunSummary};
pub use state_machine::{validate_history, validate_transition, ErrorState, Lifecycle, WorkerState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing and running features
    pub use crate::log_line;
    pub use crate::{
        ErrorRecord, Feature, FeatureError, FeatureFlags, FeatureKind, FeatureRegistry,
        HarnessConfig, LineSink, LogValue, Logger, StdoutSink,
    };
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
