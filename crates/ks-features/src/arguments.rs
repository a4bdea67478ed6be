//! Command-line echo and flag resolution
//!
//! Always runs first. Logs every argument it was given and resolves the
//! [`FeatureFlags`] the registry consumes.

use ks_harness::log_line;
use ks_harness::{Feature, FeatureError, FeatureFlags, Logger};

/// The Arguments feature
#[derive(Debug, Clone, Default)]
pub struct ArgumentsFeature {
    args: Vec<String>,
    flags: FeatureFlags,
}

impl ArgumentsFeature {
    /// Take the arguments after the program name
    #[must_use]
    pub fn new(args: Vec<String>) -> Self {
        let flags = FeatureFlags::from_args(&args);
        Self { args, flags }
    }

    /// Raw arguments
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Resolved feature flags
    #[must_use]
    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }
}

impl Feature for ArgumentsFeature {
    fn name(&self) -> &'static str {
        "Arguments"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        log_line!(log, "Parsing Arguments.");
        if self.args.is_empty() {
            return Ok(());
        }

        log_line!(log, "Count: ", self.args.len());
        for (i, arg) in self.args.iter().enumerate() {
            log_line!(log, "Arg ", i + 1, ": ", arg);
        }
        Ok(())
    }
}
