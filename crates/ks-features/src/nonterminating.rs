//! A loop that never ends, for attach and break-all scenarios

use ks_harness::log_line;
use ks_harness::{Feature, FeatureError, HarnessConfig, Logger};
use std::thread;
use std::time::Duration;

/// The NonTerminating feature
#[derive(Debug, Clone, Copy)]
pub struct NonTerminatingFeature {
    tick_interval: Duration,
    max_ticks: Option<u64>,
}

impl NonTerminatingFeature {
    /// Create from configuration
    #[must_use]
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            max_ticks: config.non_terminating_ticks,
        }
    }

    /// Registry constructor
    #[must_use]
    pub fn boxed(config: &HarnessConfig) -> Box<dyn Feature> {
        Box::new(Self::new(config))
    }

    /// Sleep in a loop; only returns when a tick bound is configured.
    pub fn spin(&self) -> u64 {
        let mut ticks: u64 = 0;
        loop {
            thread::sleep(self.tick_interval);
            ticks += 1;
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                return ticks;
            }
        }
    }
}

impl Feature for NonTerminatingFeature {
    fn name(&self) -> &'static str {
        "NonTerminating"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        log_line!(log, "Entering infinite loop.");
        let ticks = self.spin();
        log_line!(log, "Loop bounded after ", ticks, " ticks.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ks_test_utils::{fast_config, logger_for};

    #[test]
    fn bounded_loop_returns() {
        let mut feature = NonTerminatingFeature::new(&fast_config());
        let (log, sink) = logger_for("NonTerminating");

        feature.core_run(&log).unwrap();

        assert!(sink.contains("Entering infinite loop."));
        assert!(sink.contains("Loop bounded after 3 ticks."));
    }

    #[test]
    fn zero_bound_still_ticks_once() {
        let config = HarnessConfig::new().with_non_terminating_ticks(0, Duration::from_millis(1));
        assert_eq!(NonTerminatingFeature::new(&config).spin(), 1);
    }
}
