//! Deep call chains for step-in/step-out and stack inspection

use ks_harness::log_line;
use ks_harness::{Feature, FeatureError, HarnessConfig, Logger};
use std::hint::black_box;

/// Recurse until `count <= 0`; returns how many nested calls were made.
#[inline(never)]
#[must_use]
pub fn recursive_call(count: i32) -> u32 {
    if count <= 0 {
        return 0;
    }
    recursive_call(black_box(count - 1)) + 1
}

/// Arithmetic mean. An empty slice yields NaN; callers pass at least one value.
#[inline(never)]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    sum / values.len() as f64
}

/// The Calling feature
#[derive(Debug, Clone, Copy)]
pub struct CallingFeature {
    depth: i32,
}

impl CallingFeature {
    /// Create from configuration
    #[must_use]
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            depth: config.recursion_depth,
        }
    }

    /// Registry constructor
    #[must_use]
    pub fn boxed(config: &HarnessConfig) -> Box<dyn Feature> {
        Box::new(Self::new(config))
    }
}

impl Feature for CallingFeature {
    fn name(&self) -> &'static str {
        "Calling"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        let frames = recursive_call(self.depth);
        log_line!(log, "Recursion depth: ", frames);

        let avg = average(&[1.0, 2.0, 3.0, 4.0, 5.5]);
        log_line!(log, "Average: ", avg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ks_test_utils::logger_for;

    #[test]
    fn recursion_reaches_requested_depth() {
        assert_eq!(recursive_call(30), 30);
        assert_eq!(recursive_call(1), 1);
        assert_eq!(recursive_call(0), 0);
        assert_eq!(recursive_call(-3), 0);
    }

    #[test]
    fn average_of_values() {
        assert!((average(&[1.0, 2.0, 3.0]) - 2.0).abs() < f64::EPSILON);
        assert!((average(&[7.5]) - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn average_of_nothing_is_nan() {
        assert!(average(&[]).is_nan());
    }

    #[test]
    fn feature_logs_depth_and_average() {
        let mut feature = CallingFeature::new(&HarnessConfig::default());
        let (log, sink) = logger_for("Calling");

        feature.core_run(&log).unwrap();

        assert_eq!(
            sink.lines(),
            vec![
                "[Calling] Recursion depth: 30".to_string(),
                "[Calling] Average: 3.1".to_string(),
            ]
        );
    }
}
