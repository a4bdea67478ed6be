//! Testing utilities for the kitchen-sink workspace
//!
//! Shared fixtures: a fast configuration, capturing sinks and log assertions.

#![allow(missing_docs)]

use ks_harness::{HarnessConfig, LineSink, Logger, MemorySink, ReleaseMode};
use std::sync::Arc;
use std::time::Duration;

/// Defaults with millisecond polling and a three-tick non-terminating loop
pub fn fast_config() -> HarnessConfig {
    HarnessConfig::new()
        .with_poll_interval(Duration::from_millis(1))
        .with_non_terminating_ticks(3, Duration::from_millis(1))
}

pub fn fast_config_with_mode(mode: ReleaseMode) -> HarnessConfig {
    fast_config().with_release_mode(mode)
}

/// A memory sink plus the same sink as a trait object
pub fn capture_sink() -> (Arc<MemorySink>, Arc<dyn LineSink>) {
    let memory = Arc::new(MemorySink::new());
    let sink: Arc<dyn LineSink> = memory.clone();
    (memory, sink)
}

/// A logger for `feature` writing into a fresh memory sink
pub fn logger_for(feature: &'static str) -> (Logger, Arc<MemorySink>) {
    let (memory, sink) = capture_sink();
    (Logger::new(feature, sink), memory)
}

#[track_caller]
pub fn assert_logged(sink: &MemorySink, needle: &str) {
    assert!(
        sink.contains(needle),
        "expected a line containing {needle:?}, got:\n{}",
        sink.lines().join("\n")
    );
}

#[track_caller]
pub fn assert_not_logged(sink: &MemorySink, needle: &str) {
    assert!(
        !sink.contains(needle),
        "unexpected line containing {needle:?}:\n{}",
        sink.lines().join("\n")
    );
}
