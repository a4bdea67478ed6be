//! Line-oriented logging for features
//!
//! A [`Logger`] renders an ordered sequence of [`LogValue`]s as one line and
//! hands it to a [`LineSink`]. Every line is also mirrored to `tracing` so it
//! shows up next to harness diagnostics when `RUST_LOG` is set.

use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// A single heterogeneous value in a log line
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    /// Text, rendered verbatim
    Text(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Text(s) => f.write_str(s),
            LogValue::Int(v) => write!(f, "{v}"),
            LogValue::UInt(v) => write!(f, "{v}"),
            LogValue::Float(v) => write!(f, "{v}"),
            LogValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Text(value)
    }
}

impl From<&String> for LogValue {
    fn from(value: &String) -> Self {
        LogValue::Text(value.clone())
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        LogValue::Bool(value)
    }
}

impl From<f32> for LogValue {
    fn from(value: f32) -> Self {
        LogValue::Float(f64::from(value))
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        LogValue::Float(value)
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for LogValue {
            fn from(value: $ty) -> Self {
                LogValue::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for LogValue {
            fn from(value: $ty) -> Self {
                LogValue::UInt(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for LogValue {
    fn from(value: usize) -> Self {
        // usize fits in u64 on every supported target
        LogValue::UInt(value as u64)
    }
}

/// Concatenate values into one line, no separators.
#[must_use]
pub fn render(values: &[LogValue]) -> String {
    use fmt::Write as _;
    let mut line = String::new();
    for value in values {
        let _ = write!(line, "{value}");
    }
    line
}

/// Destination for rendered lines
pub trait LineSink: Send + Sync {
    /// Write one line. The sink appends the line break.
    fn write_line(&self, line: &str);
}

/// Writes lines to the process stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to write debuggee output");
        }
    }
}

/// Captures lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of lines written
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// True when nothing was written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// True if any line contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.contains(needle))
    }

    /// Lines carrying the `[feature]` prefix
    #[must_use]
    pub fn lines_for(&self, feature: &str) -> Vec<String> {
        let prefix = format!("[{feature}] ");
        self.lines
            .lock()
            .iter()
            .filter(|l| l.starts_with(&prefix))
            .cloned()
            .collect()
    }
}

impl LineSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// A sink bound to one feature name
///
/// Cheap to clone; worker threads each take their own copy.
#[derive(Clone)]
pub struct Logger {
    feature: &'static str,
    sink: Arc<dyn LineSink>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("feature", &self.feature).finish_non_exhaustive()
    }
}

impl Logger {
    /// Bind `feature` to `sink`
    #[must_use]
    pub fn new(feature: &'static str, sink: Arc<dyn LineSink>) -> Self {
        Self { feature, sink }
    }

    /// Feature this logger prefixes lines with
    #[inline]
    #[must_use]
    pub fn feature(&self) -> &'static str {
        self.feature
    }

    /// Write `values` as one line: `[Feature] v1v2v3...`
    pub fn log(&self, values: &[LogValue]) {
        let line = format!("[{}] {}", self.feature, render(values));
        tracing::debug!(feature = self.feature, "{line}");
        self.sink.write_line(&line);
    }
}

/// Log heterogeneous values as one line.
///
/// ```rust,ignore
/// log_line!(logger, "Starting thread ", label, ". LoopCount: ", loop_count);
/// ```
#[macro_export]
macro_rules! log_line {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.log(&[$($crate::logging::LogValue::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_concatenates_mixed_values() {
        let values = [
            LogValue::from("Arg "),
            LogValue::from(1_i32),
            LogValue::from(": "),
            LogValue::from(2.5_f64),
            LogValue::from(" "),
            LogValue::from(true),
        ];
        assert_eq!(render(&values), "Arg 1: 2.5 true");
    }

    #[test]
    fn logger_prefixes_feature_name() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new("Calling", sink.clone());

        crate::log_line!(logger, "Average: ", 3.5_f64);
        crate::log_line!(logger, "Depth ", 30_usize);

        assert_eq!(
            sink.lines(),
            vec!["[Calling] Average: 3.5".to_string(), "[Calling] Depth 30".to_string()]
        );
        assert_eq!(sink.lines_for("Calling").len(), 2);
        assert!(sink.lines_for("Threading").is_empty());
    }

    #[test]
    fn memory_sink_starts_empty() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.write_line("hello");
        assert_eq!(sink.len(), 1);
        assert!(sink.contains("ell"));
    }
}
