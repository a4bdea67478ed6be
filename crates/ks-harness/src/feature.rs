//! Feature abstraction
//!
//! A feature is one self-contained piece of debuggee behavior. The set of
//! features is closed ([`FeatureKind`]); each kind has a command-line flag
//! and a fixed position in the run order.

use crate::error::FeatureError;
use crate::log_line;
use crate::logging::{LineSink, Logger};
use std::fmt;
use std::sync::Arc;

/// The closed set of flag-selectable features, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    /// Sleeps in a loop forever
    NonTerminating,
    /// Deep call chain and variadic averaging
    Calling,
    /// Worker rendezvous
    Threading,
    /// Locals of many shapes for expression evaluation
    Expression,
    /// Reads an environment variable
    Environment,
    /// Trait-object animal hierarchy
    Inheritance,
    /// Handled raise/catch and rethrow chains
    Exception,
    /// Integer division by zero; terminates the process
    UnhandledException,
}

impl FeatureKind {
    /// All kinds in registry order
    pub const ALL: [FeatureKind; 8] = [
        FeatureKind::NonTerminating,
        FeatureKind::Calling,
        FeatureKind::Threading,
        FeatureKind::Expression,
        FeatureKind::Environment,
        FeatureKind::Inheritance,
        FeatureKind::Exception,
        FeatureKind::UnhandledException,
    ];

    /// Display name, also used as the log prefix
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FeatureKind::NonTerminating => "NonTerminating",
            FeatureKind::Calling => "Calling",
            FeatureKind::Threading => "Threading",
            FeatureKind::Expression => "Expression",
            FeatureKind::Environment => "Environment",
            FeatureKind::Inheritance => "Inheritance",
            FeatureKind::Exception => "Exception",
            FeatureKind::UnhandledException => "UnhandledException",
        }
    }

    /// Command-line flag enabling this kind, e.g. `-fCalling`
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            FeatureKind::NonTerminating => "-fNonTerminating",
            FeatureKind::Calling => "-fCalling",
            FeatureKind::Threading => "-fThreading",
            FeatureKind::Expression => "-fExpression",
            FeatureKind::Environment => "-fEnvironment",
            FeatureKind::Inheritance => "-fInheritance",
            FeatureKind::Exception => "-fException",
            FeatureKind::UnhandledException => "-fUnhandledException",
        }
    }

    /// Match an argument against the known flags. Exact, case-sensitive.
    #[must_use]
    pub fn from_flag(arg: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.flag() == arg)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A unit of debuggee behavior
///
/// Instances are constructed once per invocation, run once, then dropped.
/// Running an instance a second time is not supported.
pub trait Feature: Send {
    /// Name used for the log prefix
    fn name(&self) -> &'static str;

    /// The feature body
    ///
    /// # Errors
    /// Infrastructure failures only. Recoverable errors the feature raises
    /// for itself are caught inside; fatal faults panic.
    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError>;

    /// Announce, run the body, announce completion.
    ///
    /// # Errors
    /// Whatever [`Feature::core_run`] returns.
    fn run(&mut self, sink: Arc<dyn LineSink>) -> Result<(), FeatureError> {
        let name = self.name();
        let _span = tracing::info_span!("feature", feature = name).entered();
        let log = Logger::new(name, sink);

        log_line!(log, "Running feature ", name, ".");
        self.core_run(&log)?;
        log_line!(log, "Finished feature ", name, ".");
        Ok(())
    }
}
