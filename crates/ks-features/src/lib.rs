//! Kitchen-sink debuggee features
//!
//! Each module is one flag-selectable feature:
//! - [`threading`]: four workers meet at a barrier and are released together
//! - [`exception`]: integer-coded errors raised, caught and rethrown
//! - [`calling`]: deep recursion and averaging
//! - [`expression`], [`environment`], [`inheritance`], [`nonterminating`]:
//!   fixtures for inspection, launch environment and attach tests
//!
//! [`arguments`] is not flag-selected; the binary always runs it first to
//! resolve the flags.
//!
//! # Example
//!
//! ```rust,ignore
//! use ks_features::{arguments::ArgumentsFeature, default_registry};
//!
//! let mut arguments = ArgumentsFeature::new(std::env::args().skip(1).collect());
//! arguments.run(Arc::clone(&sink))?;
//! default_registry().run_enabled(arguments.flags(), &config, &sink)?;
//! ```

#![warn(unreachable_pub)]

pub mod arguments;
pub mod calling;
pub mod environment;
pub mod exception;
pub mod expression;
pub mod inheritance;
pub mod nonterminating;
pub mod threading;

use ks_harness::{FeatureKind, FeatureRegistry};

pub use arguments::ArgumentsFeature;
pub use calling::CallingFeature;
pub use environment::EnvironmentFeature;
pub use exception::{ExceptionFeature, UnhandledExceptionFeature};
pub use expression::ExpressionFeature;
pub use inheritance::InheritanceFeature;
pub use nonterminating::NonTerminatingFeature;
pub use threading::{RendezvousReport, ThreadingFeature, WorkerOutcome};

/// Registry with every feature
#[must_use]
pub fn default_registry() -> FeatureRegistry {
    FeatureRegistry::new()
        .with(FeatureKind::NonTerminating, NonTerminatingFeature::boxed)
        .with(FeatureKind::Calling, CallingFeature::boxed)
        .with(FeatureKind::Threading, ThreadingFeature::boxed)
        .with(FeatureKind::Expression, ExpressionFeature::boxed)
        .with(FeatureKind::Environment, EnvironmentFeature::boxed)
        .with(FeatureKind::Inheritance, InheritanceFeature::boxed)
        .with(FeatureKind::Exception, ExceptionFeature::boxed)
        .with(FeatureKind::UnhandledException, UnhandledExceptionFeature::boxed)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
