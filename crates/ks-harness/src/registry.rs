//! Feature registry
//!
//! Maps each [`FeatureKind`] to a constructor. Running the registry builds
//! and runs only the enabled features, always in [`FeatureKind::ALL`] order.

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::feature::{Feature, FeatureKind};
use crate::flags::FeatureFlags;
use crate::logging::LineSink;
use std::fmt;
use std::sync::Arc;

/// Builds a feature from the harness configuration
pub type FeatureConstructor = fn(&HarnessConfig) -> Box<dyn Feature>;

/// What a registry run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Features that ran to completion, in run order
    pub ran: Vec<FeatureKind>,
    /// Enabled features with no registered constructor
    pub unregistered: Vec<FeatureKind>,
}

/// Registry of feature constructors
#[derive(Default, Clone)]
pub struct FeatureRegistry {
    entries: Vec<(FeatureKind, FeatureConstructor)>,
}

impl fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(k, _)| k)).finish()
    }
}

impl FeatureRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a constructor, replacing any previous one for `kind`
    pub fn register(&mut self, kind: FeatureKind, constructor: FeatureConstructor) {
        match self.entries.binary_search_by_key(&kind, |(k, _)| *k) {
            Ok(idx) => self.entries[idx].1 = constructor,
            Err(idx) => self.entries.insert(idx, (kind, constructor)),
        }
    }

    /// Builder form of [`FeatureRegistry::register`]
    #[must_use]
    pub fn with(mut self, kind: FeatureKind, constructor: FeatureConstructor) -> Self {
        self.register(kind, constructor);
        self
    }

    /// Check if a constructor exists for `kind`
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: FeatureKind) -> bool {
        self.entries.iter().any(|(k, _)| *k == kind)
    }

    /// Registered kinds in run order
    #[must_use]
    pub fn kinds(&self) -> Vec<FeatureKind> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    /// Get number of registered features
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Construct and run every enabled feature.
    ///
    /// Disabled features are never constructed. The first failing feature
    /// stops the run.
    ///
    /// # Errors
    /// [`HarnessError::Feature`] wrapping the failure.
    pub fn run_enabled(
        &self,
        flags: &FeatureFlags,
        config: &HarnessConfig,
        sink: &Arc<dyn LineSink>,
    ) -> Result<RunSummary, HarnessError> {
        let mut summary = RunSummary::default();

        for &(kind, constructor) in &self.entries {
            if !flags.is_enabled(kind) {
                tracing::trace!(feature = kind.name(), "feature disabled");
                continue;
            }

            let mut feature = constructor(config);
            feature
                .run(Arc::clone(sink))
                .map_err(|source| HarnessError::Feature {
                    name: kind.name(),
                    source,
                })?;
            summary.ran.push(kind);
        }

        summary.unregistered = flags.iter().filter(|k| !self.contains(*k)).collect();
        if !summary.unregistered.is_empty() {
            tracing::warn!(missing = ?summary.unregistered, "enabled features have no constructor");
        }

        Ok(summary)
    }
}
