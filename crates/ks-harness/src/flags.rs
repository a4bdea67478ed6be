use crate::feature::FeatureKind;
use std::collections::BTreeSet;

/// The set of features enabled on the command line
///
/// Iteration follows registry order regardless of the order flags appeared in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    enabled: BTreeSet<FeatureKind>,
}

impl FeatureFlags {
    /// No feature enabled
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolve raw arguments. Unknown arguments are ignored and repeating a
    /// flag has no extra effect.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        args.into_iter()
            .filter_map(|arg| FeatureKind::from_flag(arg.as_ref()))
            .collect()
    }

    /// Enable `kind`
    pub fn enable(&mut self, kind: FeatureKind) {
        self.enabled.insert(kind);
    }

    /// Builder form of [`FeatureFlags::enable`]
    #[must_use]
    pub fn with(mut self, kind: FeatureKind) -> Self {
        self.enable(kind);
        self
    }

    /// Whether `kind` will run
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, kind: FeatureKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// True when no feature is enabled
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Number of enabled features
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    /// Enabled kinds in registry order
    pub fn iter(&self) -> impl Iterator<Item = FeatureKind> + '_ {
        self.enabled.iter().copied()
    }
}

impl FromIterator<FeatureKind> for FeatureFlags {
    fn from_iter<T: IntoIterator<Item = FeatureKind>>(iter: T) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_enable_nothing() {
        let flags = FeatureFlags::from_args(Vec::<String>::new());
        assert!(flags.is_empty());
        assert_eq!(flags, FeatureFlags::none());
    }

    #[test]
    fn unknown_args_are_ignored() {
        let flags = FeatureFlags::from_args(["-fCalling", "--verbose", "-fBogus", "calling"]);
        assert_eq!(flags.len(), 1);
        assert!(flags.is_enabled(FeatureKind::Calling));
    }

    #[test]
    fn iteration_uses_registry_order() {
        let flags = FeatureFlags::from_args(["-fEnvironment", "-fThreading", "-fCalling", "-fThreading"]);
        let kinds: Vec<_> = flags.iter().collect();
        assert_eq!(
            kinds,
            vec![FeatureKind::Calling, FeatureKind::Threading, FeatureKind::Environment]
        );
    }
}
