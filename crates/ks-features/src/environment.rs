//! Environment variable inspection

use ks_harness::log_line;
use ks_harness::{Feature, FeatureError, HarnessConfig, Logger};
use std::env::VarError;

/// Value of `name`, or `None` when unset. Non-UTF-8 values are converted lossily.
#[must_use]
pub fn read_variable(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
    }
}

/// The Environment feature
#[derive(Debug, Clone)]
pub struct EnvironmentFeature {
    variable: String,
}

impl EnvironmentFeature {
    /// Create from configuration
    #[must_use]
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            variable: config.environment_variable.clone(),
        }
    }

    /// Registry constructor
    #[must_use]
    pub fn boxed(config: &HarnessConfig) -> Box<dyn Feature> {
        Box::new(Self::new(config))
    }
}

impl Feature for EnvironmentFeature {
    fn name(&self) -> &'static str {
        "Environment"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        let var_value1 = read_variable(&self.variable);
        match &var_value1 {
            Some(value) => log_line!(log, self.variable.as_str(), "=", value),
            None => log_line!(log, self.variable.as_str(), " is not set"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ks_test_utils::logger_for;

    fn feature_for(name: &str) -> EnvironmentFeature {
        EnvironmentFeature::new(&HarnessConfig::new().with_environment_variable(name))
    }

    #[test]
    fn logs_value_with_spaces_and_quotes() {
        let name = "KS_ENV_TEST_QUOTED";
        std::env::set_var(name, "quot'ed \"string\" with spaces");
        let (log, sink) = logger_for("Environment");

        feature_for(name).core_run(&log).unwrap();

        assert_eq!(
            sink.lines(),
            vec![format!("[Environment] {name}=quot'ed \"string\" with spaces")]
        );
    }

    #[test]
    fn logs_unset_variable() {
        let name = "KS_ENV_TEST_DEFINITELY_UNSET";
        std::env::remove_var(name);
        let (log, sink) = logger_for("Environment");

        feature_for(name).core_run(&log).unwrap();

        assert!(sink.contains("KS_ENV_TEST_DEFINITELY_UNSET is not set"));
        assert_eq!(read_variable(name), None);
    }
}
