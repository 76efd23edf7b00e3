use serde::{Deserialize, Serialize};

use crate::core::{CountryGroup, MalformedRowPolicy, TabularLoadOptions};
use crate::error::{ViewError, ViewResult};

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist/load session setup as JSON; every field
/// falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedViewsConfig {
    #[serde(default)]
    pub initial_country_group: CountryGroup,
    #[serde(default = "default_missing_metric_sentinel")]
    pub missing_metric_sentinel: String,
    #[serde(default)]
    pub malformed_rows: MalformedRowPolicy,
    /// Upper bound on queued intents handled by one
    /// `process_pending_intents` call.
    #[serde(default = "default_max_intents_per_drain")]
    pub max_intents_per_drain: usize,
}

impl Default for LinkedViewsConfig {
    fn default() -> Self {
        Self {
            initial_country_group: CountryGroup::default(),
            missing_metric_sentinel: default_missing_metric_sentinel(),
            malformed_rows: MalformedRowPolicy::default(),
            max_intents_per_drain: default_max_intents_per_drain(),
        }
    }
}

impl LinkedViewsConfig {
    #[must_use]
    pub fn with_initial_country_group(mut self, group: impl Into<CountryGroup>) -> Self {
        self.initial_country_group = group.into();
        self
    }

    #[must_use]
    pub fn with_missing_metric_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.missing_metric_sentinel = sentinel.into();
        self
    }

    #[must_use]
    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    #[must_use]
    pub fn with_max_intents_per_drain(mut self, max: usize) -> Self {
        self.max_intents_per_drain = max;
        self
    }

    /// Loader options derived from this config.
    #[must_use]
    pub fn load_options(&self) -> TabularLoadOptions {
        TabularLoadOptions {
            missing_metric_sentinel: self.missing_metric_sentinel.clone(),
            malformed_rows: self.malformed_rows,
        }
    }

    pub fn validate(&self) -> ViewResult<()> {
        if self.initial_country_group.as_str().is_empty() {
            return Err(ViewError::InvalidData(
                "initial country group must not be empty".to_owned(),
            ));
        }
        if self.max_intents_per_drain == 0 {
            return Err(ViewError::InvalidData(
                "max_intents_per_drain must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ViewResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ViewError::InvalidData(format!("failed to parse config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ViewResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ViewError::InvalidData(format!("failed to serialize config json: {e}")))
    }
}

fn default_missing_metric_sentinel() -> String {
    "NA".to_owned()
}

fn default_max_intents_per_drain() -> usize {
    256
}
