//! Analytics and alerting configuration.

use serde::{Deserialize, Serialize};

use crate::application::analytics::DEFAULT_MOST_WASTED_LIMIT;

/// Limits for analytics views and inventory alerts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    /// Length of the most-wasted ranking. Defaults to 10.
    #[serde(default = "default_most_wasted_limit")]
    pub most_wasted_limit: usize,

    /// Items expiring within this many days raise an alert. Defaults to 7.
    #[serde(default = "default_expiring_within_days")]
    pub expiring_within_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            most_wasted_limit: default_most_wasted_limit(),
            expiring_within_days: default_expiring_within_days(),
        }
    }
}

const fn default_most_wasted_limit() -> usize {
    DEFAULT_MOST_WASTED_LIMIT
}

const fn default_expiring_within_days() -> u32 {
    7
}
