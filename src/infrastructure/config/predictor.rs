//! Demand predictor configuration.

use serde::{Deserialize, Serialize};

/// Where the demand model is served.
///
/// `PANTRY_PREDICTOR_URL` overrides `url` at load time. Without a URL,
/// demand calculations are stored with no predicted order count.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictorConfig {
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in seconds. Defaults to 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

const fn default_timeout_secs() -> u64 {
    10
}
