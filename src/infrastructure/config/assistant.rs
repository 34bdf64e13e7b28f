//! Inventory assistant configuration.

use serde::{Deserialize, Serialize};

/// Settings for the natural-language inventory assistant.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantConfig {
    /// Whether chat requests reach the LLM at all. Defaults to true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How many recent transactions are shown to the model as context.
    #[serde(default = "default_transaction_context")]
    pub transaction_context: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            transaction_context: default_transaction_context(),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

const fn default_transaction_context() -> usize {
    20
}
